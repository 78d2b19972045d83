//! Dive gas planning core: decompression, tank consumption, reserves and
//! maximum bottom time.

pub mod buhlmann;
pub mod calculators;
pub mod consumption;
pub mod depth_levels;
pub mod diver;
pub mod emergency;
pub mod error;
pub mod ffi;
pub mod gas;
pub mod options;
pub mod physics;
pub mod precision;
pub mod search;
pub mod segment;
pub mod tank;
pub mod time;
pub mod units;

uniffi::include_scaffolding!("diveplan");

pub use buhlmann::{
    BuhlmannAlgorithm, CalculatedProfile, DecompressionPlanner, RestingParameters, Tissues,
};
pub use calculators::{AltitudeCalculator, NitroxCalculator};
pub use consumption::{Consumption, ConsumptionOptions, GasVolumes};
pub use diver::{Diver, RateSelector};
pub use emergency::emergency_ascent;
pub use error::{GasError, PlanError};
pub use ffi::{
    gas_by_name, plan_dive, standard_gas_names, DivePlan, DiverRecord, GasRecord, SegmentRecord,
    TankRecord, TankUsage,
};
pub use gas::Gas;
pub use options::{Options, SafetyStop};
pub use physics::{DepthConverter, Salinity};
pub use search::{BinaryIntervalSearch, SearchContext};
pub use segment::{Segment, Segments};
pub use tank::{Tank, TurnRule};
pub use units::{ImperialUnits, MetricUnits, Units};

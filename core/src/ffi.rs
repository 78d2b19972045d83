//! Records and functions exported through uniffi.

use tracing::debug;

use crate::buhlmann::{BuhlmannAlgorithm, DecompressionPlanner};
use crate::consumption::{Consumption, ConsumptionOptions};
use crate::diver::Diver;
use crate::error::PlanError;
use crate::gas::{names, Gas};
use crate::options::Options;
use crate::segment::{Segment, Segments};
use crate::tank::{self, Tank};

/// Fractions have to be whole permille, so the same mix in a tank and in a
/// segment is always one gas. Finer fractions like 0.2095 are rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct GasRecord {
    /// Oxygen fraction 0-1
    pub o2: f64,
    /// Helium fraction 0-1
    pub he: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TankRecord {
    /// Water volume in liters, has to be positive
    pub size: f64,
    pub start_pressure: f64,
    pub gas: GasRecord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentRecord {
    pub start_depth: f64,
    pub end_depth: f64,
    pub duration_sec: f64,
    pub gas: GasRecord,
    pub tank_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiverRecord {
    pub rmv: f64,
    pub stress_rmv: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TankUsage {
    pub index: u32,
    pub consumed: f64,
    pub reserve: f64,
    pub end_pressure: f64,
    pub has_reserve: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DivePlan {
    pub segments: Vec<SegmentRecord>,
    pub tanks: Vec<TankUsage>,
    pub max_bottom_time_min: u32,
    pub duration_sec: f64,
    pub deco_required: bool,
}

impl From<Gas> for GasRecord {
    fn from(gas: Gas) -> Self {
        Self {
            o2: gas.o2(),
            he: gas.he(),
        }
    }
}

impl TryFrom<&GasRecord> for Gas {
    type Error = PlanError;

    fn try_from(record: &GasRecord) -> Result<Self, Self::Error> {
        Ok(Gas::new(record.o2, record.he)?)
    }
}

impl TryFrom<&SegmentRecord> for Segment {
    type Error = PlanError;

    fn try_from(record: &SegmentRecord) -> Result<Self, Self::Error> {
        let segment = Segment::new(
            record.start_depth,
            record.end_depth,
            Gas::try_from(&record.gas)?,
            record.duration_sec,
        );
        Ok(match record.tank_index {
            Some(index) => segment.with_tank(index as usize),
            None => segment,
        })
    }
}

impl From<&Segment> for SegmentRecord {
    fn from(segment: &Segment) -> Self {
        Self {
            start_depth: segment.start_depth,
            end_depth: segment.end_depth,
            duration_sec: segment.duration,
            gas: segment.gas.into(),
            tank_index: segment.tank.map(|index| index as u32),
        }
    }
}

/// Plans the ascent for user defined `segments`, the tank consumption of the
/// whole dive and the maximum bottom time at the last planned depth.
///
/// `options_json` overrides the default planner options, see [`Options`].
pub fn plan_dive(
    segments: Vec<SegmentRecord>,
    tanks: Vec<TankRecord>,
    diver: DiverRecord,
    options_json: Option<String>,
) -> Result<DivePlan, PlanError> {
    let options = match options_json {
        Some(json) => Options::from_json(&json)?,
        None => Options::default(),
    };
    let segments = segments
        .iter()
        .map(Segment::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Segments::from_vec)?;
    let mut tanks = tanks
        .iter()
        .map(|record| {
            let gas = Gas::try_from(&record.gas)?;
            Ok(Tank::new(record.size, record.start_pressure, gas))
        })
        .collect::<Result<Vec<_>, PlanError>>()?;
    let consumption_options = ConsumptionOptions {
        diver: Diver::new(diver.rmv, diver.stress_rmv),
        ..ConsumptionOptions::default()
    };

    let engine = Consumption::new(options.depth_converter());
    let mut trial = tanks.clone();
    let max_bottom_time = engine.calculate_max_bottom_time(
        &segments,
        &mut trial,
        &consumption_options,
        &options,
        None,
    )?;

    let profile =
        BuhlmannAlgorithm.decompression(&segments, &tank::to_gases(&tanks), &options, None)?;
    engine.consume_from_tanks(&profile.segments, &options, &mut tanks, &consumption_options, None)?;
    debug!(
        segments = profile.segments.len(),
        max_bottom_time,
        "dive planned"
    );

    Ok(DivePlan {
        segments: profile.segments.iter().map(SegmentRecord::from).collect(),
        tanks: tanks
            .iter()
            .enumerate()
            .map(|(index, tank)| TankUsage {
                index: index as u32,
                consumed: tank.consumed,
                reserve: tank.reserve,
                end_pressure: tank.end_pressure(),
                has_reserve: tank.has_reserve(),
            })
            .collect(),
        max_bottom_time_min: max_bottom_time,
        duration_sec: profile.duration(),
        deco_required: profile.deco_required(),
    })
}

/// Gas for a name like "EAN32" or "Trimix 18/45", `None` if it can't be parsed.
pub fn gas_by_name(name: String) -> Option<GasRecord> {
    names::parse(&name).ok().map(GasRecord::from)
}

pub fn standard_gas_names() -> Vec<String> {
    names::standard_names().into_iter().map(String::from).collect()
}

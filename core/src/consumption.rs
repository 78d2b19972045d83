//! Gas consumption, tank reserves and maximum bottom time.
//!
//! Consumption is distributed over the tanks in several passes. The reserve
//! is calculated first from an emergency ascent, so that all later passes can
//! keep it. Segments with an assigned tank are consumed from that tank, the
//! rest is consumed from all tanks carrying the same gas, stage tanks first.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::buhlmann::{BuhlmannAlgorithm, DecompressionPlanner, RestingParameters};
use crate::diver::{Diver, RateSelector};
use crate::emergency::emergency_ascent;
use crate::error::PlanError;
use crate::gas::Gas;
use crate::options::Options;
use crate::physics::DepthConverter;
use crate::precision;
use crate::search::{BinaryIntervalSearch, SearchContext};
use crate::segment::{Segment, Segments};
use crate::tank::{self, Tank};
use crate::time;

/// Minimum bars to keep in the first tank, even for shallow dives.
pub const DEFAULT_PRIMARY_RESERVE: f64 = 30.0;

/// Minimum bars to keep in a stage tank, even for shallow dives.
pub const DEFAULT_STAGE_RESERVE: f64 = 20.0;

/// Descent, bottom and ascent at least.
const MIN_PROFILE_SEGMENTS: usize = 2;

/// Liters of gas still to be consumed, per gas.
#[derive(Debug, Clone, Default)]
pub struct GasVolumes {
    remaining: HashMap<Gas, f64>,
}

impl GasVolumes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liters for the gas, 0 for gases never set.
    pub fn get(&self, gas: &Gas) -> f64 {
        self.remaining.get(gas).copied().unwrap_or(0.0)
    }

    /// Negative volumes are stored as 0.
    pub fn set(&mut self, gas: Gas, liters: f64) {
        self.remaining.insert(gas, liters.max(0.0));
    }

    fn add(&mut self, gas: Gas, liters: f64) {
        self.set(gas, self.get(&gas) + liters);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionOptions {
    pub diver: Diver,
    /// Minimum reserve of the first tank in bars
    pub primary_tank_reserve: f64,
    /// Minimum reserve of all other tanks in bars
    pub stage_tank_reserve: f64,
}

impl Default for ConsumptionOptions {
    fn default() -> Self {
        Self {
            diver: Diver::default(),
            primary_tank_reserve: DEFAULT_PRIMARY_RESERVE,
            stage_tank_reserve: DEFAULT_STAGE_RESERVE,
        }
    }
}

impl ConsumptionOptions {
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        serde_json::from_str(json).map_err(|e| PlanError::InvalidOptions(e.to_string()))
    }

    fn minimal_reserve(&self, tank_index: usize) -> f64 {
        if tank_index == 0 {
            self.primary_tank_reserve
        } else {
            self.stage_tank_reserve
        }
    }
}

/// Pressure a consumption pass is not allowed to go below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Floor {
    Reserve,
    Empty,
}

impl Floor {
    fn pressure(self, tank: &Tank) -> f64 {
        match self {
            Floor::Reserve => tank.reserve,
            Floor::Empty => 0.0,
        }
    }
}

/// Calculates tank consumption, reserves and the maximum bottom time.
#[derive(Debug, Clone)]
pub struct Consumption<P = BuhlmannAlgorithm> {
    converter: DepthConverter,
    planner: P,
}

impl Consumption<BuhlmannAlgorithm> {
    pub fn new(converter: DepthConverter) -> Self {
        Self::with_planner(converter, BuhlmannAlgorithm)
    }
}

impl<P: DecompressionPlanner> Consumption<P> {
    pub fn with_planner(converter: DepthConverter, planner: P) -> Self {
        Self { converter, planner }
    }

    /// Updates consumption and reserve of `tanks` for the calculated profile.
    ///
    /// The emergency ascent used for the reserve is planned from the end of the
    /// deepest part of `segments`, which re-runs the decompression.
    pub fn consume_from_tanks(
        &self,
        segments: &[Segment],
        options: &Options,
        tanks: &mut [Tank],
        consumption_options: &ConsumptionOptions,
        surface_interval: Option<&RestingParameters>,
    ) -> Result<(), PlanError> {
        check_profile(segments)?;
        check_tanks(segments, tanks)?;
        let ascent = emergency_ascent(&self.planner, segments, options, tanks, surface_interval)?;
        self.consume_from_tanks_with_ascent(segments, &ascent, tanks, consumption_options)
    }

    /// Same as [`Consumption::consume_from_tanks`] with an already planned emergency ascent.
    ///
    /// All arguments are checked before any tank is modified.
    pub fn consume_from_tanks_with_ascent(
        &self,
        segments: &[Segment],
        emergency_ascent: &[Segment],
        tanks: &mut [Tank],
        consumption_options: &ConsumptionOptions,
    ) -> Result<(), PlanError> {
        check_profile(segments)?;
        if emergency_ascent.is_empty() {
            return Err(PlanError::EmptyEmergencyAscent);
        }
        check_tanks(segments, tanks)?;
        check_tanks(emergency_ascent, tanks)?;

        tank::reset_consumption(tanks);
        // reserve has to be known first to be able to keep it
        self.update_reserve(emergency_ascent, tanks, consumption_options);

        let diver = &consumption_options.diver;
        let normal = |_: &Segment| RateSelector::Normal;
        let mut remaining = GasVolumes::new();
        self.to_be_consumed_yet(segments, &mut remaining, diver, normal, |s| s.tank.is_some());

        // assigned tanks first, their reserve can be used only by their own segments
        let rmv = diver.rmv;
        self.consume_by_segment_tanks(segments, tanks, &mut remaining, Floor::Reserve, |s, _| {
            self.consumed_by_segment(s, rmv)
        });
        self.consume_by_segment_tanks(segments, tanks, &mut remaining, Floor::Empty, |_, left| {
            left
        });

        self.to_be_consumed_yet(segments, &mut remaining, diver, normal, |s| s.tank.is_none());
        consume_by_gases(tanks, &mut remaining, Floor::Reserve);
        consume_by_gases(tanks, &mut remaining, Floor::Empty);
        round_consumed_to_bars(tanks);

        debug!(
            tanks = tanks.len(),
            segments = segments.len(),
            have_reserve = tank::have_reserve(tanks),
            "consumption calculated"
        );
        Ok(())
    }

    /// Longest dive in minutes, extending the last segment of `source_segments`,
    /// for which all tanks keep their reserve.
    ///
    /// Returns 0 if the source profile alone already uses the reserve. On return
    /// the tanks hold the consumption of the found dive.
    pub fn calculate_max_bottom_time(
        &self,
        source_segments: &Segments,
        tanks: &mut [Tank],
        consumption_options: &ConsumptionOptions,
        options: &Options,
        surface_interval: Option<&RestingParameters>,
    ) -> Result<u32, PlanError> {
        let last = source_segments.last().ok_or(PlanError::TooFewSegments {
            required: 1,
            got: 0,
        })?;
        check_tanks(source_segments.as_slice(), tanks)?;

        let mut segments = source_segments.clone();
        segments.add_flat(last.gas, 0.0);
        let mut context = BottomTimeContext {
            consumption: self,
            segments,
            tanks,
            consumption_options,
            options,
            surface_interval,
            outcome: Ok(()),
        };

        let added = BinaryIntervalSearch::new().search(&mut context)?;
        // leave the tanks consumed for the found duration
        context.evaluate(added)?;
        debug!(added, "max bottom time found");

        if added == 0.0 {
            return Ok(0);
        }

        let total = time::to_minutes(source_segments.duration() + added);
        Ok(precision::floor(total) as u32)
    }

    fn consume_from_profile(
        &self,
        segments: &Segments,
        tanks: &mut [Tank],
        consumption_options: &ConsumptionOptions,
        options: &Options,
        surface_interval: Option<&RestingParameters>,
    ) -> Result<(), PlanError> {
        let gases = tank::to_gases(tanks);
        let profile = self
            .planner
            .decompression(segments, &gases, options, surface_interval)?;
        self.consume_from_tanks(
            &profile.segments,
            options,
            tanks,
            consumption_options,
            surface_interval,
        )
    }

    fn update_reserve(
        &self,
        emergency_ascent: &[Segment],
        tanks: &mut [Tank],
        consumption_options: &ConsumptionOptions,
    ) {
        // the ascent starts at the bottom, so its tank is the one shared with the buddy
        let bottom_tank = emergency_ascent.first().and_then(|s| s.tank).unwrap_or(0);
        let bottom_gas = tanks[bottom_tank].gas;
        let rate = |segment: &Segment| reserve_rate(segment, bottom_tank, bottom_gas);

        let mut owed = GasVolumes::new();
        self.to_be_consumed_yet(
            emergency_ascent,
            &mut owed,
            &consumption_options.diver,
            rate,
            |_| true,
        );

        for (index, tank) in tanks.iter_mut().enumerate() {
            let liters = owed.get(&tank.gas);
            let bars = precision::ceil(liters / tank.size).min(tank.start_pressure);
            tank.reserve = bars.max(consumption_options.minimal_reserve(index));
            owed.set(tank.gas, liters - tank.reserve * tank.size);
            trace!(index, reserve = tank.reserve, "tank reserve");
        }
    }

    /// Consumes `demand` of each segment with an assigned tank from that tank.
    ///
    /// `demand` gets the segment and the liters still to be consumed for its gas.
    fn consume_by_segment_tanks(
        &self,
        segments: &[Segment],
        tanks: &mut [Tank],
        remaining: &mut GasVolumes,
        floor: Floor,
        demand: impl Fn(&Segment, f64) -> f64,
    ) {
        for segment in segments {
            let Some(index) = segment.tank else {
                continue;
            };

            let left = remaining.get(&segment.gas);
            let consumed = consume_from_tank(&mut tanks[index], demand(segment, left), floor);
            remaining.set(segment.gas, left - consumed);
        }
    }

    /// The only place where demand is added.
    fn to_be_consumed_yet(
        &self,
        segments: &[Segment],
        remaining: &mut GasVolumes,
        diver: &Diver,
        rate: impl Fn(&Segment) -> RateSelector,
        include: impl Fn(&Segment) -> bool,
    ) {
        for segment in segments.iter().filter(|&s| include(s)) {
            let rmv = diver.rmv_for(rate(segment));
            remaining.add(segment.gas, self.consumed_by_segment(segment, rmv));
        }
    }

    /// Liters consumed at the average depth of the segment with `rmv` in liters per minute.
    fn consumed_by_segment(&self, segment: &Segment, rmv: f64) -> f64 {
        let average_pressure = self.converter.to_bar(segment.average_depth());
        let duration = precision::round_two_decimals(segment.duration);
        duration * average_pressure * (rmv / time::ONE_MINUTE)
    }
}

/// Bottom gas is shared with the buddy, any other gas is breathed alone.
fn reserve_rate(segment: &Segment, bottom_tank: usize, bottom_gas: Gas) -> RateSelector {
    if segment.tank == Some(bottom_tank) || segment.gas == bottom_gas {
        return RateSelector::TeamStress;
    }

    RateSelector::Stress
}

/// Distributes the remaining demand over all tanks with the same gas,
/// starting from the last tank, so stages are consumed first.
fn consume_by_gases(tanks: &mut [Tank], remaining: &mut GasVolumes, floor: Floor) {
    for tank in tanks.iter_mut().rev() {
        let gas = tank.gas;
        let left = remaining.get(&gas);
        let consumed = consume_from_tank(tank, left, floor);
        remaining.set(gas, left - consumed);
    }
}

/// Returns liters really consumed, limited by the gas above the floor.
fn consume_from_tank(tank: &mut Tank, liters: f64, floor: Floor) -> f64 {
    let available_bars = (tank.end_pressure() - floor.pressure(tank)).max(0.0);
    let available = available_bars * tank.size;
    let consumed = liters.min(available).max(0.0);
    if consumed > 0.0 {
        tank.consumed += consumed / tank.size;
    }
    consumed
}

fn round_consumed_to_bars(tanks: &mut [Tank]) {
    for tank in tanks {
        tank.consumed = precision::ceil(tank.consumed);
    }
}

fn check_profile(segments: &[Segment]) -> Result<(), PlanError> {
    if segments.len() < MIN_PROFILE_SEGMENTS {
        return Err(PlanError::TooFewSegments {
            required: MIN_PROFILE_SEGMENTS,
            got: segments.len(),
        });
    }
    Ok(())
}

fn check_tanks(segments: &[Segment], tanks: &[Tank]) -> Result<(), PlanError> {
    if tanks.is_empty() {
        return Err(PlanError::NoTanks);
    }

    if tanks.iter().any(|tank| tank.size <= 0.0) {
        return Err(PlanError::InvalidOptions("tank size has to be positive".to_string()));
    }

    if let Some(index) = segments
        .iter()
        .filter_map(|s| s.tank)
        .find(|index| *index >= tanks.len())
    {
        return Err(PlanError::UnknownTank {
            index,
            count: tanks.len(),
        });
    }

    Ok(())
}

/// Prolongs the last segment of the test profile by the searched duration.
struct BottomTimeContext<'a, P> {
    consumption: &'a Consumption<P>,
    segments: Segments,
    tanks: &'a mut [Tank],
    consumption_options: &'a ConsumptionOptions,
    options: &'a Options,
    surface_interval: Option<&'a RestingParameters>,
    outcome: Result<(), PlanError>,
}

impl<P: DecompressionPlanner> BottomTimeContext<'_, P> {
    fn evaluate(&mut self, added: f64) -> Result<(), PlanError> {
        if let Some(last) = self.segments.last_mut() {
            last.duration = added;
        }

        self.consumption.consume_from_profile(
            &self.segments,
            self.tanks,
            self.consumption_options,
            self.options,
            self.surface_interval,
        )
    }
}

impl<P: DecompressionPlanner> SearchContext for BottomTimeContext<'_, P> {
    fn estimation_step(&self) -> f64 {
        // typical dive duration
        40.0 * time::ONE_MINUTE
    }

    fn initial_value(&self) -> f64 {
        0.0
    }

    fn max_value(&self) -> f64 {
        time::ONE_DAY
    }

    fn do_work(&mut self, value: f64) {
        self.outcome = self.evaluate(value);
        if let Err(error) = &self.outcome {
            debug!(value, %error, "bottom time candidate failed");
        }
    }

    fn meets_condition(&self) -> bool {
        self.outcome.is_ok() && tank::have_reserve(self.tanks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumption() -> Consumption {
        Consumption::new(DepthConverter::for_salt_water())
    }

    fn ean50() -> Gas {
        Gas::from_percent(50, 0).unwrap()
    }

    /// Descent to `depth` in 2 minutes, bottom, ascent in 2 minutes.
    fn square_dive(depth: f64, total_minutes: f64, tank: Option<usize>) -> Vec<Segment> {
        let bottom = (total_minutes - 4.0) * 60.0;
        let mut segments = vec![
            Segment::new(0.0, depth, Gas::AIR, 120.0),
            Segment::new(depth, depth, Gas::AIR, bottom),
            Segment::new(depth, 0.0, Gas::AIR, 120.0),
        ];
        if let Some(index) = tank {
            segments = segments.into_iter().map(|s| s.with_tank(index)).collect();
        }
        segments
    }

    fn short_ascent(depth: f64, tank: Option<usize>) -> Vec<Segment> {
        let ascent = Segment::new(depth, 0.0, Gas::AIR, 120.0);
        vec![match tank {
            Some(index) => ascent.with_tank(index),
            None => ascent,
        }]
    }

    fn source_profile(depth: f64, bottom_minutes: f64) -> Segments {
        let mut segments = Segments::new();
        segments.push(Segment::new(0.0, depth, Gas::AIR, depth / 18.0 * 60.0).with_tank(0));
        segments.push(Segment::new(depth, depth, Gas::AIR, bottom_minutes * 60.0).with_tank(0));
        segments
    }

    #[test]
    fn test_gas_volumes() {
        let mut volumes = GasVolumes::new();
        assert_eq!(volumes.get(&Gas::AIR), 0.0);
        volumes.set(Gas::AIR, 120.5);
        assert_eq!(volumes.get(&Gas::AIR), 120.5);
        volumes.set(Gas::AIR, -10.0);
        assert_eq!(volumes.get(&Gas::AIR), 0.0);
        volumes.add(ean50(), 10.0);
        volumes.add(ean50(), 5.0);
        assert_eq!(volumes.get(&ean50()), 15.0);
    }

    #[test]
    fn test_consumption_options_from_json() {
        let options =
            ConsumptionOptions::from_json(r#"{"diver": {"rmv": 15}, "stage_tank_reserve": 35}"#)
                .unwrap();
        assert_eq!(options.diver.rmv, 15.0);
        assert_eq!(options.diver.stress_rmv, 30.0);
        assert_eq!(options.primary_tank_reserve, DEFAULT_PRIMARY_RESERVE);
        assert_eq!(options.stage_tank_reserve, 35.0);
    }

    /// Liters needed for `segments` breathed at `rmv`.
    fn demand(engine: &Consumption, segments: &[Segment], rmv: f64) -> f64 {
        segments
            .iter()
            .map(|s| engine.consumed_by_segment(s, rmv))
            .sum()
    }

    #[test]
    fn test_short_ascent_keeps_minimal_reserve() {
        let engine = consumption();
        let dive = square_dive(20.0, 30.0, Some(0));
        let mut tanks = vec![Tank::new(11.1, 200.0, Gas::AIR)];
        engine
            .consume_from_tanks_with_ascent(
                &dive,
                &short_ascent(20.0, Some(0)),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        // 2 min descent, 26 min bottom, 2 min ascent at 20 l/min
        let expected = precision::ceil(demand(&engine, &dive, 20.0) / 11.1);
        assert_eq!(expected, 157.0);
        assert_eq!(tanks[0].consumed, expected);
        assert_eq!(tanks[0].reserve, DEFAULT_PRIMARY_RESERVE);
        assert!(tanks[0].has_reserve());
    }

    #[test]
    fn test_single_tank_reserve_from_planned_emergency_ascent() {
        let engine = consumption();
        let options = Options::default();
        let consumption_options = ConsumptionOptions::default();
        let mut tanks = vec![Tank::new(11.1, 200.0, Gas::AIR)];
        let profile = BuhlmannAlgorithm
            .decompression(
                &source_profile(20.0, 28.0),
                &tank::to_gases(&tanks),
                &options,
                None,
            )
            .unwrap();

        engine
            .consume_from_tanks(
                &profile.segments,
                &options,
                &mut tanks,
                &consumption_options,
                None,
            )
            .unwrap();

        let ascent =
            emergency_ascent(&BuhlmannAlgorithm, &profile.segments, &options, &tanks, None)
                .unwrap();
        let team_stress = consumption_options.diver.rmv_for(RateSelector::TeamStress);
        let owed = precision::ceil(demand(&engine, &ascent, team_stress) / 11.1);
        let expected_reserve = owed.clamp(DEFAULT_PRIMARY_RESERVE, 200.0);
        assert!(tanks[0].reserve > DEFAULT_PRIMARY_RESERVE);
        assert_eq!(tanks[0].reserve, expected_reserve);

        let expected_consumed = precision::ceil(demand(&engine, &profile.segments, 20.0) / 11.1);
        assert_eq!(tanks[0].consumed, expected_consumed);
        assert_eq!(tanks[0].has_reserve(), expected_consumed <= 200.0 - expected_reserve);
    }

    #[test]
    fn test_stage_tank_is_consumed_first() {
        let mut tanks = vec![
            Tank::new(24.0, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, Gas::AIR),
        ];
        // 60 min at 20 m, 3640 l at 20 l/min
        let segments = vec![
            Segment::new(20.0, 20.0, Gas::AIR, 1800.0),
            Segment::new(20.0, 20.0, Gas::AIR, 1800.0),
        ];
        consumption()
            .consume_from_tanks_with_ascent(
                &segments,
                &short_ascent(20.0, None),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        assert_eq!(tanks[0].reserve, DEFAULT_PRIMARY_RESERVE);
        assert_eq!(tanks[1].reserve, DEFAULT_STAGE_RESERVE);
        assert_eq!(tanks[1].end_pressure(), tanks[1].reserve);
        assert_eq!(tanks[0].consumed, 69.0);
    }

    #[test]
    fn test_primary_untouched_while_stage_covers_demand() {
        let mut tanks = vec![
            Tank::new(24.0, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, Gas::AIR),
        ];
        let segments = vec![
            Segment::new(20.0, 20.0, Gas::AIR, 600.0),
            Segment::new(20.0, 20.0, Gas::AIR, 600.0),
        ];
        consumption()
            .consume_from_tanks_with_ascent(
                &segments,
                &short_ascent(20.0, None),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        assert_eq!(tanks[0].consumed, 0.0);
        assert_eq!(tanks[1].consumed, 110.0);
    }

    #[test]
    fn test_assigned_tank_is_consumed() {
        let mut tanks = vec![
            Tank::new(15.0, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, Gas::AIR),
        ];
        consumption()
            .consume_from_tanks_with_ascent(
                &square_dive(20.0, 30.0, Some(0)),
                &short_ascent(20.0, Some(0)),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        assert!(tanks[0].consumed > 0.0);
        assert_eq!(tanks[1].consumed, 0.0);
    }

    #[test]
    fn test_assigned_tank_overflows_to_gas_pool() {
        let mut tanks = vec![
            Tank::new(11.1, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, Gas::AIR),
        ];
        // 60 min at 20 m needs more than the first tank holds
        consumption()
            .consume_from_tanks_with_ascent(
                &square_dive(20.0, 60.0, Some(0)),
                &short_ascent(20.0, Some(0)),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        assert_eq!(tanks[0].end_pressure(), 0.0);
        assert!(tanks[1].consumed > 0.0);
    }

    #[test]
    fn test_empty_tank_when_demand_exceeds_reserve() {
        let mut tanks = vec![Tank::new(11.1, 200.0, Gas::AIR)];
        let segments = vec![
            Segment::new(20.0, 20.0, Gas::AIR, 1800.0),
            Segment::new(20.0, 20.0, Gas::AIR, 1800.0),
        ];
        consumption()
            .consume_from_tanks_with_ascent(
                &segments,
                &short_ascent(20.0, None),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        assert_eq!(tanks[0].consumed, 200.0);
        assert!(!tanks[0].has_reserve());
        assert!(!tank::have_reserve(&tanks));
    }

    #[test]
    fn test_reserve_is_capped_by_start_pressure() {
        let mut tanks = vec![Tank::new(3.0, 50.0, Gas::AIR)];
        let long_ascent = vec![Segment::new(40.0, 0.0, Gas::AIR, 3600.0)];
        consumption()
            .consume_from_tanks_with_ascent(
                &square_dive(10.0, 10.0, None),
                &long_ascent,
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();
        assert_eq!(tanks[0].reserve, 50.0);
    }

    #[test]
    fn test_reserve_is_not_reserved_twice() {
        let mut tanks = vec![
            Tank::new(24.0, 200.0, Gas::AIR),
            Tank::new(24.0, 200.0, Gas::AIR),
        ];
        // team stress 60 l/min at 40 m => about 300 bars of the first tank
        let ascent = vec![Segment::new(40.0, 40.0, Gas::AIR, 1200.0)];
        consumption()
            .consume_from_tanks_with_ascent(
                &square_dive(10.0, 10.0, None),
                &ascent,
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        assert_eq!(tanks[0].reserve, 200.0);
        assert!(tanks[1].reserve > DEFAULT_STAGE_RESERVE);
        assert!(tanks[1].reserve < 200.0);
    }

    #[test]
    fn test_reserve_uses_stress_rmv_for_other_gases() {
        let options = ConsumptionOptions::default();
        let deco_ascent = vec![
            Segment::new(20.0, 20.0, Gas::AIR, 60.0).with_tank(0),
            Segment::new(20.0, 0.0, ean50(), 600.0),
        ];
        let mut tanks = vec![
            Tank::new(24.0, 200.0, Gas::AIR),
            Tank::new(5.0, 200.0, ean50()),
        ];
        let engine = consumption();
        engine
            .consume_from_tanks_with_ascent(
                &square_dive(20.0, 20.0, Some(0)),
                &deco_ascent,
                &mut tanks,
                &options,
            )
            .unwrap();

        let expected = engine.consumed_by_segment(&deco_ascent[1], options.diver.stress_rmv);
        assert_eq!(tanks[1].reserve, precision::ceil(expected / 5.0));
    }

    #[test]
    fn test_minimal_reserves() {
        let options = ConsumptionOptions {
            primary_tank_reserve: 50.0,
            stage_tank_reserve: 40.0,
            ..ConsumptionOptions::default()
        };
        let mut tanks = vec![
            Tank::new(24.0, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, ean50()),
            Tank::new(11.1, 200.0, Gas::OXYGEN),
        ];
        consumption()
            .consume_from_tanks_with_ascent(
                &square_dive(10.0, 10.0, Some(0)),
                &short_ascent(10.0, Some(0)),
                &mut tanks,
                &options,
            )
            .unwrap();

        assert!(tanks[0].reserve >= 50.0);
        assert_eq!(tanks[1].reserve, 40.0);
        assert_eq!(tanks[2].reserve, 40.0);
    }

    #[test]
    fn test_unmatched_gas_is_not_consumed() {
        let mut tanks = vec![Tank::new(11.1, 200.0, Gas::AIR)];
        let segments = vec![
            Segment::new(0.0, 6.0, ean50(), 60.0),
            Segment::new(6.0, 6.0, ean50(), 600.0),
        ];
        consumption()
            .consume_from_tanks_with_ascent(
                &segments,
                &short_ascent(6.0, None),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();
        assert_eq!(tanks[0].consumed, 0.0);
    }

    #[test]
    fn test_consumed_is_whole_bars() {
        let mut tanks = vec![
            Tank::new(12.0, 232.0, Gas::AIR),
            Tank::new(7.0, 200.0, ean50()),
        ];
        let mut segments = square_dive(27.0, 33.0, Some(0));
        segments.push(Segment::new(0.0, 0.0, ean50(), 61.3));
        consumption()
            .consume_from_tanks_with_ascent(
                &segments,
                &short_ascent(27.0, Some(0)),
                &mut tanks,
                &ConsumptionOptions::default(),
            )
            .unwrap();

        for tank in &tanks {
            assert!(tank.consumed >= 0.0);
            assert_eq!(tank.consumed.fract(), 0.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let engine = consumption();
        let options = Options::default();
        let profile = BuhlmannAlgorithm
            .decompression(&source_profile(30.0, 20.0), &[Gas::AIR], &options, None)
            .unwrap();
        let mut tanks = vec![Tank::new(15.0, 200.0, Gas::AIR)];

        let consumption_options = ConsumptionOptions::default();
        engine
            .consume_from_tanks(&profile.segments, &options, &mut tanks, &consumption_options, None)
            .unwrap();
        let first = tanks.clone();
        engine
            .consume_from_tanks(&profile.segments, &options, &mut tanks, &consumption_options, None)
            .unwrap();
        assert_eq!(first, tanks);
    }

    #[test]
    fn test_consumption_grows_with_rmv() {
        let engine = consumption();
        let segments = square_dive(25.0, 40.0, None);
        let ascent = short_ascent(25.0, None);
        let mut previous = vec![0.0, 0.0];

        for rmv in [10.0, 15.0, 20.0, 25.0, 40.0] {
            let options = ConsumptionOptions {
                diver: Diver::new(rmv, 30.0),
                ..ConsumptionOptions::default()
            };
            let mut tanks = vec![
                Tank::new(24.0, 200.0, Gas::AIR),
                Tank::new(11.1, 200.0, Gas::AIR),
            ];
            engine
                .consume_from_tanks_with_ascent(&segments, &ascent, &mut tanks, &options)
                .unwrap();
            let consumed: Vec<f64> = tanks.iter().map(|t| t.consumed).collect();
            for (now, before) in consumed.iter().zip(&previous) {
                assert!(now >= before, "rmv {rmv}: {consumed:?} < {previous:?}");
            }
            previous = consumed;
        }
    }

    #[test]
    fn test_full_consumption_keeps_minimal_reserve() {
        let engine = consumption();
        let options = Options::default();
        let profile = BuhlmannAlgorithm
            .decompression(&source_profile(20.0, 30.0), &[Gas::AIR], &options, None)
            .unwrap();
        let mut tanks = vec![Tank::new(24.0, 200.0, Gas::AIR)];
        let consumption_options = ConsumptionOptions::default();
        engine
            .consume_from_tanks(&profile.segments, &options, &mut tanks, &consumption_options, None)
            .unwrap();

        assert!(tanks[0].reserve >= DEFAULT_PRIMARY_RESERVE);
        assert!(tanks[0].consumed > 0.0);
        assert!(tanks[0].has_reserve());
    }

    #[test]
    fn test_invalid_arguments_keep_tanks() {
        let engine = consumption();
        let options = ConsumptionOptions::default();
        let mut configured = Tank::new(11.1, 200.0, Gas::AIR);
        configured.consumed = 5.0;
        configured.reserve = 7.0;
        let mut tanks = vec![configured.clone()];

        let result = engine.consume_from_tanks_with_ascent(
            &square_dive(20.0, 30.0, None)[..1],
            &short_ascent(20.0, None),
            &mut tanks,
            &options,
        );
        assert_eq!(
            result,
            Err(PlanError::TooFewSegments {
                required: 2,
                got: 1
            })
        );

        let dive = square_dive(20.0, 30.0, None);
        let result = engine.consume_from_tanks_with_ascent(&dive, &[], &mut tanks, &options);
        assert_eq!(result, Err(PlanError::EmptyEmergencyAscent));

        let result = engine.consume_from_tanks_with_ascent(
            &square_dive(20.0, 30.0, Some(2)),
            &short_ascent(20.0, None),
            &mut tanks,
            &options,
        );
        assert_eq!(result, Err(PlanError::UnknownTank { index: 2, count: 1 }));

        let result = engine.consume_from_tanks(
            &square_dive(20.0, 30.0, None)[..1],
            &Options::default(),
            &mut tanks,
            &options,
            None,
        );
        assert!(matches!(result, Err(PlanError::TooFewSegments { .. })));

        assert_eq!(tanks, vec![configured]);

        let result = engine.consume_from_tanks_with_ascent(
            &square_dive(20.0, 30.0, None),
            &short_ascent(20.0, None),
            &mut [],
            &options,
        );
        assert_eq!(result, Err(PlanError::NoTanks));
    }

    #[test]
    fn test_tank_without_size_is_rejected() {
        let engine = consumption();
        let mut tanks = vec![
            Tank::new(11.1, 200.0, Gas::AIR),
            Tank::new(0.0, 200.0, Gas::AIR),
        ];
        let result = engine.consume_from_tanks_with_ascent(
            &square_dive(20.0, 30.0, None),
            &short_ascent(20.0, None),
            &mut tanks,
            &ConsumptionOptions::default(),
        );
        assert!(matches!(result, Err(PlanError::InvalidOptions(_))));
        assert_eq!(tanks[1].reserve, 0.0);

        let result = engine.calculate_max_bottom_time(
            &source_profile(20.0, 10.0),
            &mut [Tank::new(-1.0, 200.0, Gas::AIR)],
            &ConsumptionOptions::default(),
            &Options::default(),
            None,
        );
        assert!(matches!(result, Err(PlanError::InvalidOptions(_))));
    }

    #[test]
    fn test_max_bottom_time() {
        let engine = consumption();
        let source = source_profile(20.0, 10.0);
        let mut tanks = vec![Tank::new(15.0, 200.0, Gas::AIR)];
        let minutes = engine
            .calculate_max_bottom_time(
                &source,
                &mut tanks,
                &ConsumptionOptions::default(),
                &Options::default(),
                None,
            )
            .unwrap();

        assert!(minutes as f64 > time::to_minutes(source.duration()));
        assert!(tank::have_reserve(&tanks));
        assert_eq!(source.len(), 2, "source profile is not modified");
    }

    /// Plans `source` prolonged to `total` seconds at its last depth and consumes it.
    fn consume_prolonged(source: &Segments, total: f64, tank_size: f64) -> Vec<Tank> {
        let options = Options::default();
        let mut tanks = vec![Tank::new(tank_size, 200.0, Gas::AIR)];
        let mut prolonged = source.clone();
        prolonged.add_flat(Gas::AIR, total - source.duration());
        let profile = BuhlmannAlgorithm
            .decompression(&prolonged, &tank::to_gases(&tanks), &options, None)
            .unwrap();
        consumption()
            .consume_from_tanks(
                &profile.segments,
                &options,
                &mut tanks,
                &ConsumptionOptions::default(),
                None,
            )
            .unwrap();
        tanks
    }

    #[test]
    fn test_max_bottom_time_keeps_reserve_when_planned() {
        for (depth, tank_size) in [(20.0, 15.0), (30.0, 24.0), (18.0, 11.1)] {
            let source = source_profile(depth, 10.0);
            let mut tanks = vec![Tank::new(tank_size, 200.0, Gas::AIR)];
            let minutes = consumption()
                .calculate_max_bottom_time(
                    &source,
                    &mut tanks,
                    &ConsumptionOptions::default(),
                    &Options::default(),
                    None,
                )
                .unwrap();
            let total = f64::from(minutes) * time::ONE_MINUTE;

            let planned = consume_prolonged(&source, total, tank_size);
            assert!(tank::have_reserve(&planned), "{depth} m, {minutes} min");

            let longer = consume_prolonged(&source, total + 2.0 * time::ONE_MINUTE, tank_size);
            assert!(!tank::have_reserve(&longer), "{depth} m, {minutes} + 2 min");
        }
    }

    #[test]
    fn test_max_bottom_time_decreases_with_rmv() {
        let engine = consumption();
        let source = source_profile(30.0, 10.0);
        let mut results = Vec::new();
        for rmv in [15.0, 20.0, 30.0] {
            let mut tanks = vec![Tank::new(24.0, 200.0, Gas::AIR)];
            let options = ConsumptionOptions {
                diver: Diver::new(rmv, 30.0),
                ..ConsumptionOptions::default()
            };
            let minutes = engine
                .calculate_max_bottom_time(&source, &mut tanks, &options, &Options::default(), None)
                .unwrap();
            results.push(minutes);
        }
        assert!(results.windows(2).all(|w| w[0] >= w[1]), "{results:?}");
    }

    #[test]
    fn test_max_bottom_time_zero_when_gas_is_exhausted() {
        let engine = consumption();
        let source = source_profile(30.0, 60.0);
        let mut tanks = vec![Tank::new(3.0, 200.0, Gas::AIR)];
        let minutes = engine
            .calculate_max_bottom_time(
                &source,
                &mut tanks,
                &ConsumptionOptions::default(),
                &Options::default(),
                None,
            )
            .unwrap();
        assert_eq!(minutes, 0);
        assert!(!tanks[0].has_reserve());
    }

    #[test]
    fn test_max_bottom_time_empty_profile() {
        let result = consumption().calculate_max_bottom_time(
            &Segments::new(),
            &mut [Tank::new(15.0, 200.0, Gas::AIR)],
            &ConsumptionOptions::default(),
            &Options::default(),
            None,
        );
        assert!(matches!(result, Err(PlanError::TooFewSegments { .. })));
    }

    #[test]
    fn test_max_bottom_time_invalid_options() {
        let result = consumption().calculate_max_bottom_time(
            &source_profile(20.0, 10.0),
            &mut [Tank::new(15.0, 200.0, Gas::AIR)],
            &ConsumptionOptions::default(),
            &Options::with_gradient_factors(0.9, 0.3),
            None,
        );
        assert!(matches!(result, Err(PlanError::InvalidOptions(_))));
    }
}

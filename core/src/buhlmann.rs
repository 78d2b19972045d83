//! Bühlmann ZHL-16C decompression planner with gradient factors.
//!
//! Loads a 16-compartment tissue model along the planned segments and
//! generates the ascent to the surface: gas switches to the best available
//! deco gas, deco stops on the configured stop ladder and the safety stop.
//! The gradient factor slope is anchored at the first stop estimated with
//! GF low at the end of the planned segments.

use tracing::{debug, trace};

use crate::depth_levels::DepthLevels;
use crate::error::PlanError;
use crate::gas::Gas;
use crate::options::Options;
use crate::physics::DepthConverter;
use crate::precision;
use crate::segment::{Segment, Segments};
use crate::time;

// ============================================================================
// Physical Constants
// ============================================================================

/// Water vapour pressure in the lungs (bar), at 37°C.
const P_WATER_VAPOR: f64 = 0.0627;

/// Stops are extended in whole minutes.
const STOP_INCREMENT: f64 = time::ONE_MINUTE;

/// Longest time the planner is willing to wait at a single stop.
const MAX_STOP_DURATION: f64 = time::ONE_DAY;

/// Ceiling tolerance in meters when comparing to a stop depth.
const CEILING_TOLERANCE: f64 = 1e-6;

// ============================================================================
// ZHL-16C Compartment Constants (Bühlmann / Baker)
// ============================================================================

const NUM_COMPARTMENTS: usize = 16;

/// N2 half-times in minutes for compartments 1–16 (ZHL-16C).
const N2_HALF_TIMES: [f64; NUM_COMPARTMENTS] = [
    5.0, 8.0, 12.5, 18.5, 27.0, 38.3, 54.3, 77.0, 109.0, 146.0, 187.0, 239.0, 305.0, 390.0, 498.0,
    635.0,
];

/// He half-times in minutes for compartments 1–16 (ZHL-16C).
const HE_HALF_TIMES: [f64; NUM_COMPARTMENTS] = [
    1.88, 3.02, 4.72, 6.99, 10.21, 14.48, 20.53, 29.11, 41.20, 55.19, 70.69, 90.34, 115.29, 147.42,
    188.24, 240.03,
];

/// N2 'a' coefficients (bar) for ZHL-16C.
const A_N2: [f64; NUM_COMPARTMENTS] = [
    1.1696, 1.0000, 0.8618, 0.7562, 0.6200, 0.5043, 0.4410, 0.4000, 0.3750, 0.3500, 0.3295, 0.3065,
    0.2835, 0.2610, 0.2480, 0.2327,
];

/// N2 'b' coefficients (dimensionless) for ZHL-16C.
const B_N2: [f64; NUM_COMPARTMENTS] = [
    0.5578, 0.6514, 0.7222, 0.7825, 0.8126, 0.8434, 0.8693, 0.8910, 0.9092, 0.9222, 0.9319, 0.9403,
    0.9477, 0.9544, 0.9602, 0.9653,
];

/// He 'a' coefficients (bar) for ZHL-16C.
const A_HE: [f64; NUM_COMPARTMENTS] = [
    1.6189, 1.3830, 1.1919, 1.0458, 0.9220, 0.8205, 0.7305, 0.6502, 0.5950, 0.5545, 0.5333, 0.5189,
    0.5181, 0.5176, 0.5172, 0.5119,
];

/// He 'b' coefficients (dimensionless) for ZHL-16C.
const B_HE: [f64; NUM_COMPARTMENTS] = [
    0.4770, 0.5747, 0.6527, 0.7223, 0.7582, 0.7957, 0.8279, 0.8553, 0.8757, 0.8903, 0.8997, 0.9073,
    0.9122, 0.9171, 0.9217, 0.9267,
];

// ============================================================================
// Tissue State
// ============================================================================

/// Inert gas loading of the 16 tissue compartments.
#[derive(Debug, Clone, PartialEq)]
pub struct Tissues {
    /// N2 partial pressure in each compartment (bar).
    p_n2: [f64; NUM_COMPARTMENTS],
    /// He partial pressure in each compartment (bar).
    p_he: [f64; NUM_COMPARTMENTS],
}

impl Tissues {
    /// Tissues saturated at the surface breathing air.
    pub fn surface_equilibrium(surface_pressure: f64) -> Self {
        let p_n2_surface = (surface_pressure - P_WATER_VAPOR) * Gas::AIR.n2();
        Self {
            p_n2: [p_n2_surface; NUM_COMPARTMENTS],
            p_he: [0.0; NUM_COMPARTMENTS],
        }
    }

    /// Update all compartments for a time interval using the Haldane equation.
    fn update(&mut self, dt_sec: f64, p_inspired_n2: f64, p_inspired_he: f64) {
        if dt_sec <= 0.0 {
            return;
        }
        for i in 0..NUM_COMPARTMENTS {
            let k_n2 = 2.0_f64.ln() / (N2_HALF_TIMES[i] * 60.0);
            self.p_n2[i] = p_inspired_n2 + (self.p_n2[i] - p_inspired_n2) * (-k_n2 * dt_sec).exp();

            let k_he = 2.0_f64.ln() / (HE_HALF_TIMES[i] * 60.0);
            self.p_he[i] = p_inspired_he + (self.p_he[i] - p_inspired_he) * (-k_he * dt_sec).exp();
        }
    }

    /// Breathe `gas` at constant `ambient_pressure` (bar) for `seconds`.
    pub fn load(&mut self, ambient_pressure: f64, gas: &Gas, seconds: f64) {
        let alveolar = (ambient_pressure - P_WATER_VAPOR).max(0.0);
        self.update(seconds, alveolar * gas.n2(), alveolar * gas.he());
    }

    /// Breathe along the segment, approximated by its average depth.
    pub fn load_segment(&mut self, segment: &Segment, converter: &DepthConverter) {
        let ambient = converter.to_bar(segment.average_depth());
        self.load(ambient, &segment.gas, segment.duration);
    }

    /// Lowest ambient pressure (bar) tolerated by all compartments at gradient factor `gf`.
    pub fn ceiling_pressure(&self, gf: f64) -> f64 {
        (0..NUM_COMPARTMENTS)
            .map(|i| self.tolerated_pressure(i, gf))
            .fold(0.0_f64, f64::max)
    }

    /// Ceiling in meters at gradient factor `gf`.
    pub fn ceiling(&self, gf: f64, converter: &DepthConverter) -> f64 {
        converter.from_bar(self.ceiling_pressure(gf))
    }

    fn tolerated_pressure(&self, i: usize, gf: f64) -> f64 {
        let p_total = self.p_n2[i] + self.p_he[i];

        // Weighted a, b using Workman/Baker method, N2 only for empty tissues
        let (a, b) = if p_total > 1e-10 {
            let a = (A_N2[i] * self.p_n2[i] + A_HE[i] * self.p_he[i]) / p_total;
            let b = (B_N2[i] * self.p_n2[i] + B_HE[i] * self.p_he[i]) / p_total;
            (a, b)
        } else {
            (A_N2[i], B_N2[i])
        };

        (p_total - a * gf) / (gf / b + 1.0 - gf)
    }
}

/// Gradient factor slope from GF low at the first stop to GF high at the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GradientFactors {
    low: f64,
    high: f64,
    /// Depth of the first stop in meters, 0 for no stop dives.
    first_stop: f64,
}

impl GradientFactors {
    fn at(&self, depth: f64) -> f64 {
        if self.first_stop <= 0.0 {
            return self.high;
        }

        if depth >= self.first_stop {
            return self.low;
        }

        self.high + (self.low - self.high) * depth / self.first_stop
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Tissue state after a previous dive and the time spent at the surface since.
#[derive(Debug, Clone, PartialEq)]
pub struct RestingParameters {
    pub tissues: Tissues,
    /// Surface interval in seconds
    pub surface_interval: f64,
}

impl RestingParameters {
    pub fn new(tissues: Tissues, surface_interval: f64) -> Self {
        Self {
            tissues,
            surface_interval,
        }
    }

    fn rested_tissues(&self, surface_pressure: f64) -> Tissues {
        let mut tissues = self.tissues.clone();
        tissues.load(surface_pressure, &Gas::AIR, self.surface_interval);
        tissues
    }
}

/// Result of the planner: the planned segments followed by the generated ascent.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedProfile {
    pub segments: Vec<Segment>,
    /// Tissues at the end of the dive
    pub tissues: Tissues,
    /// Depth of the first deco stop, `None` for no decompression dives
    pub first_stop: Option<f64>,
}

impl CalculatedProfile {
    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    pub fn deco_required(&self) -> bool {
        self.first_stop.is_some()
    }

    /// Resting parameters for a repetitive dive after `surface_interval` seconds.
    pub fn resting(&self, surface_interval: f64) -> RestingParameters {
        RestingParameters::new(self.tissues.clone(), surface_interval)
    }
}

/// Computes the ascent for a planned profile.
pub trait DecompressionPlanner {
    /// Must be deterministic for identical inputs.
    fn decompression(
        &self,
        segments: &Segments,
        gases: &[Gas],
        options: &Options,
        surface_interval: Option<&RestingParameters>,
    ) -> Result<CalculatedProfile, PlanError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuhlmannAlgorithm;

impl BuhlmannAlgorithm {
    pub fn new() -> Self {
        Self
    }
}

impl DecompressionPlanner for BuhlmannAlgorithm {
    fn decompression(
        &self,
        segments: &Segments,
        gases: &[Gas],
        options: &Options,
        surface_interval: Option<&RestingParameters>,
    ) -> Result<CalculatedProfile, PlanError> {
        options.validate()?;
        let converter = options.depth_converter();
        let levels = DepthLevels::new(converter, options);
        let surface_pressure = converter.surface_pressure();

        let mut tissues = match surface_interval {
            Some(resting) => resting.rested_tissues(surface_pressure),
            None => Tissues::surface_equilibrium(surface_pressure),
        };
        for segment in segments {
            tissues.load_segment(segment, &converter);
        }

        let mut profile = segments.clone();
        let Some(last) = segments.last() else {
            return Ok(CalculatedProfile {
                segments: Vec::new(),
                tissues,
                first_stop: None,
            });
        };

        let max_depth = segments.max_depth();
        let low_ceiling = tissues.ceiling(options.gf_low, &converter);
        let gradient = GradientFactors {
            low: options.gf_low,
            high: options.gf_high,
            first_stop: precision::ceil_to_multiple(low_ceiling, options.deco_stop_distance),
        };

        let mut current_gas = last.gas;
        let mut current_depth = last.end_depth;
        let mut first_stop = None;

        while current_depth > 0.0 {
            let better = best_deco_gas(gases, current_depth, options, &converter, current_gas);
            if let Some(better) = better {
                trace!(depth = current_depth, gas = %better, "gas switch");
                current_gas = better;
                let switch_duration = time::to_seconds(options.gas_switch_duration);
                if switch_duration > 0.0 {
                    let switch = profile.add_flat(current_gas, switch_duration);
                    tissues.load_segment(switch, &converter);
                }
            }

            let next_stop = levels.next_stop(current_depth);
            let speed = options.ascent_speed(current_depth, max_depth) / time::ONE_MINUTE;
            let ascent_duration = (current_depth - next_stop) / speed;
            let ascent = Segment::new(current_depth, next_stop, current_gas, ascent_duration);
            let ambient = converter.to_bar(current_depth);
            let gf = gradient.at(next_stop);

            let mut stop_duration = 0.0;
            loop {
                let mut after_ascent = tissues.clone();
                after_ascent.load_segment(&ascent, &converter);
                if after_ascent.ceiling(gf, &converter) <= next_stop + CEILING_TOLERANCE {
                    break;
                }

                if stop_duration >= MAX_STOP_DURATION {
                    return Err(PlanError::DecompressionTooLong {
                        depth: current_depth,
                    });
                }

                if first_stop.is_none() {
                    first_stop = Some(current_depth);
                }
                stop_duration += STOP_INCREMENT;
                tissues.load(ambient, &current_gas, STOP_INCREMENT);
            }

            if levels.add_safety_stop(current_depth, max_depth) {
                let required = time::to_seconds(options.safety_stop_duration);
                if stop_duration < required {
                    tissues.load(ambient, &current_gas, required - stop_duration);
                    stop_duration = required;
                }
            }

            if stop_duration > 0.0 {
                trace!(depth = current_depth, duration = stop_duration, "stop");
                profile.add_flat(current_gas, stop_duration);
            }

            let ascent = profile.push(ascent);
            tissues.load_segment(ascent, &converter);
            current_depth = next_stop;
        }

        debug!(
            planned = segments.len(),
            generated = profile.len() - segments.len(),
            first_stop = ?first_stop,
            "decompression calculated"
        );

        Ok(CalculatedProfile {
            segments: profile.into_vec(),
            tissues,
            first_stop,
        })
    }
}

/// Richest breathable gas at `depth`, if it is richer than the current gas.
fn best_deco_gas(
    gases: &[Gas],
    depth: f64,
    options: &Options,
    converter: &DepthConverter,
    current: Gas,
) -> Option<Gas> {
    let pressure = converter.to_bar(depth);
    let surface_pressure = converter.surface_pressure();
    gases
        .iter()
        .copied()
        .filter(|gas| gas.o2() > current.o2())
        .filter(|gas| gas.is_breathable_at(pressure, options.max_deco_ppo2, surface_pressure))
        .max_by(|a, b| a.o2().total_cmp(&b.o2()).then(b.he().total_cmp(&a.he())))
}

// ============================================================================
// Tests
// ============================================================================

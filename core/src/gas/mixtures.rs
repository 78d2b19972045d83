//! Partial pressure and narcosis formulas over raw fractions and absolute pressures.
//!
//! All depths are absolute pressures in bars, use [`DepthConverter`] to work in meters.

use crate::physics::DepthConverter;

/// Maximum recommended equivalent narcotic depth in meters.
pub const MAX_END: f64 = 30.0;

/// Partial pressure (bar) of a component with `fraction` at `pressure`.
pub fn partial_pressure(pressure: f64, fraction: f64) -> f64 {
    pressure * fraction
}

/// Oxygen fraction (0-1) giving `ppo2` at `depth` meters, limited to pure oxygen.
pub fn best_mix(ppo2: f64, depth: f64, converter: &DepthConverter) -> f64 {
    (ppo2 / converter.to_bar(depth)).min(1.0)
}

/// Narcotic part of the mix, helium isn't narcotic.
/// Pass `o2` as 0 to count only nitrogen.
pub fn narcotic_index(n2: f64, o2: f64) -> f64 {
    n2 + o2
}

/// Equivalent narcotic depth as absolute pressure.
pub fn end(pressure: f64, n2: f64, o2: f64) -> f64 {
    pressure * narcotic_index(n2, o2)
}

/// Maximum narcotic depth as absolute pressure for the allowed `narcotic_pressure`.
pub fn mnd(narcotic_pressure: f64, n2: f64, o2: f64) -> f64 {
    narcotic_pressure / narcotic_index(n2, o2)
}

/// Equivalent air depth as absolute pressure of a nitrox mix.
/// May be lower than the surface pressure for rich mixes in shallow water.
pub fn ead(o2: f64, pressure: f64, o2_in_air: f64) -> f64 {
    end(pressure, 1.0 - o2, 0.0) / (1.0 - o2_in_air)
}

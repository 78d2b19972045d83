//! Directional rounding helpers.
//!
//! Gas planning rounds in the safe direction: consumption and reserves are
//! rounded up, achievable durations down. Floating point noise (e.g.
//! `2.0000000001`) is stripped before rounding so that exact values are not
//! pushed to the next whole unit.

/// Number of decimal places kept by [`fix`].
const FIX_DECIMALS: i32 = 9;

/// Removes floating point noise below the 9th decimal place.
pub fn fix(value: f64) -> f64 {
    let factor = 10_f64.powi(FIX_DECIMALS);
    (value * factor).round() / factor
}

pub fn ceil(value: f64) -> f64 {
    fix(value).ceil()
}

pub fn floor(value: f64) -> f64 {
    fix(value).floor()
}

pub fn round_two_decimals(value: f64) -> f64 {
    (fix(value) * 100.0).round() / 100.0
}

/// Rounds to the nearest multiple of `distance` (e.g. the nearest 3 m stop).
pub fn round_to_multiple(value: f64, distance: f64) -> f64 {
    (fix(value / distance)).round() * distance
}

/// Rounds down to a multiple of `distance`.
pub fn floor_to_multiple(value: f64, distance: f64) -> f64 {
    floor(value / distance) * distance
}

/// Rounds up to a multiple of `distance`.
pub fn ceil_to_multiple(value: f64, distance: f64) -> f64 {
    ceil(value / distance) * distance
}

//! Durations are kept in seconds throughout the crate.

pub const ONE_SECOND: f64 = 1.0;
pub const ONE_MINUTE: f64 = 60.0;
pub const ONE_HOUR: f64 = ONE_MINUTE * 60.0;
pub const ONE_DAY: f64 = ONE_HOUR * 24.0;

pub fn to_minutes(seconds: f64) -> f64 {
    seconds / ONE_MINUTE
}

pub fn to_seconds(minutes: f64) -> f64 {
    minutes * ONE_MINUTE
}

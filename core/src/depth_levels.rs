//! Deco stop ladder.

use crate::options::{Options, SafetyStop};
use crate::physics::DepthConverter;
use crate::precision;

/// Decides the depths at which the ascent stops.
#[derive(Debug, Clone, Copy)]
pub struct DepthLevels<'a> {
    converter: DepthConverter,
    options: &'a Options,
}

impl<'a> DepthLevels<'a> {
    pub fn new(converter: DepthConverter, options: &'a Options) -> Self {
        Self { converter, options }
    }

    /// Converts an absolute pressure to depth rounded to the nearest deco stop.
    pub fn to_deco_stop(&self, pressure: f64) -> f64 {
        let depth = self.converter.from_bar(pressure);
        precision::round_to_multiple(depth, self.options.deco_stop_distance)
    }

    /// Next stop in meters above `current_depth`, 0 m once at or above the last stop.
    pub fn next_stop(&self, current_depth: f64) -> f64 {
        let last_stop = self.options.last_stop_depth;
        if current_depth <= last_stop {
            return 0.0;
        }

        let rounded = precision::floor_to_multiple(current_depth, self.options.deco_stop_distance);
        if rounded != current_depth {
            return rounded.max(last_stop);
        }

        let result = current_depth - self.options.deco_stop_distance;
        if result <= last_stop {
            return last_stop;
        }

        result
    }

    pub fn add_safety_stop(&self, current_depth: f64, max_depth: f64) -> bool {
        let required = match self.options.safety_stop {
            SafetyStop::Never => false,
            SafetyStop::Always => true,
            SafetyStop::Auto => max_depth > self.options.minimum_auto_stop_depth,
        };

        required && current_depth == self.options.last_stop_depth
    }
}

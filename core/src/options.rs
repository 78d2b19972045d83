//! Planner configuration.
//!
//! Options are plain data with sensible defaults for recreational and
//! technical open circuit diving. They can be loaded from JSON, any missing
//! field falls back to its default.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::physics::{DepthConverter, Salinity};

/// When to add the safety stop at the last stop depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStop {
    Never,
    /// Only for dives deeper than `minimum_auto_stop_depth`
    #[default]
    Auto,
    Always,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Gradient factor low (0.0–1.0)
    pub gf_low: f64,
    /// Gradient factor high (0.0–1.0)
    pub gf_high: f64,
    /// Maximum ppO2 for bottom gases (bar)
    pub max_ppo2: f64,
    /// Maximum ppO2 for deco gases (bar)
    pub max_deco_ppo2: f64,
    pub salinity: Salinity,
    /// Altitude of the dive site in meters above sea level
    pub altitude: f64,
    /// Depth of the last stop in meters
    pub last_stop_depth: f64,
    /// Distance between two deco stops in meters
    pub deco_stop_distance: f64,
    pub safety_stop: SafetyStop,
    /// Dives deeper than this (meters) get the safety stop in `SafetyStop::Auto` mode
    pub minimum_auto_stop_depth: f64,
    /// Safety stop duration in minutes
    pub safety_stop_duration: f64,
    /// Ascent speed (m/min) from the bottom to 50 % of the maximum depth
    pub ascent_speed_50perc: f64,
    /// Ascent speed (m/min) from 50 % of the maximum depth to 6 m
    pub ascent_speed_50perc_to_6m: f64,
    /// Ascent speed (m/min) from 6 m to the surface
    pub ascent_speed_6m: f64,
    /// Descent speed (m/min)
    pub descent_speed: f64,
    /// Time in minutes to solve a problem at depth before the emergency ascent starts
    pub problem_solving_duration: f64,
    /// Time in minutes needed for a gas switch
    pub gas_switch_duration: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gf_low: 0.4,
            gf_high: 0.85,
            max_ppo2: 1.4,
            max_deco_ppo2: 1.6,
            salinity: Salinity::Salt,
            altitude: 0.0,
            last_stop_depth: 3.0,
            deco_stop_distance: 3.0,
            safety_stop: SafetyStop::Auto,
            minimum_auto_stop_depth: 10.0,
            safety_stop_duration: 3.0,
            ascent_speed_50perc: 9.0,
            ascent_speed_50perc_to_6m: 6.0,
            ascent_speed_6m: 3.0,
            descent_speed: 18.0,
            problem_solving_duration: 1.0,
            gas_switch_duration: 1.0,
        }
    }
}

impl Options {
    /// Options with the given gradient factors, everything else default.
    pub fn with_gradient_factors(gf_low: f64, gf_high: f64) -> Self {
        Self {
            gf_low,
            gf_high,
            ..Self::default()
        }
    }

    /// Loads and validates options from JSON.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let options: Options =
            serde_json::from_str(json).map_err(|e| PlanError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let gf_range = 0.0..=1.0;
        if !gf_range.contains(&self.gf_low) || !gf_range.contains(&self.gf_high) {
            return Err(PlanError::InvalidOptions(
                "gradient factors have to be in 0-1 range".to_string(),
            ));
        }
        if self.gf_low <= 0.0 || self.gf_high <= 0.0 {
            return Err(PlanError::InvalidOptions(
                "gradient factors have to be positive".to_string(),
            ));
        }
        if self.gf_low > self.gf_high {
            return Err(PlanError::InvalidOptions(
                "gradient factor low can't be higher than gradient factor high".to_string(),
            ));
        }
        if self.max_ppo2 <= 0.0 || self.max_deco_ppo2 <= 0.0 {
            return Err(PlanError::InvalidOptions(
                "maximum ppO2 has to be positive".to_string(),
            ));
        }

        let speeds = [
            ("ascent_speed_50perc", self.ascent_speed_50perc),
            ("ascent_speed_50perc_to_6m", self.ascent_speed_50perc_to_6m),
            ("ascent_speed_6m", self.ascent_speed_6m),
            ("descent_speed", self.descent_speed),
            ("deco_stop_distance", self.deco_stop_distance),
        ];
        for (name, speed) in speeds {
            if speed <= 0.0 {
                return Err(PlanError::InvalidOptions(format!("{name} has to be positive")));
            }
        }

        if self.last_stop_depth < 0.0
            || self.altitude < 0.0
            || self.problem_solving_duration < 0.0
            || self.gas_switch_duration < 0.0
            || self.safety_stop_duration < 0.0
        {
            return Err(PlanError::InvalidOptions(
                "depths, altitude and durations can't be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn depth_converter(&self) -> DepthConverter {
        DepthConverter::new(self.salinity, self.altitude)
    }

    /// Ascent speed in meters per minute at `current_depth` of a dive reaching `max_depth`.
    pub fn ascent_speed(&self, current_depth: f64, max_depth: f64) -> f64 {
        if current_depth > max_depth / 2.0 {
            return self.ascent_speed_50perc;
        }

        if current_depth > 6.0 {
            return self.ascent_speed_50perc_to_6m;
        }

        self.ascent_speed_6m
    }
}

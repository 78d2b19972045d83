//! Stand-alone nitrox and altitude calculators working in meters and percents.

use crate::gas::{mixtures, O2_IN_AIR};
use crate::physics::{altitude_pressure, pressure_altitude, DepthConverter, STANDARD_PRESSURE};

const PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NitroxCalculator {
    converter: DepthConverter,
    o2_in_air: f64,
}

impl NitroxCalculator {
    pub fn new(converter: DepthConverter) -> Self {
        Self {
            converter,
            o2_in_air: O2_IN_AIR,
        }
    }

    pub fn with_o2_in_air(converter: DepthConverter, o2_in_air: f64) -> Self {
        Self {
            converter,
            o2_in_air,
        }
    }

    /// Equivalent air depth in meters of nitrox with `o2_percent` at `depth` meters.
    /// Rich mixes in shallow water map to the surface.
    pub fn ead(&self, o2_percent: f64, depth: f64) -> f64 {
        let bars = self.converter.to_bar(depth);
        let result = mixtures::ead(o2_percent / PERCENT, bars, self.o2_in_air);
        self.converter.from_bar(result)
    }

    /// Oxygen percent giving `ppo2` at `depth` meters, at most 100 %.
    pub fn best_mix(&self, ppo2: f64, depth: f64) -> f64 {
        mixtures::best_mix(ppo2, depth, &self.converter) * PERCENT
    }

    /// Maximum operating depth in meters of nitrox with `o2_percent` at `ppo2`.
    pub fn mod_depth(&self, ppo2: f64, o2_percent: f64) -> f64 {
        let bars = ppo2 / (o2_percent / PERCENT);
        self.converter.from_bar(bars)
    }

    /// Partial pressure of oxygen (bar) of `o2_percent` at `depth` meters.
    pub fn partial_pressure(&self, o2_percent: f64, depth: f64) -> f64 {
        let bars = self.converter.to_bar(depth);
        mixtures::partial_pressure(bars, o2_percent / PERCENT)
    }
}

/// Converts depths of altitude dives in fresh water to the equivalent sea level depth,
/// so sea level tables can be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeCalculator {
    /// Actual depth in meters of fresh water.
    pub altitude_depth: f64,
    altitude: f64,
    pressure: f64,
}

impl AltitudeCalculator {
    pub fn new(altitude_depth: f64, altitude: f64) -> Self {
        Self {
            altitude_depth,
            altitude,
            pressure: altitude_pressure(altitude),
        }
    }

    /// Altitude of the surface in meters above sea level.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Atmospheric pressure at the surface in bars.
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn set_altitude(&mut self, altitude: f64) {
        self.altitude = altitude;
        self.pressure = altitude_pressure(altitude);
    }

    /// Pressures at or above the standard pressure set the altitude to sea level.
    pub fn set_pressure(&mut self, pressure: f64) {
        self.pressure = pressure;
        self.altitude = pressure_altitude(pressure);
    }

    /// Depth in meters at sea level with the same pressure ratio to the surface.
    pub fn theoretical_depth(&self) -> f64 {
        self.altitude_depth * STANDARD_PRESSURE / self.pressure
    }
}

impl Default for AltitudeCalculator {
    fn default() -> Self {
        Self::new(20.0, 300.0)
    }
}

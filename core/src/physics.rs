//! Depth to pressure conversion.

use serde::{Deserialize, Serialize};

/// Standard gravity (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Standard sea level atmospheric pressure (bar).
pub const STANDARD_PRESSURE: f64 = 1.01325;

// Barometric formula constants.
const GAS_CONSTANT: f64 = 8.31432;
const STANDARD_TEMPERATURE: f64 = 288.15;
const LAPSE_RATE: f64 = -0.0065;
const MOLAR_MASS_AIR: f64 = 0.0289644;

/// Water type, which defines the water density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Salinity {
    /// 1000 kg/m³
    Fresh,
    /// EN13319, 1020 kg/m³
    Brackish,
    /// 1030 kg/m³
    #[default]
    Salt,
}

impl Salinity {
    /// Water density in kg/m³.
    pub fn density(&self) -> f64 {
        match self {
            Salinity::Fresh => 1000.0,
            Salinity::Brackish => 1020.0,
            Salinity::Salt => 1030.0,
        }
    }
}

/// Bars in one standard atmosphere.
const BARS_PER_ATM: f64 = STANDARD_PRESSURE;

pub fn pascal_to_bar(pascals: f64) -> f64 {
    pascals / 100_000.0
}

pub fn bar_to_pascal(bars: f64) -> f64 {
    bars * 100_000.0
}

pub fn bar_to_atm(bars: f64) -> f64 {
    bars / BARS_PER_ATM
}

pub fn atm_to_bar(atm: f64) -> f64 {
    atm * BARS_PER_ATM
}

pub fn pascal_to_atm(pascals: f64) -> f64 {
    bar_to_atm(pascal_to_bar(pascals))
}

pub fn atm_to_pascal(atm: f64) -> f64 {
    bar_to_pascal(atm_to_bar(atm))
}

fn barometric_exponent() -> f64 {
    (STANDARD_GRAVITY * MOLAR_MASS_AIR) / (GAS_CONSTANT * LAPSE_RATE)
}

/// Atmospheric pressure (bar) at the given altitude above sea level (meters).
pub fn altitude_pressure(altitude: f64) -> f64 {
    let base = STANDARD_TEMPERATURE / (STANDARD_TEMPERATURE + LAPSE_RATE * altitude);
    STANDARD_PRESSURE * base.powf(barometric_exponent())
}

/// Altitude (meters) with the given atmospheric pressure (bar), inverse of [`altitude_pressure`].
/// Pressures at or above the standard pressure map to sea level.
pub fn pressure_altitude(bars: f64) -> f64 {
    if bars >= STANDARD_PRESSURE {
        return 0.0;
    }

    let base = (bars / STANDARD_PRESSURE).powf(1.0 / barometric_exponent());
    (STANDARD_TEMPERATURE / base - STANDARD_TEMPERATURE) / LAPSE_RATE
}

/// Converts depth in meters to absolute pressure in bars and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthConverter {
    density: f64,
    gravity: f64,
    surface_pressure: f64,
}

impl DepthConverter {
    pub fn new(salinity: Salinity, altitude: f64) -> Self {
        Self {
            density: salinity.density(),
            gravity: STANDARD_GRAVITY,
            surface_pressure: altitude_pressure(altitude.max(0.0)),
        }
    }

    pub fn for_salt_water() -> Self {
        Self::new(Salinity::Salt, 0.0)
    }

    pub fn for_fresh_water() -> Self {
        Self::new(Salinity::Fresh, 0.0)
    }

    /// Training converter: 1 bar at the surface and 1 bar per 10 m.
    pub fn simple() -> Self {
        Self {
            density: Salinity::Fresh.density(),
            gravity: 10.0,
            surface_pressure: 1.0,
        }
    }

    pub fn surface_pressure(&self) -> f64 {
        self.surface_pressure
    }

    /// Altitude of the surface in meters above sea level.
    pub fn altitude(&self) -> f64 {
        pressure_altitude(self.surface_pressure)
    }

    /// Absolute pressure in bars at `depth` meters.
    pub fn to_bar(&self, depth: f64) -> f64 {
        let weight_density = self.density * self.gravity;
        pascal_to_bar(depth * weight_density) + self.surface_pressure
    }

    /// Depth in meters for absolute pressure `bars`.
    /// Pressures below the surface pressure map to the surface.
    pub fn from_bar(&self, bars: f64) -> f64 {
        if bars <= self.surface_pressure {
            return 0.0;
        }

        let weight_density = self.density * self.gravity;
        bar_to_pascal(bars - self.surface_pressure) / weight_density
    }
}

impl Default for DepthConverter {
    fn default() -> Self {
        Self::for_salt_water()
    }
}

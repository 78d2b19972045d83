//! Breathing gas mixtures.
//!
//! A [`Gas`] is identified purely by its composition: two tanks filled with the
//! same mix carry the same gas and share one demand pool during consumption.
//! Fractions are stored in permille, so equality and hashing are exact.

pub mod mixtures;
pub mod names;

use std::fmt;

use crate::error::GasError;

/// Minimum partial pressure of oxygen (bar) of a breathable mix.
pub const MIN_PPO2: f64 = 0.18;

/// Fraction of oxygen in air.
pub const O2_IN_AIR: f64 = 0.209;

const PERMILLE: u16 = 1000;

/// Fractions finer than a permille are rejected, not rounded.
const PERMILLE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gas {
    o2: u16,
    he: u16,
}

impl Gas {
    pub const AIR: Gas = Gas { o2: 209, he: 0 };
    pub const OXYGEN: Gas = Gas { o2: 1000, he: 0 };

    /// Creates a gas from oxygen and helium fractions (0.0–1.0).
    ///
    /// Fractions have to be whole permille (e.g. 0.209, not 0.2095), so that two
    /// mixes describing the same gas are always equal.
    pub fn new(o2: f64, he: f64) -> Result<Self, GasError> {
        let valid_range = 0.0..=1.0;
        if !valid_range.contains(&o2) || !valid_range.contains(&he) || o2 + he > 1.0 + 1e-9 {
            return Err(GasError::InvalidFractions { o2, he });
        }

        let o2_permille = to_permille(o2).ok_or(GasError::InvalidFractions { o2, he })?;
        let he_permille = to_permille(he).ok_or(GasError::InvalidFractions { o2, he })?;
        // nothing to breathe
        if o2_permille == 0 {
            return Err(GasError::InvalidFractions { o2, he });
        }

        Ok(Self {
            o2: o2_permille,
            he: he_permille.min(PERMILLE - o2_permille),
        })
    }

    /// Creates a gas from whole percents, e.g. `from_percent(18, 45)` for Trimix 18/45.
    pub fn from_percent(o2: u8, he: u8) -> Result<Self, GasError> {
        Self::new(f64::from(o2) / 100.0, f64::from(he) / 100.0)
    }

    /// Nitrox with `o2` percent of oxygen.
    pub fn nitrox(o2: u8) -> Result<Self, GasError> {
        Self::from_percent(o2, 0)
    }

    pub fn trimix(o2: u8, he: u8) -> Result<Self, GasError> {
        Self::from_percent(o2, he)
    }

    pub(crate) const fn from_permille(o2: u16, he: u16) -> Self {
        Self { o2, he }
    }

    /// Oxygen fraction (0.0–1.0).
    pub fn o2(&self) -> f64 {
        f64::from(self.o2) / f64::from(PERMILLE)
    }

    /// Helium fraction (0.0–1.0).
    pub fn he(&self) -> f64 {
        f64::from(self.he) / f64::from(PERMILLE)
    }

    /// Nitrogen fraction, the remainder of the mix.
    pub fn n2(&self) -> f64 {
        f64::from(PERMILLE - self.o2 - self.he) / f64::from(PERMILLE)
    }

    /// Maximum operating depth expressed as absolute pressure (bar).
    pub fn mod_pressure(&self, max_ppo2: f64) -> f64 {
        max_ppo2 / self.o2()
    }

    /// Minimum absolute pressure (bar) at which the mix is breathable.
    /// Hyperoxic mixes are breathable at the surface.
    pub fn ceiling(&self, surface_pressure: f64) -> f64 {
        let bars = MIN_PPO2 / self.o2() * surface_pressure;
        bars.max(surface_pressure)
    }

    /// Equivalent narcotic depth as absolute pressure, oxygen counted as narcotic.
    pub fn end_pressure(&self, pressure: f64) -> f64 {
        pressure * (self.o2() + self.n2())
    }

    pub fn is_breathable_at(&self, pressure: f64, max_ppo2: f64, surface_pressure: f64) -> bool {
        const TOLERANCE: f64 = 1e-9;
        pressure <= self.mod_pressure(max_ppo2) + TOLERANCE
            && pressure + TOLERANCE >= self.ceiling(surface_pressure)
    }

    /// Equivalent air depth as absolute pressure, see [`mixtures::ead`].
    pub fn ead(&self, pressure: f64) -> f64 {
        mixtures::ead(self.o2(), pressure, O2_IN_AIR)
    }

    /// Maximum narcotic depth as absolute pressure, oxygen counted as narcotic.
    pub fn mnd(&self, narcotic_pressure: f64) -> f64 {
        mixtures::mnd(narcotic_pressure, self.n2(), self.o2())
    }

    /// Partial pressure of oxygen at `pressure`.
    pub fn ppo2(&self, pressure: f64) -> f64 {
        mixtures::partial_pressure(pressure, self.o2())
    }

    pub fn name(&self) -> String {
        names::name_for(self)
    }
}

fn to_permille(fraction: f64) -> Option<u16> {
    let scaled = fraction * f64::from(PERMILLE);
    let rounded = scaled.round();
    ((scaled - rounded).abs() <= PERMILLE_TOLERANCE).then_some(rounded as u16)
}

impl Default for Gas {
    fn default() -> Self {
        Gas::AIR
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

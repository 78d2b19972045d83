//! Diver breathing rates.

use serde::{Deserialize, Serialize};

/// Respiratory minute volume in liters per minute at surface pressure.
pub const DEFAULT_RMV: f64 = 20.0;

/// Respiratory minute volume of a stressed diver.
pub const DEFAULT_STRESS_RMV: f64 = 30.0;

/// Which breathing rate applies to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSelector {
    /// Relaxed diver following the plan.
    Normal,
    /// Single diver solving a problem.
    Stress,
    /// Two stressed divers breathing from the same gas supply.
    TeamStress,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diver {
    pub rmv: f64,
    pub stress_rmv: f64,
}

impl Diver {
    pub fn new(rmv: f64, stress_rmv: f64) -> Self {
        Self { rmv, stress_rmv }
    }

    /// Gas sharing: both divers under stress breathe from the bottom gas.
    pub fn team_stress_rmv(&self) -> f64 {
        self.stress_rmv * 2.0
    }

    /// Liters per minute for the given rate.
    pub fn rmv_for(&self, rate: RateSelector) -> f64 {
        match rate {
            RateSelector::Normal => self.rmv,
            RateSelector::Stress => self.stress_rmv,
            RateSelector::TeamStress => self.team_stress_rmv(),
        }
    }
}

impl Default for Diver {
    fn default() -> Self {
        Self::new(DEFAULT_RMV, DEFAULT_STRESS_RMV)
    }
}

//! Tanks and their gas content.

use crate::gas::Gas;
use crate::precision;

/// How much of the usable gas (above reserve) may be spent before turning the dive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRule {
    /// Half of the usable gas for the way in, half for the way back.
    Halves,
    /// One third in, one third back, one third spare.
    Thirds,
}

impl TurnRule {
    fn divisor(&self) -> f64 {
        match self {
            TurnRule::Halves => 2.0,
            TurnRule::Thirds => 3.0,
        }
    }
}

/// A single tank used during the dive.
///
/// `consumed` and `reserve` are recomputed by every consumption run, all other
/// fields describe the tank as configured by the diver.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    /// Water volume in liters
    pub size: f64,
    /// Working pressure in bars
    pub working_pressure: f64,
    /// Pressure at the start of the dive in bars
    pub start_pressure: f64,
    pub gas: Gas,
    /// Consumed gas in bars
    pub consumed: f64,
    /// Pressure in bars to keep in the tank (rock bottom)
    pub reserve: f64,
}

impl Tank {
    pub fn new(size: f64, start_pressure: f64, gas: Gas) -> Self {
        Self {
            size,
            working_pressure: start_pressure,
            start_pressure,
            gas,
            consumed: 0.0,
            reserve: 0.0,
        }
    }

    pub fn with_working_pressure(mut self, working_pressure: f64) -> Self {
        self.working_pressure = working_pressure;
        self
    }

    /// Pressure left in the tank at the end of the dive.
    pub fn end_pressure(&self) -> f64 {
        self.start_pressure - self.consumed
    }

    /// Surface volume of gas at the start of the dive in liters.
    pub fn volume(&self) -> f64 {
        self.size * self.start_pressure
    }

    /// Whether the end pressure still covers the reserve.
    pub fn has_reserve(&self) -> bool {
        self.end_pressure() >= self.reserve
    }

    /// Percents of the start pressure left at the end of the dive.
    pub fn percents_remaining(&self) -> f64 {
        if self.start_pressure <= 0.0 {
            return 0.0;
        }

        (self.end_pressure() / self.start_pressure * 100.0).max(0.0)
    }

    /// Pressure at which to turn the dive according to `rule`.
    pub fn turn_pressure(&self, rule: TurnRule) -> f64 {
        let usable = (self.start_pressure - self.reserve).max(0.0);
        self.start_pressure - precision::floor(usable / rule.divisor())
    }

    pub fn reset_consumption(&mut self) {
        self.consumed = 0.0;
        self.reserve = 0.0;
    }
}

pub fn reset_consumption(tanks: &mut [Tank]) {
    tanks.iter_mut().for_each(Tank::reset_consumption);
}

/// True only if every tank keeps its reserve.
pub fn have_reserve(tanks: &[Tank]) -> bool {
    tanks.iter().all(Tank::has_reserve)
}

/// Distinct gases carried by the tanks, in tank order.
pub fn to_gases(tanks: &[Tank]) -> Vec<Gas> {
    let mut gases: Vec<Gas> = Vec::with_capacity(tanks.len());
    for tank in tanks {
        if !gases.contains(&tank.gas) {
            gases.push(tank.gas);
        }
    }
    gases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ean50() -> Gas {
        Gas::from_percent(50, 0).unwrap()
    }

    #[test]
    fn test_end_pressure_and_reserve() {
        let mut tank = Tank::new(15.0, 200.0, Gas::AIR);
        tank.consumed = 120.0;
        tank.reserve = 60.0;
        assert_eq!(tank.end_pressure(), 80.0);
        assert!(tank.has_reserve());

        tank.consumed = 150.0;
        assert!(!tank.has_reserve());
        assert_eq!(tank.percents_remaining(), 25.0);
    }

    #[test]
    fn test_volume() {
        let tank = Tank::new(12.0, 200.0, Gas::AIR).with_working_pressure(232.0);
        assert_eq!(tank.volume(), 2400.0);
        assert_eq!(tank.working_pressure, 232.0);
    }

    #[test]
    fn test_turn_pressure() {
        let mut tank = Tank::new(15.0, 200.0, Gas::AIR);
        tank.reserve = 45.0;
        assert_eq!(tank.turn_pressure(TurnRule::Halves), 123.0);
        assert_eq!(tank.turn_pressure(TurnRule::Thirds), 149.0);
    }

    #[test]
    fn test_reset_consumption() {
        let mut tanks = vec![Tank::new(15.0, 200.0, Gas::AIR)];
        tanks[0].consumed = 10.0;
        tanks[0].reserve = 30.0;
        reset_consumption(&mut tanks);
        assert_eq!(tanks[0].consumed, 0.0);
        assert_eq!(tanks[0].reserve, 0.0);
    }

    #[test]
    fn test_have_reserve_requires_all_tanks() {
        let mut tanks = vec![
            Tank::new(15.0, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, ean50()),
        ];
        tanks[0].reserve = 50.0;
        tanks[1].reserve = 20.0;
        assert!(have_reserve(&tanks));

        tanks[1].consumed = 181.0;
        assert!(!have_reserve(&tanks));
    }

    #[test]
    fn test_to_gases_is_distinct() {
        let tanks = vec![
            Tank::new(15.0, 200.0, Gas::AIR),
            Tank::new(11.1, 200.0, ean50()),
            Tank::new(11.1, 200.0, ean50()),
        ];
        assert_eq!(to_gases(&tanks), vec![Gas::AIR, ean50()]);
    }
}

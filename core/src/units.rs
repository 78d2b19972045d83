//! Metric and imperial unit adapters. All calculations run in metric units,
//! adapters only convert values entered or displayed by the user.

/// Values are in the respective units, metric results are meters, bars, liters,
/// grams per liter and kilograms.
#[allow(clippy::wrong_self_convention)]
pub trait Units {
    fn name(&self) -> &'static str;
    fn length_shortcut(&self) -> &'static str;
    fn pressure_shortcut(&self) -> &'static str;
    fn volume_shortcut(&self) -> &'static str;
    fn weight_shortcut(&self) -> &'static str;
    fn altitude_shortcut(&self) -> &'static str;
    fn density_shortcut(&self) -> &'static str;

    fn to_meters(&self, length: f64) -> f64;
    fn from_meters(&self, meters: f64) -> f64;
    fn to_bar(&self, pressure: f64) -> f64;
    fn from_bar(&self, bars: f64) -> f64;
    fn to_liter(&self, volume: f64) -> f64;
    fn from_liter(&self, liters: f64) -> f64;
    /// Tank size for a working pressure in bars, water volume for metric units.
    fn from_tank_liters(&self, liters: f64, working_pressure: f64) -> f64;
    fn to_tank_liters(&self, volume: f64, working_pressure: f64) -> f64;
    fn from_gram_per_liter(&self, density: f64) -> f64;
    fn to_gram_per_liter(&self, density: f64) -> f64;
    fn from_kilogram(&self, weight: f64) -> f64;
    fn to_kilogram(&self, weight: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricUnits;

impl Units for MetricUnits {
    fn name(&self) -> &'static str {
        "Metric"
    }

    fn length_shortcut(&self) -> &'static str {
        "m"
    }

    fn pressure_shortcut(&self) -> &'static str {
        "bar"
    }

    fn volume_shortcut(&self) -> &'static str {
        "l"
    }

    fn weight_shortcut(&self) -> &'static str {
        "kg"
    }

    fn altitude_shortcut(&self) -> &'static str {
        "m.a.s.l"
    }

    fn density_shortcut(&self) -> &'static str {
        "g/l"
    }

    fn to_meters(&self, length: f64) -> f64 {
        length
    }

    fn from_meters(&self, meters: f64) -> f64 {
        meters
    }

    fn to_bar(&self, pressure: f64) -> f64 {
        pressure
    }

    fn from_bar(&self, bars: f64) -> f64 {
        bars
    }

    fn to_liter(&self, volume: f64) -> f64 {
        volume
    }

    fn from_liter(&self, liters: f64) -> f64 {
        liters
    }

    fn from_tank_liters(&self, liters: f64, _working_pressure: f64) -> f64 {
        liters
    }

    fn to_tank_liters(&self, volume: f64, _working_pressure: f64) -> f64 {
        volume
    }

    fn from_gram_per_liter(&self, density: f64) -> f64 {
        density
    }

    fn to_gram_per_liter(&self, density: f64) -> f64 {
        density
    }

    fn from_kilogram(&self, weight: f64) -> f64 {
        weight
    }

    fn to_kilogram(&self, weight: f64) -> f64 {
        weight
    }
}

/// Feet, psi, cubic feet and pounds. Tank sizes are the free gas volume
/// in cubic feet at the working pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImperialUnits;

impl ImperialUnits {
    /// psi in one bar
    const PSI_RATE: f64 = 14.503773773022;
    /// liters in one cubic foot
    const CFT_RATE: f64 = 28.316846592;
    /// pounds in one kilogram
    const LB_RATE: f64 = 2.20462262185;
    /// meters in one international foot
    const FOOT_RATE: f64 = 0.3048;
    /// pounds in one gram
    const POUND_RATE: f64 = 0.00220462262;
    const LB_PER_CUFT_RATE: f64 = Self::POUND_RATE * Self::CFT_RATE;
}

impl Units for ImperialUnits {
    fn name(&self) -> &'static str {
        "Imperial"
    }

    fn length_shortcut(&self) -> &'static str {
        "ft"
    }

    fn pressure_shortcut(&self) -> &'static str {
        "psi"
    }

    fn volume_shortcut(&self) -> &'static str {
        "cuft"
    }

    fn weight_shortcut(&self) -> &'static str {
        "lb"
    }

    fn altitude_shortcut(&self) -> &'static str {
        "ft.a.s.l"
    }

    fn density_shortcut(&self) -> &'static str {
        "lb/cuft"
    }

    fn to_meters(&self, length: f64) -> f64 {
        length * Self::FOOT_RATE
    }

    fn from_meters(&self, meters: f64) -> f64 {
        meters / Self::FOOT_RATE
    }

    fn to_bar(&self, pressure: f64) -> f64 {
        pressure / Self::PSI_RATE
    }

    fn from_bar(&self, bars: f64) -> f64 {
        bars * Self::PSI_RATE
    }

    fn to_liter(&self, volume: f64) -> f64 {
        volume * Self::CFT_RATE
    }

    fn from_liter(&self, liters: f64) -> f64 {
        liters / Self::CFT_RATE
    }

    fn from_tank_liters(&self, liters: f64, working_pressure: f64) -> f64 {
        self.from_liter(liters) * working_pressure
    }

    fn to_tank_liters(&self, volume: f64, working_pressure: f64) -> f64 {
        self.to_liter(volume) / working_pressure
    }

    fn from_gram_per_liter(&self, density: f64) -> f64 {
        density * Self::LB_PER_CUFT_RATE
    }

    fn to_gram_per_liter(&self, density: f64) -> f64 {
        density / Self::LB_PER_CUFT_RATE
    }

    fn from_kilogram(&self, weight: f64) -> f64 {
        weight * Self::LB_RATE
    }

    fn to_kilogram(&self, weight: f64) -> f64 {
        weight / Self::LB_RATE
    }
}

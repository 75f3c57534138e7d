//! Weight units and unit-aware weight values.
//!
//! # Responsibility
//! - Define the closed set of units a measurement can be recorded in.
//! - Convert between units through a single kilograms-per-unit factor.
//!
//! # Invariants
//! - Pounds use the exact international factor `0.45359237` everywhere.
//! - Converting a value to its own unit returns it bit-for-bit unchanged.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const KILOGRAMS_PER_POUND: f64 = 0.45359237;

/// Unit a weight measurement is recorded or displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Avoirdupois pound, shown as `lbs`.
    #[serde(rename = "lbs")]
    Pounds,
    /// Kilogram, shown as `kg`.
    #[serde(rename = "kg")]
    Kilograms,
}

impl WeightUnit {
    /// All units in picker order.
    pub const ALL: [WeightUnit; 2] = [WeightUnit::Pounds, WeightUnit::Kilograms];

    /// Short symbol used next to numbers and as the storage value.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pounds => "lbs",
            Self::Kilograms => "kg",
        }
    }

    /// Long label used by unit pickers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pounds => "Pounds",
            Self::Kilograms => "Kilograms",
        }
    }

    /// How many kilograms one unit of `self` weighs.
    pub fn kilograms_per_unit(self) -> f64 {
        match self {
            Self::Pounds => KILOGRAMS_PER_POUND,
            Self::Kilograms => 1.0,
        }
    }

    /// Parses a symbol (`lbs`, `kg`) or display name, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lbs" | "lb" | "pounds" => Some(Self::Pounds),
            "kg" | "kilograms" => Some(Self::Kilograms),
            _ => None,
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Converts `weight` from one unit to another.
///
/// Same-unit conversion short-circuits so the input is returned exactly.
pub fn convert(weight: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    if from == to {
        return weight;
    }
    weight * from.kilograms_per_unit() / to.kilograms_per_unit()
}

/// A numeric weight tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn new(value: f64, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    /// Normalized weight used for cross-unit comparison.
    pub fn in_kilograms(self) -> f64 {
        convert(self.value, self.unit, WeightUnit::Kilograms)
    }

    /// Same weight expressed in `unit`.
    pub fn to(self, unit: WeightUnit) -> Weight {
        Weight::new(convert(self.value, self.unit, unit), unit)
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit.symbol())
    }
}

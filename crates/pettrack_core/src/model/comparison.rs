//! Change between two consecutive weight measurements.

use crate::model::unit::{convert, Weight, WeightUnit};
use serde::{Deserialize, Serialize};

/// Sign of a weight change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Increase,
    Decrease,
    NoChange,
}

/// Difference between a current and a previous weight, normalized to kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightComparison {
    /// `current - previous`, in kilograms. Negative for a loss.
    pub difference_kg: f64,
    /// `difference / previous * 100`; `0` when previous normalizes to zero.
    pub percent_change: f64,
}

/// Compares `current` against `previous` in a unit-independent way.
pub fn compare(current: Weight, previous: Weight) -> WeightComparison {
    let previous_kg = previous.in_kilograms();
    let difference_kg = current.in_kilograms() - previous_kg;
    let percent_change = if previous_kg == 0.0 {
        0.0
    } else {
        difference_kg / previous_kg * 100.0
    };
    WeightComparison {
        difference_kg,
        percent_change,
    }
}

impl WeightComparison {
    pub fn direction(&self) -> ChangeDirection {
        if self.difference_kg > 0.0 {
            ChangeDirection::Increase
        } else if self.difference_kg < 0.0 {
            ChangeDirection::Decrease
        } else {
            ChangeDirection::NoChange
        }
    }

    /// Absolute difference expressed in `unit`.
    pub fn difference_in(&self, unit: WeightUnit) -> f64 {
        convert(self.difference_kg.abs(), WeightUnit::Kilograms, unit)
    }

    /// Signed change label, e.g. `+2.0 lbs`, `-0.9 kg`, or `No change`.
    pub fn change_label(&self, unit: WeightUnit) -> String {
        let sign = match self.direction() {
            ChangeDirection::Increase => "+",
            ChangeDirection::Decrease => "-",
            ChangeDirection::NoChange => return "No change".to_string(),
        };
        format!("{sign}{:.1} {}", self.difference_in(unit), unit.symbol())
    }

    /// Percent label, e.g. `4.4% increase`. `None` when nothing changed.
    pub fn percent_label(&self) -> Option<String> {
        let word = match self.direction() {
            ChangeDirection::Increase => "increase",
            ChangeDirection::Decrease => "decrease",
            ChangeDirection::NoChange => return None,
        };
        Some(format!("{:.1}% {word}", self.percent_change.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::{compare, ChangeDirection};
    use crate::model::unit::{Weight, WeightUnit};

    #[test]
    fn pounds_gain_matches_expected_kilograms_and_percent() {
        let result = compare(
            Weight::new(47.0, WeightUnit::Pounds),
            Weight::new(45.0, WeightUnit::Pounds),
        );

        assert!((result.difference_kg - 0.90718474).abs() < 1e-9);
        assert!((result.percent_change - 4.444444444).abs() < 1e-6);
        assert_eq!(result.direction(), ChangeDirection::Increase);
        assert_eq!(result.change_label(WeightUnit::Pounds), "+2.0 lbs");
        assert_eq!(result.percent_label().as_deref(), Some("4.4% increase"));
    }

    #[test]
    fn cross_unit_loss() {
        let result = compare(
            Weight::new(20.0, WeightUnit::Kilograms),
            Weight::new(50.0, WeightUnit::Pounds),
        );

        assert_eq!(result.direction(), ChangeDirection::Decrease);
        assert_eq!(result.change_label(WeightUnit::Kilograms), "-2.7 kg");
        assert_eq!(result.percent_label().as_deref(), Some("11.8% decrease"));
    }

    #[test]
    fn zero_previous_yields_zero_percent() {
        let result = compare(
            Weight::new(5.0, WeightUnit::Kilograms),
            Weight::new(0.0, WeightUnit::Pounds),
        );

        assert_eq!(result.percent_change, 0.0);
        assert_eq!(result.difference_kg, 5.0);
    }

    #[test]
    fn identical_weights_report_no_change() {
        let result = compare(
            Weight::new(10.0, WeightUnit::Kilograms),
            Weight::new(10.0, WeightUnit::Kilograms),
        );

        assert_eq!(result.direction(), ChangeDirection::NoChange);
        assert_eq!(result.change_label(WeightUnit::Pounds), "No change");
        assert_eq!(result.percent_label(), None);
    }
}

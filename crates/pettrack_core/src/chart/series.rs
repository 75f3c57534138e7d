//! Weight-over-time series in a single display unit.
//!
//! # Invariants
//! - Points are ascending by date; equal dates keep entry order.
//! - Every point is expressed in the series unit.
//! - The y-range lower bound is never negative.

use crate::model::unit::WeightUnit;
use crate::model::weight_entry::WeightEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const Y_RANGE_PADDING_RATIO: f64 = 0.1;
/// Padding applied to each side when every point has the same weight.
const FLAT_Y_RANGE_PADDING: f64 = 1.0;
const EMPTY_Y_RANGE: (f64, f64) = (0.0, 100.0);

/// One plotted measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

/// How much data the chart has to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartShape {
    /// Nothing recorded yet.
    Empty,
    /// One point; shown as a single value with an "add more" hint.
    Single,
    /// Two or more points; rendered as a line/area trend.
    Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub unit: WeightUnit,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Converts `entries` into `unit` and orders them by date.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a WeightEntry>,
        unit: WeightUnit,
    ) -> Self {
        let mut points: Vec<ChartPoint> = entries
            .into_iter()
            .map(|entry| ChartPoint {
                date: entry.date,
                weight: entry.weight_in(unit),
            })
            .collect();
        points.sort_by_key(|point| point.date);
        Self { unit, points }
    }

    pub fn shape(&self) -> ChartShape {
        match self.points.len() {
            0 => ChartShape::Empty,
            1 => ChartShape::Single,
            _ => ChartShape::Trend,
        }
    }

    /// Y-axis domain: data span padded by 10% each side, floored at zero.
    ///
    /// A flat series (one point, or all weights equal) is padded by one
    /// display unit each side so the range is never empty.
    pub fn y_range(&self) -> (f64, f64) {
        let (Some(min), Some(max)) = (self.min_weight(), self.max_weight()) else {
            return EMPTY_Y_RANGE;
        };
        let span = max - min;
        let padding = if span > f64::EPSILON {
            span * Y_RANGE_PADDING_RATIO
        } else {
            FLAT_Y_RANGE_PADDING
        };
        ((min - padding).max(0.0), max + padding)
    }

    pub fn min_weight(&self) -> Option<f64> {
        self.points.iter().map(|point| point.weight).reduce(f64::min)
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.points.iter().map(|point| point.weight).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartSeries, ChartShape};
    use crate::model::unit::WeightUnit;
    use crate::model::weight_entry::{WeightEntry, WeightEntryDraft};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn entry(day: u32, weight: f64, unit: WeightUnit) -> WeightEntry {
        WeightEntry::new(
            Uuid::new_v4(),
            WeightEntryDraft::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), weight, unit),
        )
        .unwrap()
    }

    #[test]
    fn empty_series_uses_default_range() {
        let series = ChartSeries::from_entries(Vec::<&WeightEntry>::new(), WeightUnit::Pounds);
        assert_eq!(series.shape(), ChartShape::Empty);
        assert_eq!(series.y_range(), (0.0, 100.0));
        assert_eq!(series.min_weight(), None);
    }

    #[test]
    fn points_are_sorted_and_converted_to_display_unit() {
        let entries = [
            entry(20, 10.0, WeightUnit::Kilograms),
            entry(1, 20.0, WeightUnit::Pounds),
        ];
        let series = ChartSeries::from_entries(&entries, WeightUnit::Pounds);

        assert_eq!(series.shape(), ChartShape::Trend);
        assert_eq!(series.points[0].weight, 20.0);
        assert!((series.points[1].weight - 22.046226218).abs() < 1e-6);
    }

    #[test]
    fn y_range_pads_span_and_clamps_at_zero() {
        let entries = [
            entry(1, 40.0, WeightUnit::Pounds),
            entry(2, 50.0, WeightUnit::Pounds),
        ];
        let (lo, hi) = ChartSeries::from_entries(&entries, WeightUnit::Pounds).y_range();
        assert!((lo - 39.0).abs() < 1e-9);
        assert!((hi - 51.0).abs() < 1e-9);

        let wide = [
            entry(1, 1.0, WeightUnit::Kilograms),
            entry(2, 100.0, WeightUnit::Kilograms),
        ];
        let (lo, _) = ChartSeries::from_entries(&wide, WeightUnit::Kilograms).y_range();
        assert_eq!(lo, 0.0);
    }

    #[test]
    fn single_point_gets_flat_padding() {
        let entries = [entry(1, 4.2, WeightUnit::Kilograms)];
        let series = ChartSeries::from_entries(&entries, WeightUnit::Kilograms);
        assert_eq!(series.shape(), ChartShape::Single);
        let (lo, hi) = series.y_range();
        assert!((lo - 3.2).abs() < 1e-9);
        assert!((hi - 5.2).abs() < 1e-9);

        let tiny = [entry(1, 0.4, WeightUnit::Kilograms)];
        let (lo, hi) = ChartSeries::from_entries(&tiny, WeightUnit::Kilograms).y_range();
        assert_eq!(lo, 0.0);
        assert!((hi - 1.4).abs() < 1e-9);
    }

    #[test]
    fn equal_weights_trend_has_non_empty_range() {
        let entries = [
            entry(1, 45.0, WeightUnit::Pounds),
            entry(8, 45.0, WeightUnit::Pounds),
        ];
        let series = ChartSeries::from_entries(&entries, WeightUnit::Pounds);
        assert_eq!(series.shape(), ChartShape::Trend);
        assert_eq!(series.min_weight(), series.max_weight());
        assert_eq!(series.y_range(), (44.0, 46.0));
    }
}

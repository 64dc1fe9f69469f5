//! Removal of degenerate periods before fitting.

use crate::core::{AggregatedPoint, TrainingSeries};
use crate::error::Result;

/// Drops periods whose aggregate is zero or negative.
///
/// The remaining timestamps keep their original positions, so the training
/// series may have gaps in its grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesFilter;

impl SeriesFilter {
    pub fn new() -> Self {
        Self
    }

    /// Keep only points with a strictly positive aggregate.
    pub fn apply(&self, points: &[AggregatedPoint]) -> Result<TrainingSeries> {
        let kept: Vec<AggregatedPoint> = points
            .iter()
            .copied()
            .filter(|p| p.aggregate > 0.0)
            .collect();

        tracing::debug!(
            input = points.len(),
            kept = kept.len(),
            dropped = points.len() - kept.len(),
            "filtered non-positive periods"
        );

        TrainingSeries::from_points(&kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_points(values: &[f64]) -> Vec<AggregatedPoint> {
        let base: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| AggregatedPoint::new(base + Duration::weeks(i as i64), v))
            .collect()
    }

    #[test]
    fn drops_zero_and_negative_aggregates() {
        let points = make_points(&[5.0, 0.0, -2.0, 3.0, 0.0001]);
        let series = SeriesFilter::new().apply(&points).unwrap();

        assert_eq!(series.values(), &[5.0, 3.0, 0.0001]);
        assert_eq!(
            series.timestamps(),
            &[points[0].period, points[3].period, points[4].period]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let points = make_points(&[1.0, 0.0, 2.0, -1.0, 3.0]);
        let once = SeriesFilter::new().apply(&points).unwrap();
        let again: Vec<AggregatedPoint> = once.points().collect();
        let twice = SeriesFilter::new().apply(&again).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn all_non_positive_gives_empty_series() {
        let series = SeriesFilter::new().apply(&make_points(&[0.0, -1.0])).unwrap();
        assert!(series.is_empty());
    }
}

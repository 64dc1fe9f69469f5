//! Observations, aggregated points and the training series the model fits.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// A single raw record: a timestamp and the value it carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Sum of all observation values falling inside one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    /// Period label (closing day of the period at midnight UTC).
    pub period: DateTime<Utc>,
    pub aggregate: f64,
}

impl AggregatedPoint {
    pub fn new(period: DateTime<Utc>, aggregate: f64) -> Self {
        Self { period, aggregate }
    }
}

/// Chronologically ordered series used to fit a model.
///
/// Timestamps are strictly increasing; the spacing between them is nominal
/// and may contain gaps where periods were filtered out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TrainingSeries {
    /// Create a series from parallel timestamp and value vectors.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::UnorderedTimestamps {
                    earlier: timestamps[i - 1].to_string(),
                    later: timestamps[i].to_string(),
                });
            }
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::DegenerateSeries(format!(
                "non-finite value {} in training series",
                bad
            )));
        }

        Ok(Self { timestamps, values })
    }

    /// Create a series from aggregated points.
    pub fn from_points(points: &[AggregatedPoint]) -> Result<Self> {
        Self::new(
            points.iter().map(|p| p.period).collect(),
            points.iter().map(|p| p.aggregate).collect(),
        )
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Value observed at exactly `timestamp`, if any.
    pub fn value_at(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.timestamps
            .binary_search(&timestamp)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Iterate the series as aggregated points.
    pub fn points(&self) -> impl Iterator<Item = AggregatedPoint> + '_ {
        self.timestamps
            .iter()
            .zip(self.values.iter())
            .map(|(&period, &aggregate)| AggregatedPoint { period, aggregate })
    }

    /// Smallest gap between consecutive timestamps, in days.
    pub fn min_spacing_days(&self) -> Option<f64> {
        self.timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds() as f64 / 86_400.0)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_weekly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::weeks(i as i64)).collect()
    }

    #[test]
    fn training_series_constructs_from_vectors() {
        let timestamps = make_weekly_timestamps(4);
        let values = vec![1.0, 2.0, 3.0, 4.0];

        let series = TrainingSeries::new(timestamps.clone(), values.clone()).unwrap();

        assert_eq!(series.len(), 4);
        assert!(!series.is_empty());
        assert_eq!(series.values(), &values);
        assert_eq!(series.timestamps(), &timestamps);
        assert_eq!(series.first_timestamp(), Some(timestamps[0]));
        assert_eq!(series.last_timestamp(), Some(timestamps[3]));
    }

    #[test]
    fn training_series_rejects_non_increasing_timestamps() {
        let mut timestamps = make_weekly_timestamps(3);
        timestamps.swap(1, 2);
        let result = TrainingSeries::new(timestamps, vec![1.0, 2.0, 3.0]);
        match result {
            Err(ForecastError::UnorderedTimestamps { earlier, later }) => {
                assert!(earlier.starts_with("2024-01-21"), "{}", earlier);
                assert!(later.starts_with("2024-01-14"), "{}", later);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        // Duplicate timestamps
        let t = make_weekly_timestamps(1)[0];
        let result = TrainingSeries::new(vec![t, t], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::UnorderedTimestamps { .. })));
    }

    #[test]
    fn training_series_rejects_length_mismatch() {
        let result = TrainingSeries::new(make_weekly_timestamps(3), vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn training_series_rejects_non_finite_values() {
        let result = TrainingSeries::new(make_weekly_timestamps(2), vec![1.0, f64::NAN]);
        assert!(result.is_err());
    }

    #[test]
    fn value_lookup_is_exact() {
        let timestamps = make_weekly_timestamps(3);
        let series = TrainingSeries::new(timestamps.clone(), vec![10.0, 20.0, 30.0]).unwrap();

        assert_eq!(series.value_at(timestamps[1]), Some(20.0));
        assert_eq!(series.value_at(timestamps[1] + Duration::seconds(1)), None);
    }

    #[test]
    fn points_round_trip_through_series() {
        let timestamps = make_weekly_timestamps(3);
        let points: Vec<AggregatedPoint> = timestamps
            .iter()
            .enumerate()
            .map(|(i, &t)| AggregatedPoint::new(t, i as f64 + 1.0))
            .collect();

        let series = TrainingSeries::from_points(&points).unwrap();
        let back: Vec<AggregatedPoint> = series.points().collect();
        assert_eq!(back, points);
    }

    #[test]
    fn min_spacing_tolerates_gaps() {
        let mut timestamps = make_weekly_timestamps(5);
        timestamps.remove(2);
        let series = TrainingSeries::new(timestamps, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(series.min_spacing_days(), Some(7.0));

        let single = TrainingSeries::new(make_weekly_timestamps(1), vec![1.0]).unwrap();
        assert_eq!(single.min_spacing_days(), None);
    }
}

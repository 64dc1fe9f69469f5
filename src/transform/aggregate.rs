//! Temporal aggregation of raw observations into a regular period grid.

use crate::core::{AggregatedPoint, Cadence, Observation};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Bins observations into fixed-width periods and sums each period.
///
/// The output covers every period from the earliest to the latest
/// observation. Periods without observations appear with aggregate `0.0`;
/// dropping them is left to [`SeriesFilter`](super::SeriesFilter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalAggregator {
    cadence: Cadence,
}

impl TemporalAggregator {
    pub fn new(cadence: Cadence) -> Self {
        Self { cadence }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Sum observations per period, in chronological order.
    pub fn aggregate(&self, observations: &[Observation]) -> Result<Vec<AggregatedPoint>> {
        let mut sums: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();

        for (idx, obs) in observations.iter().enumerate() {
            if !obs.value.is_finite() {
                return Err(ForecastError::Schema {
                    field: "value".to_string(),
                    detail: format!("observation {} at {} has non-finite value {}", idx, obs.timestamp, obs.value),
                });
            }
            *sums.entry(self.cadence.period_label(obs.timestamp)).or_insert(0.0) += obs.value;
        }

        let (first, last) = match (sums.keys().next(), sums.keys().next_back()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Ok(Vec::new()),
        };

        let mut points = Vec::new();
        let mut period = first;
        while period <= last {
            let aggregate = sums.get(&period).copied().unwrap_or(0.0);
            if !aggregate.is_finite() {
                return Err(ForecastError::Schema {
                    field: "value".to_string(),
                    detail: format!("sum for period {} overflows to {}", period, aggregate),
                });
            }
            points.push(AggregatedPoint::new(period, aggregate));
            if period == last {
                break;
            }
            period = self.cadence.advance(period, 1)?;
        }

        tracing::debug!(
            cadence = %self.cadence,
            observations = observations.len(),
            periods = points.len(),
            "aggregated observations"
        );

        Ok(points)
    }
}

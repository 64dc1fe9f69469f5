//! Prediction grid covering the training history plus future periods.

use crate::core::{Cadence, TrainingSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Ordered timestamps at which a fitted model is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonGrid {
    timestamps: Vec<DateTime<Utc>>,
    history_len: usize,
}

impl HorizonGrid {
    /// Grid over arbitrary timestamps, all treated as history.
    pub fn from_timestamps(timestamps: Vec<DateTime<Utc>>) -> Self {
        let history_len = timestamps.len();
        Self {
            timestamps,
            history_len,
        }
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of leading entries copied from the training series.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Entries beyond the training history.
    pub fn future(&self) -> &[DateTime<Utc>] {
        &self.timestamps[self.history_len..]
    }
}

/// Largest accepted number of future periods.
pub const MAX_FUTURE_PERIODS: i64 = 100_000;

/// Extends the training timestamps by a fixed number of periods.
///
/// The period count is checked on construction so a bad value is reported
/// before any aggregation or fitting runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FutureHorizonBuilder {
    cadence: Cadence,
    periods: usize,
}

impl FutureHorizonBuilder {
    pub fn new(cadence: Cadence, periods: i64) -> Result<Self> {
        if periods <= 0 {
            return Err(ForecastError::Configuration(format!(
                "future_periods must be a positive integer, got {}",
                periods
            )));
        }
        if periods > MAX_FUTURE_PERIODS {
            return Err(ForecastError::Configuration(format!(
                "future_periods must be at most {}, got {}",
                MAX_FUTURE_PERIODS, periods
            )));
        }
        Ok(Self {
            cadence,
            periods: periods as usize,
        })
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Training timestamps followed by `periods` evenly spaced future ones.
    pub fn build(&self, series: &TrainingSeries) -> Result<HorizonGrid> {
        let last = series
            .last_timestamp()
            .ok_or(ForecastError::InsufficientData { needed: 1, got: 0 })?;

        let mut timestamps = Vec::with_capacity(series.len() + self.periods);
        timestamps.extend_from_slice(series.timestamps());
        for step in 1..=self.periods as i64 {
            timestamps.push(self.cadence.advance(last, step)?);
        }

        Ok(HorizonGrid {
            timestamps,
            history_len: series.len(),
        })
    }
}

//! Prediction and output rows produced by the forecasting pipeline.

use chrono::{DateTime, Utc};

/// Model evaluation at one grid timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRow {
    pub timestamp: DateTime<Utc>,
    /// Trend plus seasonality.
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

impl PredictionRow {
    /// Width of the uncertainty interval.
    pub fn interval_width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `lower <= point <= upper` holds.
    pub fn is_bracketed(&self) -> bool {
        self.lower <= self.point && self.point <= self.upper
    }
}

/// Prediction joined with the observed value at the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRow {
    pub timestamp: DateTime<Utc>,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
    /// Observed aggregate; `None` for future periods and filtered-out history.
    pub actual: Option<f64>,
}

impl OutputRow {
    pub fn from_prediction(row: &PredictionRow, actual: Option<f64>) -> Self {
        Self {
            timestamp: row.timestamp,
            point: row.point,
            lower: row.lower,
            upper: row.upper,
            actual,
        }
    }
}

/// Combined historical and forecast table, ordered by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    rows: Vec<OutputRow>,
}

impl ForecastTable {
    /// Create a table, sorting rows by timestamp.
    pub fn new(mut rows: Vec<OutputRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows carrying an observed value.
    pub fn observed(&self) -> impl Iterator<Item = &OutputRow> {
        self.rows.iter().filter(|r| r.actual.is_some())
    }

    /// Rows without an observed value.
    pub fn unobserved(&self) -> impl Iterator<Item = &OutputRow> {
        self.rows.iter().filter(|r| r.actual.is_none())
    }
}

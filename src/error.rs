//! Error types for the trendcast pipeline.

use std::fmt;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Pipeline stage an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Ingest,
    Fit,
    Export,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Ingest => "ingest",
            Stage::Fit => "fit",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while forecasting.
///
/// Every variant is terminal for the run; none is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input source is missing or unreadable.
    #[error("input unavailable: {path}: {reason}")]
    InputUnavailable { path: String, reason: String },

    /// A required field is absent or holds an unusable value.
    #[error("schema error in field '{field}': {detail}")]
    Schema { field: String, detail: String },

    /// Timestamp text that cannot be read as a date/time.
    #[error("cannot parse timestamp '{value}': {reason}")]
    Parse { value: String, reason: String },

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Series timestamps are not strictly increasing.
    #[error("timestamps out of order: {later} does not follow {earlier}")]
    UnorderedTimestamps { earlier: String, later: String },

    /// Series carries no variation to fit a trend to.
    #[error("degenerate series: {0}")]
    DegenerateSeries(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Destination cannot be written.
    #[error("cannot write output to {path}: {reason}")]
    OutputWrite { path: String, reason: String },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Stage of the pipeline this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ForecastError::Configuration(_) => Stage::Configure,
            ForecastError::InputUnavailable { .. }
            | ForecastError::Schema { .. }
            | ForecastError::Parse { .. } => Stage::Ingest,
            ForecastError::InsufficientData { .. }
            | ForecastError::UnorderedTimestamps { .. }
            | ForecastError::DegenerateSeries(_)
            | ForecastError::DimensionMismatch { .. }
            | ForecastError::ComputationError(_) => Stage::Fit,
            ForecastError::OutputWrite { .. } => Stage::Export,
        }
    }
}

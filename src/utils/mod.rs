//! Utility functions for forecasting models.

pub mod linalg;
pub mod metrics;
pub mod stats;

pub use linalg::{apply_columns, ridge_fit};
pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use stats::normal_critical_value;

//! Forecaster traits separating configuration, fitting and prediction.

use crate::core::{HorizonGrid, PredictionRow, TrainingSeries};
use crate::error::Result;

/// Model settings that can be fitted to a training series.
///
/// Fitting does not mutate the settings; it produces an immutable
/// fitted model, so one set of settings can be reused across series.
pub trait Forecaster {
    /// The fitted model produced by [`fit`](Forecaster::fit).
    type Fitted: FittedForecaster;

    /// Fit the model to the training series.
    fn fit(&self, series: &TrainingSeries) -> Result<Self::Fitted>;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// A fitted model that can be evaluated at arbitrary timestamps.
pub trait FittedForecaster {
    /// One prediction per grid timestamp, in grid order.
    ///
    /// Deterministic for a given fitted model.
    fn predict(&self, grid: &HorizonGrid) -> Vec<PredictionRow>;

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> &[f64];

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> &[f64];
}

//! Forecasting models.

mod traits;

pub mod decomposable;

pub use decomposable::{
    ComponentBreakdown, DecomposableForecastModel, FittedModel, UncertaintyMethod,
};
pub use traits::{FittedForecaster, Forecaster};

//! Core data structures for time series forecasting.

mod cadence;
mod forecast;
mod horizon;
mod series;

pub use cadence::Cadence;
pub use forecast::{ForecastTable, OutputRow, PredictionRow};
pub use horizon::{FutureHorizonBuilder, HorizonGrid, MAX_FUTURE_PERIODS};
pub use series::{AggregatedPoint, Observation, TrainingSeries};

//! # trendcast
//!
//! Batch sales forecasting: raw timestamped transactions are summed into a
//! regular weekly (or daily) series, non-positive periods are dropped, and a
//! decomposable model (piecewise-linear trend plus Fourier seasonality) is
//! fitted and projected forward with uncertainty intervals that widen with
//! the forecast distance.
//!
//! The stages are usable on their own ([`transform`], [`models`],
//! [`core::FutureHorizonBuilder`], [`pipeline::ForecastAssembler`]) or
//! chained by [`pipeline::ForecastPipeline`].

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result, Stage};

pub mod prelude {
    pub use crate::core::{
        Cadence, ForecastTable, FutureHorizonBuilder, HorizonGrid, Observation, OutputRow,
        PredictionRow, TrainingSeries,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{DecomposableForecastModel, FittedForecaster, Forecaster};
    pub use crate::pipeline::{ForecastAssembler, ForecastPipeline, PipelineSettings};
    pub use crate::transform::{SeriesFilter, TemporalAggregator};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}

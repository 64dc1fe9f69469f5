//! Run configuration.
//!
//! Sources are layered lowest to highest: built-in defaults, an optional
//! config file, `TRENDCAST_*` environment variables (nested keys use `__`,
//! e.g. `TRENDCAST_MODEL__SEED`), then command-line overrides.

use crate::core::{Cadence, MAX_FUTURE_PERIODS};
use crate::error::{ForecastError, Result};
use crate::models::{DecomposableForecastModel, UncertaintyMethod};
use crate::pipeline::PipelineSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "TRENDCAST";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ForecastConfig {
    #[serde(default = "default_input_source")]
    pub input_source: String,
    #[serde(default = "default_output_destination")]
    pub output_destination: String,
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_future_periods")]
    pub future_periods: i64,
    #[serde(default = "default_cadence")]
    pub aggregation_cadence: String,
    #[serde(default = "default_true")]
    pub enable_weekly_seasonality: bool,
    #[serde(default = "default_true")]
    pub enable_yearly_seasonality: bool,
    #[serde(default)]
    pub model: ModelConfig,
}

fn default_input_source() -> String {
    "data/input/ecommerce_clean.csv".to_string()
}
fn default_output_destination() -> String {
    "data/output/forecast_results.csv".to_string()
}
fn default_timestamp_column() -> String {
    "order_purchase_timestamp".to_string()
}
fn default_value_column() -> String {
    "price".to_string()
}
fn default_future_periods() -> i64 {
    26
}
fn default_cadence() -> String {
    "W".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            input_source: default_input_source(),
            output_destination: default_output_destination(),
            timestamp_column: default_timestamp_column(),
            value_column: default_value_column(),
            future_periods: default_future_periods(),
            aggregation_cadence: default_cadence(),
            enable_weekly_seasonality: true,
            enable_yearly_seasonality: true,
            model: ModelConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Uncertainty {
    #[default]
    Analytic,
    Simulated,
}

/// Tuning knobs of the decomposable model.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub weekly_order: usize,
    pub yearly_order: usize,
    pub max_changepoints: usize,
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub interval_width: f64,
    pub uncertainty: Uncertainty,
    pub uncertainty_samples: usize,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weekly_order: 3,
            yearly_order: 10,
            max_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.80,
            uncertainty: Uncertainty::Analytic,
            uncertainty_samples: 1000,
            seed: 0,
        }
    }
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub future_periods: Option<i64>,
    pub cadence: Option<String>,
    pub disable_weekly: bool,
    pub disable_yearly: bool,
}

/// Validated settings for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub timestamp_column: String,
    pub value_column: String,
    pub pipeline: PipelineSettings,
}

impl ForecastConfig {
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "input_source",
                overrides.input.as_ref().map(|p| p.display().to_string()),
            )
            .and_then(|b| {
                b.set_override_option(
                    "output_destination",
                    overrides.output.as_ref().map(|p| p.display().to_string()),
                )
            })
            .and_then(|b| b.set_override_option("future_periods", overrides.future_periods))
            .and_then(|b| b.set_override_option("aggregation_cadence", overrides.cadence.clone()))
            .and_then(|b| {
                b.set_override_option(
                    "enable_weekly_seasonality",
                    overrides.disable_weekly.then_some(false),
                )
            })
            .and_then(|b| {
                b.set_override_option(
                    "enable_yearly_seasonality",
                    overrides.disable_yearly.then_some(false),
                )
            })
            .map_err(config_error)?;

        let config: ForecastConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Check every option and convert to typed settings.
    pub fn validate(&self) -> Result<JobSettings> {
        if self.future_periods <= 0 {
            return Err(ForecastError::Configuration(format!(
                "future_periods must be positive, got {}",
                self.future_periods
            )));
        }
        if self.future_periods > MAX_FUTURE_PERIODS {
            return Err(ForecastError::Configuration(format!(
                "future_periods must be at most {}, got {}",
                MAX_FUTURE_PERIODS, self.future_periods
            )));
        }

        for (key, value) in [
            ("input_source", &self.input_source),
            ("output_destination", &self.output_destination),
            ("timestamp_column", &self.timestamp_column),
            ("value_column", &self.value_column),
        ] {
            if value.trim().is_empty() {
                return Err(ForecastError::Configuration(format!("{} must not be empty", key)));
            }
        }

        let cadence: Cadence = self.aggregation_cadence.parse()?;
        let model = self.model.build(
            self.enable_weekly_seasonality,
            self.enable_yearly_seasonality,
        );
        model.validate()?;

        Ok(JobSettings {
            input: PathBuf::from(&self.input_source),
            output: PathBuf::from(&self.output_destination),
            timestamp_column: self.timestamp_column.clone(),
            value_column: self.value_column.clone(),
            pipeline: PipelineSettings {
                cadence,
                future_periods: self.future_periods,
                model,
            },
        })
    }
}

impl ModelConfig {
    fn build(&self, weekly: bool, yearly: bool) -> DecomposableForecastModel {
        let uncertainty = match self.uncertainty {
            Uncertainty::Analytic => UncertaintyMethod::Analytic,
            Uncertainty::Simulated => UncertaintyMethod::Simulated {
                samples: self.uncertainty_samples,
                seed: self.seed,
            },
        };

        DecomposableForecastModel::new()
            .with_weekly_seasonality(weekly)
            .with_yearly_seasonality(yearly)
            .with_weekly_order(self.weekly_order)
            .with_yearly_order(self.yearly_order)
            .with_max_changepoints(self.max_changepoints)
            .with_changepoint_range(self.changepoint_range)
            .with_changepoint_prior_scale(self.changepoint_prior_scale)
            .with_seasonality_prior_scale(self.seasonality_prior_scale)
            .with_interval_width(self.interval_width)
            .with_uncertainty(uncertainty)
    }
}

fn config_error(err: config::ConfigError) -> ForecastError {
    ForecastError::Configuration(err.to_string())
}

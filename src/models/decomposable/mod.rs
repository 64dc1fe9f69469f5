//! Additive trend plus seasonality model.
//!
//! The fitted curve is
//!
//! ```text
//! y(t) = g(t) + s_weekly(t) + s_yearly(t)
//! ```
//!
//! where `g` is a piecewise-linear trend with automatically placed
//! changepoints and each `s` is a truncated Fourier series. Parameters are
//! estimated jointly by penalized least squares, which is the MAP estimate
//! under Gaussian priors on the changepoint slopes and seasonal coefficients.
//!
//! # Example
//!
//! ```
//! use trendcast::core::{Cadence, FutureHorizonBuilder, TrainingSeries};
//! use trendcast::models::{DecomposableForecastModel, FittedForecaster, Forecaster};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let timestamps: Vec<_> = (0..52).map(|w| start + Duration::weeks(w)).collect();
//! let values: Vec<f64> = (0..52).map(|w| 100.0 + 5.0 * w as f64).collect();
//! let series = TrainingSeries::new(timestamps, values).unwrap();
//!
//! let fitted = DecomposableForecastModel::new().fit(&series).unwrap();
//! let grid = FutureHorizonBuilder::new(Cadence::weekly(), 4).unwrap().build(&series).unwrap();
//! let rows = fitted.predict(&grid);
//!
//! assert_eq!(rows.len(), 56);
//! assert!(rows.iter().all(|r| r.lower <= r.point && r.point <= r.upper));
//! ```

mod seasonality;
mod trend;
mod uncertainty;

pub use seasonality::{FittedSeasonality, SeasonalComponent, WEEKLY_PERIOD, YEARLY_PERIOD};
pub use trend::{hinge_columns, select_changepoints, PiecewiseLinearTrend};
pub use uncertainty::{TrendUncertainty, UncertaintyMethod};

use crate::core::{HorizonGrid, PredictionRow, TrainingSeries};
use crate::error::{ForecastError, Result};
use crate::models::{FittedForecaster, Forecaster};
use crate::utils::linalg::{apply_columns, ridge_fit};
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};
use crate::utils::stats::variance;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Lower bound on the scaled noise variance used to set penalties.
const NOISE_VARIANCE_FLOOR: f64 = 1e-4;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Specification of the decomposable model.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposableForecastModel {
    weekly_seasonality: bool,
    yearly_seasonality: bool,
    weekly_order: usize,
    yearly_order: usize,
    max_changepoints: usize,
    changepoint_range: f64,
    changepoint_prior_scale: f64,
    seasonality_prior_scale: f64,
    interval_width: f64,
    uncertainty: UncertaintyMethod,
}

impl Default for DecomposableForecastModel {
    fn default() -> Self {
        Self {
            weekly_seasonality: true,
            yearly_seasonality: true,
            weekly_order: 3,
            yearly_order: 10,
            max_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.80,
            uncertainty: UncertaintyMethod::Analytic,
        }
    }
}

impl DecomposableForecastModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekly_seasonality(mut self, enabled: bool) -> Self {
        self.weekly_seasonality = enabled;
        self
    }

    pub fn with_yearly_seasonality(mut self, enabled: bool) -> Self {
        self.yearly_seasonality = enabled;
        self
    }

    pub fn with_weekly_order(mut self, order: usize) -> Self {
        self.weekly_order = order;
        self
    }

    pub fn with_yearly_order(mut self, order: usize) -> Self {
        self.yearly_order = order;
        self
    }

    pub fn with_max_changepoints(mut self, n: usize) -> Self {
        self.max_changepoints = n;
        self
    }

    pub fn with_changepoint_range(mut self, range: f64) -> Self {
        self.changepoint_range = range;
        self
    }

    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Self {
        self.changepoint_prior_scale = scale;
        self
    }

    pub fn with_seasonality_prior_scale(mut self, scale: f64) -> Self {
        self.seasonality_prior_scale = scale;
        self
    }

    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    pub fn with_uncertainty(mut self, method: UncertaintyMethod) -> Self {
        self.uncertainty = method;
        self
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    pub fn uncertainty(&self) -> UncertaintyMethod {
        self.uncertainty
    }

    /// Check the tuning parameters without touching any data.
    pub fn validate(&self) -> Result<()> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::Configuration(format!(
                "interval_width must lie in (0, 1), got {}",
                self.interval_width
            )));
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::Configuration(format!(
                "changepoint_range must lie in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        if !(self.changepoint_prior_scale > 0.0 && self.changepoint_prior_scale.is_finite()) {
            return Err(ForecastError::Configuration(format!(
                "changepoint_prior_scale must be positive, got {}",
                self.changepoint_prior_scale
            )));
        }
        if !(self.seasonality_prior_scale > 0.0 && self.seasonality_prior_scale.is_finite()) {
            return Err(ForecastError::Configuration(format!(
                "seasonality_prior_scale must be positive, got {}",
                self.seasonality_prior_scale
            )));
        }
        if let UncertaintyMethod::Simulated { samples: 0, .. } = self.uncertainty {
            return Err(ForecastError::Configuration(
                "uncertainty_samples must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Seasonal components that can be identified from the series spacing.
    fn active_components(&self, min_spacing_days: f64) -> Vec<SeasonalComponent> {
        let candidates = [
            (self.weekly_seasonality, SeasonalComponent::weekly(self.weekly_order)),
            (self.yearly_seasonality, SeasonalComponent::yearly(self.yearly_order)),
        ];

        candidates
            .into_iter()
            .filter(|(enabled, c)| *enabled && c.order() > 0)
            .filter_map(|(_, component)| {
                if component.period_days() <= min_spacing_days {
                    warn!(
                        component = component.name(),
                        period_days = component.period_days(),
                        spacing_days = min_spacing_days,
                        "seasonal component not identifiable at this cadence, skipping"
                    );
                    None
                } else {
                    Some(component)
                }
            })
            .collect()
    }
}

impl Forecaster for DecomposableForecastModel {
    type Fitted = FittedModel;

    fn fit(&self, series: &TrainingSeries) -> Result<FittedModel> {
        self.validate()?;

        let n = series.len();
        let (start, end) = match (series.first_timestamp(), series.last_timestamp()) {
            (Some(s), Some(e)) if n >= 2 => (s, e),
            _ => return Err(ForecastError::InsufficientData { needed: 2, got: n }),
        };

        let values = series.values();
        let first = values[0];
        if values.iter().all(|&v| v == first) {
            return Err(ForecastError::DegenerateSeries(format!(
                "all {} aggregates equal {}; trend is undefined",
                n, first
            )));
        }

        let span_seconds = seconds_between(start, end);
        let y_scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let y: Vec<f64> = values.iter().map(|v| v / y_scale).collect();

        let offsets: Vec<f64> = series
            .timestamps()
            .iter()
            .map(|&ts| seconds_between(start, ts))
            .collect();
        let t: Vec<f64> = offsets.iter().map(|s| s / span_seconds).collect();
        let days: Vec<f64> = offsets.iter().map(|s| s / SECONDS_PER_DAY).collect();

        let components = self.active_components(series.min_spacing_days().unwrap_or(0.0));
        let seasonal_columns: Vec<Vec<f64>> = components
            .iter()
            .flat_map(|c| c.feature_columns(&days))
            .collect();
        let seasonal_width = seasonal_columns.len();
        let seasonal_var = self.seasonality_prior_scale.powi(2);

        // Pass 1: noise level without changepoints.
        let mut columns = Vec::with_capacity(2 + seasonal_width);
        columns.push(vec![1.0; n]);
        columns.push(t.clone());
        columns.extend(seasonal_columns.iter().cloned());

        let mut penalties = vec![0.0, 0.0];
        let prior_noise = variance(&y).max(NOISE_VARIANCE_FLOOR);
        penalties.extend(std::iter::repeat(prior_noise / seasonal_var).take(seasonal_width));

        let beta = ridge_fit(&columns, &y, &penalties)?;
        let base_fit = apply_columns(&columns, &beta, n);
        let dof = n.saturating_sub(2).max(1) as f64;
        let noise_var = (sum_sq_diff(&y, &base_fit) / dof).max(NOISE_VARIANCE_FLOOR);

        // Pass 2: joint fit with changepoints.
        let changepoints = select_changepoints(&t, self.max_changepoints, self.changepoint_range);
        let n_cp = changepoints.len();

        let mut columns = Vec::with_capacity(2 + n_cp + seasonal_width);
        columns.push(vec![1.0; n]);
        columns.push(t.clone());
        columns.extend(hinge_columns(&t, &changepoints));
        columns.extend(seasonal_columns);

        let mut penalties = vec![0.0, 0.0];
        penalties.extend(
            std::iter::repeat(noise_var / self.changepoint_prior_scale.powi(2)).take(n_cp),
        );
        penalties.extend(std::iter::repeat(noise_var / seasonal_var).take(seasonal_width));

        let beta = ridge_fit(&columns, &y, &penalties)?;
        let fitted_scaled = apply_columns(&columns, &beta, n);

        let trend = PiecewiseLinearTrend::new(
            beta[0],
            beta[1],
            changepoints,
            beta[2..2 + n_cp].to_vec(),
        );

        let mut offset = 2 + n_cp;
        let seasonalities: Vec<FittedSeasonality> = components
            .into_iter()
            .map(|component| {
                let width = component.width();
                let coefficients = beta[offset..offset + width].to_vec();
                offset += width;
                FittedSeasonality::new(component, coefficients)
            })
            .collect();

        let sigma_obs = (sum_sq_diff(&y, &fitted_scaled) / (n - 1).max(1) as f64).sqrt();
        let jump_scale = if n_cp > 0 {
            trend.mean_abs_delta() + 1e-8
        } else {
            0.0
        };
        let uncertainty = TrendUncertainty::new(
            self.uncertainty,
            self.interval_width,
            sigma_obs,
            n_cp as f64,
            jump_scale,
        )?;

        let fitted_values: Vec<f64> = fitted_scaled.iter().map(|v| v * y_scale).collect();
        let residuals: Vec<f64> = values
            .iter()
            .zip(&fitted_values)
            .map(|(a, f)| a - f)
            .collect();
        let metrics = calculate_metrics(values, &fitted_values)?;

        debug!(
            offset = trend.offset() * y_scale,
            base_slope = trend.base_slope() * y_scale,
            final_slope = trend.final_slope() * y_scale,
            sigma_obs = sigma_obs * y_scale,
            "fitted trend parameters"
        );
        info!(
            points = n,
            changepoints = n_cp,
            seasonal_terms = seasonal_width,
            mae = metrics.mae,
            rmse = metrics.rmse,
            mape = ?metrics.mape,
            "model fitted"
        );

        Ok(FittedModel {
            start,
            span_seconds,
            y_scale,
            trend,
            seasonalities,
            uncertainty,
            fitted_values,
            residuals,
            metrics,
        })
    }

    fn name(&self) -> &str {
        "Decomposable"
    }
}

/// Per-component contributions at each grid timestamp, in original units.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBreakdown {
    pub timestamps: Vec<DateTime<Utc>>,
    pub trend: Vec<f64>,
    pub weekly: Option<Vec<f64>>,
    pub yearly: Option<Vec<f64>>,
}

/// Parameters estimated by [`DecomposableForecastModel`]. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    start: DateTime<Utc>,
    span_seconds: f64,
    y_scale: f64,
    trend: PiecewiseLinearTrend,
    seasonalities: Vec<FittedSeasonality>,
    uncertainty: TrendUncertainty,
    fitted_values: Vec<f64>,
    residuals: Vec<f64>,
    metrics: AccuracyMetrics,
}

impl FittedModel {
    /// Trend in scaled units (time in `[0, 1]` over history, values divided by
    /// [`value_scale`](Self::value_scale)).
    pub fn trend(&self) -> &PiecewiseLinearTrend {
        &self.trend
    }

    pub fn seasonalities(&self) -> &[FittedSeasonality] {
        &self.seasonalities
    }

    pub fn value_scale(&self) -> f64 {
        self.y_scale
    }

    /// Changepoint timestamps.
    pub fn changepoints(&self) -> Vec<DateTime<Utc>> {
        self.trend
            .changepoints()
            .iter()
            .map(|&t| {
                let millis = (t * self.span_seconds * 1000.0).round() as i64;
                self.start + chrono::Duration::milliseconds(millis)
            })
            .collect()
    }

    /// In-sample residual standard deviation, in original units.
    pub fn sigma_obs(&self) -> f64 {
        self.uncertainty.sigma_obs() * self.y_scale
    }

    pub fn in_sample_metrics(&self) -> &AccuracyMetrics {
        &self.metrics
    }

    pub fn uncertainty(&self) -> &TrendUncertainty {
        &self.uncertainty
    }

    /// Scaled time and days since the first training timestamp.
    fn coordinates(&self, ts: DateTime<Utc>) -> (f64, f64) {
        let secs = seconds_between(self.start, ts);
        (secs / self.span_seconds, secs / SECONDS_PER_DAY)
    }

    /// Trend and seasonal contributions at each grid timestamp.
    pub fn predict_components(&self, grid: &HorizonGrid) -> ComponentBreakdown {
        let coords: Vec<(f64, f64)> = grid
            .timestamps()
            .iter()
            .map(|&ts| self.coordinates(ts))
            .collect();

        let trend = coords
            .iter()
            .map(|&(t, _)| self.trend.evaluate(t) * self.y_scale)
            .collect();

        let component = |name: &str| {
            self.seasonalities
                .iter()
                .find(|s| s.component().name() == name)
                .map(|s| {
                    coords
                        .iter()
                        .map(|&(_, d)| s.evaluate(d) * self.y_scale)
                        .collect()
                })
        };

        ComponentBreakdown {
            timestamps: grid.timestamps().to_vec(),
            trend,
            weekly: component("weekly"),
            yearly: component("yearly"),
        }
    }
}

impl FittedForecaster for FittedModel {
    fn predict(&self, grid: &HorizonGrid) -> Vec<PredictionRow> {
        let coords: Vec<(f64, f64)> = grid
            .timestamps()
            .iter()
            .map(|&ts| self.coordinates(ts))
            .collect();

        // Last training point sits at t = 1.
        let horizons: Vec<f64> = coords.iter().map(|&(t, _)| (t - 1.0).max(0.0)).collect();
        let half_widths = self.uncertainty.half_widths(&horizons);

        grid.timestamps()
            .iter()
            .zip(coords)
            .zip(half_widths)
            .map(|((&timestamp, (t, d)), half)| {
                let seasonal: f64 = self.seasonalities.iter().map(|s| s.evaluate(d)).sum();
                let point = (self.trend.evaluate(t) + seasonal) * self.y_scale;
                let half = half * self.y_scale;
                PredictionRow {
                    timestamp,
                    point,
                    lower: point - half,
                    upper: point + half,
                }
            })
            .collect()
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted_values
    }

    fn residuals(&self) -> &[f64] {
        &self.residuals
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

fn sum_sq_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

//! Forecast interval half-widths.
//!
//! Future trend changes are modelled as a Poisson stream of changepoints with
//! Laplace-distributed slope jumps, matching the flexibility seen in history.
//! The half-width at scaled horizon `h` combines that trend deviation with the
//! in-sample noise level.

use crate::error::{ForecastError, Result};
use crate::utils::stats::{normal_critical_value, sorted_quantile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::{ContinuousCDF, Exp, Laplace};

/// How trend uncertainty is propagated into the future.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UncertaintyMethod {
    /// Closed-form variance of the changepoint process.
    #[default]
    Analytic,
    /// Seeded Monte Carlo draws of the changepoint process.
    Simulated { samples: usize, seed: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChangepointProcess {
    arrivals: Exp,
    jumps: Laplace,
}

/// Interval generator attached to a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendUncertainty {
    method: UncertaintyMethod,
    interval_width: f64,
    z: f64,
    sigma_obs: f64,
    rate: f64,
    jump_scale: f64,
    process: Option<ChangepointProcess>,
}

impl TrendUncertainty {
    /// `rate` is the changepoint rate per unit scaled time and `jump_scale`
    /// the Laplace scale of slope changes. `sigma_obs` is in scaled units.
    pub fn new(
        method: UncertaintyMethod,
        interval_width: f64,
        sigma_obs: f64,
        rate: f64,
        jump_scale: f64,
    ) -> Result<Self> {
        let z = normal_critical_value(interval_width)?;
        if let UncertaintyMethod::Simulated { samples: 0, .. } = method {
            return Err(ForecastError::Configuration(
                "uncertainty_samples must be positive".into(),
            ));
        }

        let process = if rate > 0.0 && jump_scale > 0.0 {
            let arrivals = Exp::new(rate)
                .map_err(|e| ForecastError::ComputationError(format!("arrival process: {}", e)))?;
            let jumps = Laplace::new(0.0, jump_scale)
                .map_err(|e| ForecastError::ComputationError(format!("slope jumps: {}", e)))?;
            Some(ChangepointProcess { arrivals, jumps })
        } else {
            None
        };

        Ok(Self {
            method,
            interval_width,
            z,
            sigma_obs: sigma_obs.max(0.0),
            rate,
            jump_scale,
            process,
        })
    }

    pub fn method(&self) -> UncertaintyMethod {
        self.method
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    pub fn sigma_obs(&self) -> f64 {
        self.sigma_obs
    }

    /// Half-width of the interval at each horizon (scaled units).
    ///
    /// Horizons at or before the last training time (`h <= 0`) receive the
    /// noise term only. The result is non-decreasing in `h`.
    pub fn half_widths(&self, horizons: &[f64]) -> Vec<f64> {
        let noise = self.z * self.sigma_obs;
        let mut widths = match (self.method, self.process) {
            (_, None) => vec![noise; horizons.len()],
            (UncertaintyMethod::Analytic, Some(_)) => horizons
                .iter()
                .map(|&h| {
                    let h = h.max(0.0);
                    let trend_var = self.rate * 2.0 * self.jump_scale.powi(2) * h.powi(3) / 3.0;
                    self.z * (self.sigma_obs.powi(2) + trend_var).sqrt()
                })
                .collect(),
            (UncertaintyMethod::Simulated { samples, seed }, Some(process)) => {
                self.simulate(&process, horizons, samples, seed, noise)
            }
        };

        enforce_widening(horizons, &mut widths);
        widths
    }

    fn simulate(
        &self,
        process: &ChangepointProcess,
        horizons: &[f64],
        samples: usize,
        seed: u64,
        noise: f64,
    ) -> Vec<f64> {
        let h_max = horizons.iter().copied().fold(0.0_f64, f64::max);
        if h_max <= 0.0 {
            return vec![noise; horizons.len()];
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut draws: Vec<Vec<f64>> = vec![Vec::with_capacity(samples); horizons.len()];
        let mut changes: Vec<(f64, f64)> = Vec::new();

        for _ in 0..samples {
            changes.clear();
            let mut tau = 0.0;
            loop {
                tau += process.arrivals.inverse_cdf(rng.gen_range(0.0..1.0));
                if tau >= h_max {
                    break;
                }
                let u = rng.gen_range(f64::EPSILON..1.0 - f64::EPSILON);
                changes.push((tau, process.jumps.inverse_cdf(u)));
            }

            for (slot, &h) in horizons.iter().enumerate() {
                if h > 0.0 {
                    let deviation: f64 = changes
                        .iter()
                        .map(|&(at, delta)| delta * (h - at).max(0.0))
                        .sum();
                    draws[slot].push(deviation);
                }
            }
        }

        let lower_q = (1.0 - self.interval_width) / 2.0;
        let upper_q = (1.0 + self.interval_width) / 2.0;

        draws
            .into_iter()
            .map(|mut d| {
                if d.is_empty() {
                    return noise;
                }
                d.sort_by(|a, b| a.total_cmp(b));
                let spread = (sorted_quantile(&d, upper_q) - sorted_quantile(&d, lower_q)) / 2.0;
                (noise.powi(2) + spread.powi(2)).sqrt()
            })
            .collect()
    }
}

/// Running maximum of `widths` taken in order of increasing horizon.
fn enforce_widening(horizons: &[f64], widths: &mut [f64]) {
    let mut order: Vec<usize> = (0..horizons.len()).collect();
    order.sort_by(|&a, &b| horizons[a].total_cmp(&horizons[b]));

    let mut running = 0.0_f64;
    for idx in order {
        running = running.max(widths[idx]);
        widths[idx] = running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn horizons() -> Vec<f64> {
        (0..=26).map(|i| i as f64 / 51.0).collect()
    }

    #[test]
    fn analytic_width_grows_with_horizon() {
        let u = TrendUncertainty::new(UncertaintyMethod::Analytic, 0.8, 0.05, 8.0, 0.1).unwrap();
        let w = u.half_widths(&horizons());

        assert_relative_eq!(w[0], 1.281552 * 0.05, epsilon = 1e-4);
        for pair in w.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn no_changepoints_gives_constant_width() {
        let u = TrendUncertainty::new(UncertaintyMethod::Analytic, 0.8, 0.05, 0.0, 0.0).unwrap();
        let w = u.half_widths(&horizons());
        assert!(w.iter().all(|&x| (x - w[0]).abs() < 1e-12));
    }

    #[test]
    fn simulated_is_reproducible_and_widening() {
        let method = UncertaintyMethod::Simulated {
            samples: 500,
            seed: 7,
        };
        let u = TrendUncertainty::new(method, 0.9, 0.02, 8.0, 0.2).unwrap();

        let first = u.half_widths(&horizons());
        let second = u.half_widths(&horizons());
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(first[26] > first[0]);
    }

    #[test]
    fn widening_holds_for_unsorted_horizons() {
        let u = TrendUncertainty::new(UncertaintyMethod::Analytic, 0.8, 0.05, 4.0, 0.1).unwrap();
        let hs = vec![0.4, 0.0, 0.2, 0.1];
        let w = u.half_widths(&hs);
        assert!(w[0] >= w[2] && w[2] >= w[3] && w[3] >= w[1]);
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(matches!(
            TrendUncertainty::new(UncertaintyMethod::Analytic, 1.5, 0.1, 1.0, 0.1),
            Err(ForecastError::Configuration(_))
        ));
        assert!(matches!(
            TrendUncertainty::new(
                UncertaintyMethod::Simulated { samples: 0, seed: 0 },
                0.8,
                0.1,
                1.0,
                0.1
            ),
            Err(ForecastError::Configuration(_))
        ));
    }
}

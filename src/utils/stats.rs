//! Statistical utility functions.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal critical value for a central interval.
///
/// `coverage = 0.95` gives `z ≈ 1.96`.
pub fn normal_critical_value(coverage: f64) -> Result<f64> {
    if !(coverage > 0.0 && coverage < 1.0) {
        return Err(ForecastError::Configuration(format!(
            "interval width must lie in (0, 1), got {}",
            coverage
        )));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ComputationError(format!("standard normal: {}", e)))?;
    Ok(normal.inverse_cdf(0.5 + coverage / 2.0))
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Empirical quantile of an already sorted slice (floor index, as in bootstrap intervals).
pub fn sorted_quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let n = sorted.len();
    let idx = ((q * n as f64).floor() as usize).min(n - 1);
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn critical_values_match_tables() {
        assert_relative_eq!(normal_critical_value(0.95).unwrap(), 1.959964, epsilon = 1e-4);
        assert_relative_eq!(normal_critical_value(0.80).unwrap(), 1.281552, epsilon = 1e-4);
    }

    #[test]
    fn critical_value_rejects_out_of_range_coverage() {
        assert!(normal_critical_value(0.0).is_err());
        assert!(normal_critical_value(1.0).is_err());
        assert!(normal_critical_value(f64::NAN).is_err());
    }

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn variance_calculates_correctly() {
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn sorted_quantile_uses_floor_index() {
        let sorted: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_eq!(sorted_quantile(&sorted, 0.1), 1.0);
        assert_eq!(sorted_quantile(&sorted, 0.95), 9.0);
        assert_eq!(sorted_quantile(&sorted, 1.0), 9.0);
        assert!(sorted_quantile(&[], 0.5).is_nan());
    }
}

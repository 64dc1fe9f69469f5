//! Fourier seasonal components.

use std::f64::consts::PI;

/// Days in a weekly cycle.
pub const WEEKLY_PERIOD: f64 = 7.0;
/// Days in a yearly cycle.
pub const YEARLY_PERIOD: f64 = 365.25;

/// A periodic component described by its period (in days) and harmonic order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalComponent {
    name: &'static str,
    period_days: f64,
    order: usize,
}

impl SeasonalComponent {
    pub fn weekly(order: usize) -> Self {
        Self {
            name: "weekly",
            period_days: WEEKLY_PERIOD,
            order,
        }
    }

    pub fn yearly(order: usize) -> Self {
        Self {
            name: "yearly",
            period_days: YEARLY_PERIOD,
            order,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period_days(&self) -> f64 {
        self.period_days
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of regressors contributed (one cosine and one sine per harmonic).
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Feature values at a single time, `[cos₁, sin₁, cos₂, sin₂, …]`.
    pub fn features_at(&self, days: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * days / self.period_days;
            row.push(angle.cos());
            row.push(angle.sin());
        }
        row
    }

    /// Column-major feature block for a sequence of times.
    pub fn feature_columns(&self, days: &[f64]) -> Vec<Vec<f64>> {
        let mut columns = Vec::with_capacity(self.width());
        for k in 1..=self.order {
            let freq = 2.0 * PI * k as f64 / self.period_days;
            columns.push(days.iter().map(|d| (freq * d).cos()).collect());
            columns.push(days.iter().map(|d| (freq * d).sin()).collect());
        }
        columns
    }
}

/// A seasonal component together with its fitted coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSeasonality {
    component: SeasonalComponent,
    coefficients: Vec<f64>,
}

impl FittedSeasonality {
    pub fn new(component: SeasonalComponent, coefficients: Vec<f64>) -> Self {
        debug_assert_eq!(component.width(), coefficients.len());
        Self {
            component,
            coefficients,
        }
    }

    pub fn component(&self) -> &SeasonalComponent {
        &self.component
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn evaluate(&self, days: f64) -> f64 {
        self.component
            .features_at(days)
            .iter()
            .zip(&self.coefficients)
            .map(|(x, b)| x * b)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn feature_block_has_two_columns_per_harmonic() {
        let days: Vec<f64> = (0..30).map(|d| d as f64).collect();
        let cols = SeasonalComponent::yearly(10).feature_columns(&days);
        assert_eq!(cols.len(), 20);
        assert!(cols.iter().all(|c| c.len() == 30));
    }

    #[test]
    fn features_repeat_after_one_period() {
        let weekly = SeasonalComponent::weekly(3);
        let a = weekly.features_at(2.5);
        let b = weekly.features_at(2.5 + WEEKLY_PERIOD);
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn row_and_column_layouts_agree() {
        let yearly = SeasonalComponent::yearly(2);
        let days = [0.0, 40.0, 100.0];
        let cols = yearly.feature_columns(&days);
        for (i, &d) in days.iter().enumerate() {
            let row = yearly.features_at(d);
            for (j, col) in cols.iter().enumerate() {
                assert_relative_eq!(row[j], col[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn fitted_seasonality_evaluates_linear_combination() {
        let fitted = FittedSeasonality::new(SeasonalComponent::weekly(1), vec![2.0, 0.0]);
        assert_relative_eq!(fitted.evaluate(0.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(fitted.evaluate(3.5), -2.0, epsilon = 1e-9);
    }
}

//! Piecewise-linear trend with automatically placed changepoints.
//!
//! All quantities live in scaled time, `t ∈ [0, 1]` across the training span.

/// Choose changepoint locations among the training times.
///
/// The count is `min(max_changepoints, ceil(sqrt(n)), floor(range * (n - 1)))`,
/// so it grows sub-linearly with the series length. Locations are evenly
/// spaced training indices inside the first `range` fraction of history;
/// index 0 is never used.
pub fn select_changepoints(t: &[f64], max_changepoints: usize, range: f64) -> Vec<f64> {
    let n = t.len();
    if n < 3 || max_changepoints == 0 {
        return Vec::new();
    }

    let hist_size = (range * (n - 1) as f64).floor() as usize;
    let sqrt_cap = (n as f64).sqrt().ceil() as usize;
    let count = max_changepoints.min(sqrt_cap).min(hist_size);
    if count == 0 {
        return Vec::new();
    }

    let step = hist_size as f64 / count as f64;
    (1..=count)
        .map(|i| {
            let idx = ((i as f64 * step).round() as usize).clamp(1, hist_size);
            t[idx]
        })
        .collect()
}

/// Hinge regressors `(t - s)₊`, one column per changepoint `s`.
pub fn hinge_columns(t: &[f64], changepoints: &[f64]) -> Vec<Vec<f64>> {
    changepoints
        .iter()
        .map(|&s| t.iter().map(|&ti| (ti - s).max(0.0)).collect())
        .collect()
}

/// `g(t) = offset + slope·t + Σ δⱼ (t − sⱼ)₊`
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinearTrend {
    offset: f64,
    slope: f64,
    changepoints: Vec<f64>,
    deltas: Vec<f64>,
}

impl PiecewiseLinearTrend {
    pub fn new(offset: f64, slope: f64, changepoints: Vec<f64>, deltas: Vec<f64>) -> Self {
        debug_assert_eq!(changepoints.len(), deltas.len());
        Self {
            offset,
            slope,
            changepoints,
            deltas,
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let bends: f64 = self
            .changepoints
            .iter()
            .zip(&self.deltas)
            .map(|(&s, &d)| d * (t - s).max(0.0))
            .sum();
        self.offset + self.slope * t + bends
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Slope before the first changepoint.
    pub fn base_slope(&self) -> f64 {
        self.slope
    }

    /// Slope after the last changepoint.
    pub fn final_slope(&self) -> f64 {
        self.slope + self.deltas.iter().sum::<f64>()
    }

    pub fn changepoints(&self) -> &[f64] {
        &self.changepoints
    }

    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Mean absolute slope change, the empirical scale of future changepoints.
    pub fn mean_abs_delta(&self) -> f64 {
        if self.deltas.is_empty() {
            return 0.0;
        }
        self.deltas.iter().map(|d| d.abs()).sum::<f64>() / self.deltas.len() as f64
    }
}

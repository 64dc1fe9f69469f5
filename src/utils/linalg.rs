//! Penalized least squares over column-major design matrices.
//!
//! The decomposable model builds its regressors one column at a time
//! (trend, changepoint hinges, Fourier terms), so the design matrix is
//! stored as a slice of columns rather than rows.

use crate::error::{ForecastError, Result};

/// Diagonal jitter added to every normal-equation pivot.
const JITTER: f64 = 1e-8;

/// Fit `y ≈ X β` minimizing `|y - Xβ|² + Σ penalty_j β_j²`.
///
/// `columns[j]` is the j-th regressor; every column must have `y.len()`
/// entries and `penalties` must have one entry per column.
pub fn ridge_fit(columns: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    let p = columns.len();

    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if penalties.len() != p {
        return Err(ForecastError::DimensionMismatch {
            expected: p,
            got: penalties.len(),
        });
    }
    if let Some(col) = columns.iter().find(|c| c.len() != n) {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: col.len(),
        });
    }

    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];

    for i in 0..p {
        xty[i] = dot(&columns[i], y);
        for j in 0..=i {
            let v = dot(&columns[i], &columns[j]);
            xtx[i][j] = v;
            xtx[j][i] = v;
        }
        xtx[i][i] += penalties[i].max(0.0) + JITTER;
    }

    solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::ComputationError(
            "least squares failed: normal equations not positive definite".into(),
        )
    })
}

/// Evaluate `X β` for a column-major design.
pub fn apply_columns(columns: &[Vec<f64>], beta: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    for (col, &b) in columns.iter().zip(beta) {
        for (o, &x) in out.iter_mut().zip(col) {
            *o += b * x;
        }
    }
    out
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L @ z = b
    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * z[j];
        }
        z[i] = sum / l[i][i];
    }

    // L' @ x = z
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

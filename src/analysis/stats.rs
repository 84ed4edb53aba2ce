//! Descriptive statistics shared by the layer analyses.
//!
//! Mean and population standard deviation come from statrs; the helpers here
//! only add the empty-input and degenerate-input guards the analyses rely on.

use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Population standard deviation (divisor N), `None` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().population_std_dev())
    }
}

/// `max - min`, `None` for an empty slice.
pub fn value_range(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Some(hi - lo)
}

/// Ordinary least-squares line over `(index, value)` pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Value of the line at index `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Root mean squared residual of the fit against `values`.
    pub fn rmse(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let sse: f64 = values
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                let r = y - self.at(i as f64);
                r * r
            })
            .sum();
        (sse / values.len() as f64).sqrt()
    }
}

/// Fit `value ≈ slope * index + intercept` with index `0..n-1`.
///
/// Returns `None` for fewer than two points, where the slope is undefined.
pub fn linear_fit(values: &[f64]) -> Option<LinearFit> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    // Strictly positive for n >= 2 since the indices are distinct
    let denominator = nf * sum_x2 - sum_x * sum_x;
    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;

    Some(LinearFit { slope, intercept })
}

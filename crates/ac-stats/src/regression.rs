//! Ordinary least-squares line fit.

use serde::{Deserialize, Serialize};

use ac_core::is_constant;

use crate::series::valid_pairs;

/// Fitted line `y = slope * x + intercept` with its coefficient of determination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Number of valid pairs the fit used.
    pub n: usize,
}

impl LinearFit {
    fn degenerate(n: usize) -> Self {
        Self {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            n,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares fit of `y` on `x` over positional pairs with both samples present.
///
/// A constant (or empty) `x` yields slope, intercept and R² of `0`. A constant
/// `y` with varying `x` yields R² of `0`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> LinearFit {
    let (xs, ys) = valid_pairs(x, y);
    let n = xs.len();
    if n == 0 || is_constant(&xs) {
        return LinearFit::degenerate(n);
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    if is_constant(&ys) {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
            n,
        };
    }

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (a, b) in xs.iter().zip(&ys) {
        sxy += (a - mean_x) * (b - mean_y);
        sxx += (a - mean_x) * (a - mean_x);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (a, b) in xs.iter().zip(&ys) {
        let residual = b - (slope * a + intercept);
        ss_res += residual * residual;
        ss_tot += (b - mean_y) * (b - mean_y);
    }
    let r_squared = 1.0 - ss_res / ss_tot;

    LinearFit {
        slope,
        intercept,
        r_squared,
        n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line() {
        let fit = linear_fit(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]);
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.n, 4);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn constant_x_is_degenerate() {
        let fit = linear_fit(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!((fit.slope, fit.intercept, fit.r_squared), (0.0, 0.0, 0.0));
        assert_eq!(fit.n, 3);
    }

    #[test]
    fn fractional_constant_x_is_degenerate() {
        let fit = linear_fit(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]);
        assert_eq!((fit.slope, fit.intercept, fit.r_squared), (0.0, 0.0, 0.0));
    }

    #[test]
    fn fractional_constant_y_is_flat() {
        let fit = linear_fit(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1]);
        assert_eq!(fit.slope, 0.0);
        assert!((fit.intercept - 0.1).abs() < 1e-15);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn constant_y_has_zero_r_squared() {
        let fit = linear_fit(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 4.0);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn noisy_fit_r_squared_between_zero_and_one() {
        let fit = linear_fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 5.0]);
        // r = 0.8 for this data, so R² = 0.64
        assert!((fit.r_squared - 0.64).abs() < 1e-12);
        assert!((fit.slope - 0.8).abs() < 1e-12);
    }
}

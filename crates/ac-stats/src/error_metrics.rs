//! Error metrics of a candidate series against a reference series.

use serde::{Deserialize, Serialize};

use crate::series::valid_pairs;

/// Pointwise error statistics over valid pairs.
///
/// Differences are `candidate - reference`, so a positive `mbe` means the
/// candidate runs high. All metrics are `NaN` when `n == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    pub n: usize,
    #[serde(with = "crate::nan_as_null")]
    pub rmse: f64,
    #[serde(with = "crate::nan_as_null")]
    pub mbe: f64,
    #[serde(with = "crate::nan_as_null")]
    pub mae: f64,
    #[serde(with = "crate::nan_as_null")]
    pub max_abs_error: f64,
}

pub fn error_metrics(candidate: &[f64], reference: &[f64]) -> ErrorMetrics {
    let (c, r) = valid_pairs(candidate, reference);
    let n = c.len();
    if n == 0 {
        return ErrorMetrics {
            n,
            rmse: f64::NAN,
            mbe: f64::NAN,
            mae: f64::NAN,
            max_abs_error: f64::NAN,
        };
    }

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut sum_abs = 0.0;
    let mut max_abs: f64 = 0.0;
    for (a, b) in c.iter().zip(&r) {
        let d = a - b;
        sum += d;
        sum_sq += d * d;
        sum_abs += d.abs();
        max_abs = max_abs.max(d.abs());
    }
    let nf = n as f64;

    ErrorMetrics {
        n,
        rmse: (sum_sq / nf).sqrt(),
        mbe: sum / nf,
        mae: sum_abs / nf,
        max_abs_error: max_abs,
    }
}

/// Root-mean-square error, `NaN` without valid pairs.
pub fn rmse(candidate: &[f64], reference: &[f64]) -> f64 {
    error_metrics(candidate, reference).rmse
}

/// Mean bias error, `NaN` without valid pairs.
pub fn mbe(candidate: &[f64], reference: &[f64]) -> f64 {
    error_metrics(candidate, reference).mbe
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rmse_known_value() {
        // differences 0, 1, 0, -2, 0 -> mean square 1
        let v = rmse(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 3.0, 3.0, 2.0, 5.0]);
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mbe_sign_convention() {
        assert_eq!(mbe(&[2.0, 3.0], &[1.0, 1.0]), 1.5);
        assert_eq!(mbe(&[1.0, 1.0], &[2.0, 3.0]), -1.5);
    }

    #[test]
    fn empty_is_undefined() {
        let m = error_metrics(&[], &[]);
        assert_eq!(m.n, 0);
        assert!(m.rmse.is_nan());
        assert!(m.mbe.is_nan());
        assert!(m.mae.is_nan());
    }

    #[test]
    fn mae_and_max() {
        let m = error_metrics(&[1.0, 5.0, f64::NAN], &[2.0, 2.0, 0.0]);
        assert_eq!(m.n, 2);
        assert_eq!(m.mae, 2.0);
        assert_eq!(m.max_abs_error, 3.0);
    }
}

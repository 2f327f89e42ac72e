//! Taylor-diagram statistics of candidates relative to a reference.

use ac_core::is_missing;
use serde::{Deserialize, Serialize};

use crate::correlation::pearson;
use crate::series::valid_pairs;
use crate::summary::std_dev;

/// One point of a Taylor diagram.
///
/// Standard deviations are taken over the shared valid pairs so that
/// `centered_rmse² = σ_ref² + σ² - 2·σ_ref·σ·r` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaylorPoint {
    /// σ / σ_ref; undefined when σ_ref is 0.
    #[serde(with = "crate::nan_as_null")]
    pub normalized_std: f64,
    pub correlation: f64,
    #[serde(with = "crate::nan_as_null")]
    pub centered_rmse: f64,
    #[serde(with = "crate::nan_as_null")]
    pub normalized_centered_rmse: f64,
    #[serde(with = "crate::nan_as_null")]
    pub std_dev: f64,
    #[serde(with = "crate::nan_as_null")]
    pub reference_std_dev: f64,
    pub n: usize,
}

pub fn taylor_point(candidate: &[f64], reference: &[f64]) -> TaylorPoint {
    let (c, r) = valid_pairs(candidate, reference);
    let sigma = std_dev(&c);
    let sigma_ref = std_dev(&r);
    let correlation = pearson(&c, &r);

    let centered_rmse =
        (sigma_ref * sigma_ref + sigma * sigma - 2.0 * sigma_ref * sigma * correlation)
            .max(0.0)
            .sqrt();

    let (normalized_std, normalized_centered_rmse) = if sigma_ref > 0.0 {
        (sigma / sigma_ref, centered_rmse / sigma_ref)
    } else {
        (f64::NAN, f64::NAN)
    };

    TaylorPoint {
        normalized_std,
        correlation,
        centered_rmse,
        normalized_centered_rmse,
        std_dev: sigma,
        reference_std_dev: sigma_ref,
        n: c.len(),
    }
}

/// The reference plotted against itself: (1, 1, 0).
pub fn reference_point(reference: &[f64]) -> TaylorPoint {
    let sigma = std_dev(reference);
    TaylorPoint {
        normalized_std: 1.0,
        correlation: 1.0,
        centered_rmse: 0.0,
        normalized_centered_rmse: 0.0,
        std_dev: sigma,
        reference_std_dev: sigma,
        n: reference.iter().filter(|v| !is_missing(**v)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct_centered_rmse(c: &[f64], r: &[f64]) -> f64 {
        let n = c.len() as f64;
        let mc = c.iter().sum::<f64>() / n;
        let mr = r.iter().sum::<f64>() / n;
        let ss: f64 = c
            .iter()
            .zip(r)
            .map(|(a, b)| ((a - mc) - (b - mr)).powi(2))
            .sum();
        (ss / n).sqrt()
    }

    #[test]
    fn identity_matches_direct_computation() {
        let r = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let c = [1.5, 2.5, 2.0, 6.0, 3.0, 7.5];
        let p = taylor_point(&c, &r);
        assert!((p.centered_rmse - direct_centered_rmse(&c, &r)).abs() < 1e-12);
        assert_eq!(p.n, 6);
    }

    #[test]
    fn offset_copy_sits_on_reference() {
        let r = [1.0, 2.0, 4.0, 8.0];
        let c: Vec<f64> = r.iter().map(|v| v + 10.0).collect();
        let p = taylor_point(&c, &r);
        assert!((p.normalized_std - 1.0).abs() < 1e-12);
        assert!((p.correlation - 1.0).abs() < 1e-12);
        assert!(p.centered_rmse < 1e-6);
    }

    #[test]
    fn scaled_copy_has_ratio_sigma() {
        let r = [1.0, 2.0, 3.0, 4.0];
        let c: Vec<f64> = r.iter().map(|v| v * 2.0).collect();
        let p = taylor_point(&c, &r);
        assert!((p.normalized_std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn flat_reference_leaves_normalized_undefined() {
        let p = taylor_point(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]);
        assert!(p.normalized_std.is_nan());
        assert_eq!(p.correlation, 0.0);
        assert!(p.centered_rmse.is_finite());
    }

    #[test]
    fn fractional_constant_reference_leaves_normalized_undefined() {
        let p = taylor_point(&[0.2, 0.3, 0.4], &[0.1, 0.1, 0.1]);
        assert_eq!(p.reference_std_dev, 0.0);
        assert!(p.normalized_std.is_nan());
        assert!(p.normalized_centered_rmse.is_nan());
        assert_eq!(p.correlation, 0.0);
    }

    #[test]
    fn fractional_constant_candidate_has_zero_sigma() {
        let p = taylor_point(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]);
        assert_eq!(p.normalized_std, 0.0);
        assert_eq!(p.correlation, 0.0);
        assert!((p.centered_rmse - p.reference_std_dev).abs() < 1e-12);
    }

    #[test]
    fn reference_point_is_unit() {
        let p = reference_point(&[1.0, 2.0, f64::NAN]);
        assert_eq!((p.normalized_std, p.correlation, p.centered_rmse), (1.0, 1.0, 0.0));
        assert_eq!(p.n, 2);
    }
}

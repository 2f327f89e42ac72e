//! Reproducibility check of a test run against a reference run.
//!
//! Used to confirm that the same simulation gives matching output across
//! architectures or builds. Each metric is compared relative to the reference
//! mean.

use serde::{Deserialize, Serialize};

use crate::correlation::pearson;
use crate::series::valid_pairs;
use crate::{StatsError, StatsResult};

/// Below this magnitude a reference sample is too small to divide by.
const REL_DIFF_FLOOR: f64 = 1e-10;

/// Relative pass thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementThresholds {
    /// |mean_ref - mean_test| / |mean_ref|
    pub mean: f64,
    /// rmse / |mean_ref|
    pub rmse: f64,
    /// max_abs_diff / |mean_ref|
    pub max_abs_diff: f64,
}

impl Default for AgreementThresholds {
    fn default() -> Self {
        Self {
            mean: 1e-5,
            rmse: 1e-4,
            max_abs_diff: 1e-3,
        }
    }
}

impl AgreementThresholds {
    pub fn validate(&self) -> StatsResult<()> {
        for (value, what) in [
            (self.mean, "agreement mean threshold must be positive"),
            (self.rmse, "agreement rmse threshold must be positive"),
            (self.max_abs_diff, "agreement max_abs_diff threshold must be positive"),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(StatsError::InvalidThreshold { what });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementReport {
    pub n: usize,
    pub mean_ref: f64,
    pub mean_test: f64,
    pub mean_abs_diff: f64,
    pub max_abs_diff: f64,
    pub rmse: f64,
    pub mean_rel_diff: f64,
    pub max_rel_diff: f64,
    pub correlation: f64,
    pub passes: bool,
}

/// Compare `test` to `reference` over valid positional pairs.
///
/// Returns `None` when no valid pair exists.
pub fn check_agreement(
    test: &[f64],
    reference: &[f64],
    thresholds: &AgreementThresholds,
) -> Option<AgreementReport> {
    let (t, r) = valid_pairs(test, reference);
    let n = t.len();
    if n == 0 {
        return None;
    }
    let nf = n as f64;

    let mean_ref = r.iter().sum::<f64>() / nf;
    let mean_test = t.iter().sum::<f64>() / nf;

    let mut sum_abs = 0.0;
    let mut max_abs: f64 = 0.0;
    let mut sum_sq = 0.0;
    let mut sum_rel = 0.0;
    let mut max_rel: f64 = 0.0;
    for (a, b) in t.iter().zip(&r) {
        let abs_diff = (a - b).abs();
        sum_abs += abs_diff;
        max_abs = max_abs.max(abs_diff);
        sum_sq += abs_diff * abs_diff;
        let rel = if b.abs() > REL_DIFF_FLOOR {
            abs_diff / b.abs()
        } else {
            0.0
        };
        sum_rel += rel;
        max_rel = max_rel.max(rel);
    }
    let rmse = (sum_sq / nf).sqrt();

    let passes = if mean_ref != 0.0 {
        let scale = mean_ref.abs();
        (mean_ref - mean_test).abs() / scale < thresholds.mean
            && rmse / scale < thresholds.rmse
            && max_abs / scale < thresholds.max_abs_diff
    } else {
        mean_test.abs() < REL_DIFF_FLOOR
    };

    Some(AgreementReport {
        n,
        mean_ref,
        mean_test,
        mean_abs_diff: sum_abs / nf,
        max_abs_diff: max_abs,
        rmse,
        mean_rel_diff: sum_rel / nf,
        max_rel_diff: max_rel,
        correlation: pearson(&t, &r),
        passes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_runs_pass() {
        let r = [40.0, 42.0, 38.5, 45.0];
        let report = check_agreement(&r, &r, &AgreementThresholds::default()).unwrap();
        assert!(report.passes);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.max_rel_diff, 0.0);
    }

    #[test]
    fn tiny_perturbation_passes() {
        let r = [40.0, 42.0, 38.5, 45.0];
        let t: Vec<f64> = r.iter().map(|v| v * (1.0 + 1e-8)).collect();
        let report = check_agreement(&t, &r, &AgreementThresholds::default()).unwrap();
        assert!(report.passes);
    }

    #[test]
    fn one_percent_bias_fails() {
        let r = [40.0, 42.0, 38.5, 45.0];
        let t: Vec<f64> = r.iter().map(|v| v * 1.01).collect();
        let report = check_agreement(&t, &r, &AgreementThresholds::default()).unwrap();
        assert!(!report.passes);
        assert!((report.mean_rel_diff - 0.01).abs() < 1e-9);
    }

    #[test]
    fn zero_reference_mean() {
        let r = [-1.0, 1.0];
        let ok = check_agreement(&[-1.0, 1.0], &r, &AgreementThresholds::default()).unwrap();
        assert!(ok.passes);
        let bad = check_agreement(&[0.0, 1.0], &r, &AgreementThresholds::default()).unwrap();
        assert!(!bad.passes);
    }

    #[test]
    fn tiny_reference_values_skip_relative() {
        let report =
            check_agreement(&[1.0, 2.0], &[0.0, 2.0], &AgreementThresholds::default()).unwrap();
        assert_eq!(report.max_rel_diff, 0.0);
        assert_eq!(report.max_abs_diff, 1.0);
    }

    #[test]
    fn no_pairs_is_none() {
        assert!(check_agreement(&[], &[], &AgreementThresholds::default()).is_none());
    }

    #[test]
    fn thresholds_must_be_positive() {
        let bad = AgreementThresholds {
            rmse: 0.0,
            ..AgreementThresholds::default()
        };
        assert!(bad.validate().is_err());
        assert!(AgreementThresholds::default().validate().is_ok());
    }
}

//! Comparison report model.
//!
//! Every per-simulation list follows the participant order of the request.
//! Undefined numbers are `NaN` in memory and `null` once serialized.

use ac_core::{SimulationId, is_missing};
use ac_stats::{
    AgreementReport, DifferenceResult, Histogram, StatisticalSummary, TaylorPoint, TrendResult,
    error_metrics, linear_fit, pearson_checked, valid_pairs,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub simulation_id: SimulationId,
    /// Unit after harmonization.
    pub unit: String,
    pub sample_count: usize,
    pub summary: StatisticalSummary,
    pub histogram: Histogram,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendResult>,
}

/// Correlation, error and regression of one simulation against the reference.
///
/// `correlation` is `0` when it cannot be computed (no valid pair or zero
/// variance); `correlation_defined` tells that case apart from a computed 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseMetrics {
    pub simulation_id: SimulationId,
    pub valid_pairs: usize,
    pub correlation: f64,
    pub correlation_defined: bool,
    #[serde(with = "ac_stats::nan_as_null")]
    pub rmse: f64,
    #[serde(with = "ac_stats::nan_as_null")]
    pub mbe: f64,
    #[serde(with = "ac_stats::nan_as_null")]
    pub mae: f64,
    #[serde(with = "ac_stats::nan_as_null")]
    pub max_abs_error: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl PairwiseMetrics {
    /// Metrics of `candidate` against `reference`, paired by position.
    ///
    /// The regression treats the reference as `x` and the candidate as `y`.
    pub fn compute(simulation_id: SimulationId, candidate: &[f64], reference: &[f64]) -> Self {
        let (c, r) = valid_pairs(candidate, reference);
        let checked = pearson_checked(&c, &r);
        let errors = error_metrics(&c, &r);
        let fit = linear_fit(&r, &c);

        Self {
            simulation_id,
            valid_pairs: c.len(),
            correlation: checked.unwrap_or(0.0),
            correlation_defined: checked.is_some(),
            rmse: errors.rmse,
            mbe: errors.mbe,
            mae: errors.mae,
            max_abs_error: errors.max_abs_error,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
        }
    }

    /// The reference against itself, by convention: correlation 1, no error,
    /// identity regression. Holds even for a constant or empty reference.
    pub fn reference(simulation_id: SimulationId, values: &[f64]) -> Self {
        Self {
            simulation_id,
            valid_pairs: values.iter().filter(|v| !is_missing(**v)).count(),
            correlation: 1.0,
            correlation_defined: true,
            rmse: 0.0,
            mbe: 0.0,
            mae: 0.0,
            max_abs_error: 0.0,
            slope: 1.0,
            intercept: 0.0,
            r_squared: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDifference {
    pub simulation_id: SimulationId,
    pub result: DifferenceResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTaylor {
    pub simulation_id: SimulationId,
    pub point: TaylorPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationAgreement {
    pub simulation_id: SimulationId,
    /// `None` when the two runs share no valid sample.
    pub report: Option<AgreementReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub variable: String,
    pub unit: String,
    pub reference: Option<SimulationId>,
    pub participants: Vec<SimulationId>,
    pub simulations: Vec<SimulationReport>,
    #[serde(default)]
    pub pairwise: Vec<PairwiseMetrics>,
    #[serde(default)]
    pub differences: Vec<SimulationDifference>,
    #[serde(default)]
    pub taylor: Vec<SimulationTaylor>,
    #[serde(default)]
    pub agreement: Vec<SimulationAgreement>,
}

impl ComparisonReport {
    pub fn simulation(&self, id: &SimulationId) -> Option<&SimulationReport> {
        self.simulations.iter().find(|s| &s.simulation_id == id)
    }

    pub fn pairwise_for(&self, id: &SimulationId) -> Option<&PairwiseMetrics> {
        self.pairwise.iter().find(|p| &p.simulation_id == id)
    }

    pub fn difference_for(&self, id: &SimulationId) -> Option<&DifferenceResult> {
        self.differences
            .iter()
            .find(|d| &d.simulation_id == id)
            .map(|d| &d.result)
    }

    pub fn taylor_for(&self, id: &SimulationId) -> Option<&TaylorPoint> {
        self.taylor
            .iter()
            .find(|t| &t.simulation_id == id)
            .map(|t| &t.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairwise_against_self() {
        let x = [1.0, 2.0, 4.0, 8.0];
        let m = PairwiseMetrics::compute("ref".into(), &x, &x);
        assert!(m.correlation_defined);
        assert!((m.correlation - 1.0).abs() < 1e-12);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mbe, 0.0);
        assert!((m.slope - 1.0).abs() < 1e-12);
        assert!(m.intercept.abs() < 1e-12);
    }

    #[test]
    fn reference_convention_holds_for_flat_and_missing_data() {
        let flat = PairwiseMetrics::reference("ref".into(), &[0.1, 0.1, f64::NAN]);
        assert_eq!(flat.valid_pairs, 2);
        assert_eq!((flat.correlation, flat.rmse, flat.mbe), (1.0, 0.0, 0.0));
        assert!(flat.correlation_defined);

        let empty = PairwiseMetrics::reference("ref".into(), &[f64::NAN]);
        assert_eq!(empty.valid_pairs, 0);
        assert_eq!(empty.rmse, 0.0);
    }

    #[test]
    fn constant_candidate_flags_correlation() {
        let m = PairwiseMetrics::compute("a".into(), &[2.0, 2.0, 2.0, 2.0], &[1.0, 3.0, 5.0, 7.0]);
        assert_eq!(m.correlation, 0.0);
        assert!(!m.correlation_defined);
        assert_eq!(m.valid_pairs, 4);
    }

    #[test]
    fn no_pairs_serializes_nulls() {
        let m = PairwiseMetrics::compute("a".into(), &[f64::NAN], &[1.0]);
        assert_eq!(m.valid_pairs, 0);
        let json = serde_json::to_value(&m).unwrap();
        assert!(json["rmse"].is_null());
        assert_eq!(json["correlation"], 0.0);
        assert_eq!(json["correlation_defined"], false);
    }
}

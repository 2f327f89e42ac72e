//! Pointwise differencing against a reference series.

use ac_core::is_missing;
use serde::{Deserialize, Serialize};

use crate::series::{Coordinate, Series, align};
use crate::summary::{StatisticalSummary, std_dev, summarize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceMode {
    /// `value - reference`
    #[default]
    Absolute,
    /// `(value - reference) / reference * 100`, undefined where the reference is 0.
    Percent,
    /// `(value - reference) / σ_ref`, undefined when σ_ref is 0.
    Standardized,
}

impl DifferenceMode {
    pub fn from_normalize(normalize: bool) -> Self {
        if normalize { Self::Percent } else { Self::Absolute }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferencePoint {
    pub coord: Coordinate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceResult {
    pub mode: DifferenceMode,
    pub points: Vec<DifferencePoint>,
    /// Summary of the defined points.
    pub summary: StatisticalSummary,
}

impl DifferenceResult {
    fn from_points(mode: DifferenceMode, points: Vec<DifferencePoint>) -> Self {
        let defined: Vec<f64> = points.iter().filter_map(|p| p.value).collect();
        Self {
            mode,
            summary: summarize(&defined),
            points,
        }
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}

/// Difference of `candidate` against `reference` at each candidate coordinate.
///
/// A point is undefined when either sample is missing, when the reference has
/// no sample at that coordinate, or when the selected normalization would
/// divide by zero.
pub fn difference(candidate: &Series, reference: &Series, mode: DifferenceMode) -> DifferenceResult {
    let sigma_ref = match mode {
        DifferenceMode::Standardized => std_dev(reference.values()),
        _ => f64::NAN,
    };

    let points = align(candidate, reference)
        .into_iter()
        .map(|pair| {
            let value = if is_missing(pair.a) || is_missing(pair.b) {
                None
            } else {
                let diff = pair.a - pair.b;
                match mode {
                    DifferenceMode::Absolute => Some(diff),
                    DifferenceMode::Percent if pair.b == 0.0 => None,
                    DifferenceMode::Percent => Some(diff / pair.b * 100.0),
                    DifferenceMode::Standardized if sigma_ref.is_nan() || sigma_ref == 0.0 => None,
                    DifferenceMode::Standardized => Some(diff / sigma_ref),
                }
            };
            DifferencePoint {
                coord: pair.coord,
                value,
            }
        })
        .collect();

    DifferenceResult::from_points(mode, points)
}

/// The reference against itself: zero at every valid sample.
pub fn reference_difference(reference: &Series, mode: DifferenceMode) -> DifferenceResult {
    let points = reference
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| DifferencePoint {
            coord: reference.coord_at(i),
            value: (!is_missing(*v)).then_some(0.0),
        })
        .collect();
    DifferenceResult::from_points(mode, points)
}

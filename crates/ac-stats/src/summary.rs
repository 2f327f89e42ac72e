//! Descriptive statistics of a single series.

use ac_core::{UNDEFINED, is_constant, is_missing};
use serde::{Deserialize, Serialize};

/// Count, location, spread, and percentiles of the valid samples.
///
/// All fields except `count` are `NaN` when `count == 0`; check
/// [`StatisticalSummary::is_available`] before trusting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub count: usize,
    #[serde(with = "crate::nan_as_null")]
    pub mean: f64,
    #[serde(with = "crate::nan_as_null")]
    pub median: f64,
    #[serde(with = "crate::nan_as_null")]
    pub std_dev: f64,
    #[serde(with = "crate::nan_as_null")]
    pub min: f64,
    #[serde(with = "crate::nan_as_null")]
    pub max: f64,
    #[serde(with = "crate::nan_as_null")]
    pub p25: f64,
    #[serde(with = "crate::nan_as_null")]
    pub p75: f64,
    #[serde(with = "crate::nan_as_null")]
    pub p95: f64,
}

impl StatisticalSummary {
    pub fn undefined() -> Self {
        Self {
            count: 0,
            mean: UNDEFINED,
            median: UNDEFINED,
            std_dev: UNDEFINED,
            min: UNDEFINED,
            max: UNDEFINED,
            p25: UNDEFINED,
            p75: UNDEFINED,
            p95: UNDEFINED,
        }
    }

    pub fn is_available(&self) -> bool {
        self.count > 0
    }
}

/// Summarize the non-missing samples of `values`.
pub fn summarize(values: &[f64]) -> StatisticalSummary {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !is_missing(*v)).collect();
    if sorted.is_empty() {
        return StatisticalSummary::undefined();
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let variance = if is_constant(&sorted) {
        0.0
    } else {
        sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64
    };

    StatisticalSummary {
        count,
        mean,
        median: median_sorted(&sorted),
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        p25: percentile_sorted(&sorted, 0.25),
        p75: percentile_sorted(&sorted, 0.75),
        p95: percentile_sorted(&sorted, 0.95),
    }
}

/// Mean of the valid samples, `NaN` if there are none.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !is_missing(**v))
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { UNDEFINED } else { sum / n as f64 }
}

/// Population variance (divide by N) of the valid samples.
///
/// Exactly `0` for a constant series.
pub fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    if m.is_nan() {
        return UNDEFINED;
    }
    if is_constant(values) {
        return 0.0;
    }
    let (ss, n) = values
        .iter()
        .filter(|v| !is_missing(**v))
        .fold((0.0, 0usize), |(s, n), v| (s + (v - m) * (v - m), n + 1));
    ss / n as f64
}

/// Population standard deviation of the valid samples.
pub fn std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Midpoint median of an ascending, non-empty slice.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Value at `floor(N * k)` of an ascending, non-empty slice. No interpolation.
pub fn percentile_sorted(sorted: &[f64], k: f64) -> f64 {
    let idx = (sorted.len() as f64 * k).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

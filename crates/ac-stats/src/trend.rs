//! Moving-average smoothing and linear trend of an ordered series.

use ac_core::is_missing;
use serde::{Deserialize, Serialize};

use crate::regression::{LinearFit, linear_fit};
use crate::summary::mean;
use crate::{StatsError, StatsResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Samples on each side of the center; the window is `2 * half_window + 1`.
    pub half_window: usize,
    /// A slope counts as a trend once `|slope| > threshold_fraction * |mean|`.
    pub threshold_fraction: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            half_window: 2,
            threshold_fraction: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    NoClearTrend,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::NoClearTrend => "no clear trend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Same length as the input; `None` where no full window is available.
    pub smoothed: Vec<Option<f64>>,
    /// Fit of value against sample index.
    pub fit: LinearFit,
    pub direction: TrendDirection,
    pub half_window: usize,
}

/// Centered moving average over full windows only.
///
/// The first and last `half_window` positions are `None`, as is any position
/// whose window holds a missing sample.
pub fn moving_average(values: &[f64], half_window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let width = 2 * half_window + 1;
    (0..n)
        .map(|i| {
            if i < half_window || i + half_window >= n {
                return None;
            }
            let window = &values[i - half_window..=i + half_window];
            if window.iter().any(|v| is_missing(*v)) {
                return None;
            }
            Some(window.iter().sum::<f64>() / width as f64)
        })
        .collect()
}

/// Smooth `values` and fit a linear trend against the sample index `0..N`.
pub fn trend(values: &[f64], config: TrendConfig) -> StatsResult<TrendResult> {
    if config.half_window == 0 {
        return Err(StatsError::InvalidWindow {
            half_window: config.half_window,
        });
    }
    if config.threshold_fraction.is_nan() || config.threshold_fraction < 0.0 {
        return Err(StatsError::InvalidThreshold {
            what: "trend threshold_fraction must be non-negative",
        });
    }

    let index: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let fit = linear_fit(&index, values);
    let direction = classify(fit.slope, mean(values), config.threshold_fraction);

    Ok(TrendResult {
        smoothed: moving_average(values, config.half_window),
        fit,
        direction,
        half_window: config.half_window,
    })
}

fn classify(slope: f64, mean: f64, threshold_fraction: f64) -> TrendDirection {
    if mean.is_nan() {
        return TrendDirection::NoClearTrend;
    }
    let threshold = threshold_fraction * mean.abs();
    if slope > 0.0 && slope.abs() > threshold {
        TrendDirection::Increasing
    } else if slope < 0.0 && slope.abs() > threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::NoClearTrend
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn smoothed_keeps_length_and_edges(
            values in prop::collection::vec(-1.0e3_f64..1.0e3_f64, 0..120),
            half_window in 1usize..6,
        ) {
            let smoothed = moving_average(&values, half_window);
            prop_assert_eq!(smoothed.len(), values.len());
            let undefined = smoothed.iter().filter(|v| v.is_none()).count();
            prop_assert_eq!(undefined, values.len().min(2 * half_window));
        }
    }
}

//! Equal-width histogram binning.

use ac_core::is_missing;
use serde::{Deserialize, Serialize};

use crate::{StatsError, StatsResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// `count` over the number of valid samples.
    pub frequency: f64,
}

/// Frequency distribution of the valid samples of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Number of valid samples binned.
    pub total: usize,
}

impl Histogram {
    pub fn bin_width(&self) -> Option<f64> {
        self.bins.first().map(|b| b.end - b.start)
    }
}

/// Partition `[min, max]` of the valid samples into `bins` equal-width bins.
///
/// Values equal to `max` go into the last bin. With no valid samples the bin
/// list is empty; with constant data every sample lands in the last bin and
/// all bins have zero width.
pub fn histogram(values: &[f64], bins: usize) -> StatsResult<Histogram> {
    if bins < 2 {
        return Err(StatsError::InvalidBinCount { bins });
    }

    let valid: Vec<f64> = values.iter().copied().filter(|v| !is_missing(*v)).collect();
    if valid.is_empty() {
        return Ok(Histogram {
            bins: Vec::new(),
            total: 0,
        });
    }

    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in &valid {
        let idx = if v >= max {
            bins - 1
        } else {
            (((v - min) / width).floor() as usize).min(bins - 1)
        };
        counts[idx] += 1;
    }

    let total = valid.len();
    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: if i == bins - 1 {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
            frequency: count as f64 / total as f64,
        })
        .collect();

    Ok(Histogram { bins, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_values_ten_bins() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let h = histogram(&values, 10).unwrap();

        assert_eq!(h.bins.len(), 10);
        assert_eq!(h.total, 100);
        for bin in &h.bins {
            assert_eq!(bin.count, 10);
            assert!((bin.frequency - 0.1).abs() < 1e-12);
        }
        assert_eq!(h.bins[9].end, 99.0);
    }

    #[test]
    fn rejects_fewer_than_two_bins() {
        assert_eq!(
            histogram(&[1.0, 2.0], 1).unwrap_err(),
            StatsError::InvalidBinCount { bins: 1 }
        );
    }

    #[test]
    fn empty_input_has_no_bins() {
        let h = histogram(&[f64::NAN], 5).unwrap();
        assert!(h.bins.is_empty());
        assert_eq!(h.total, 0);
        assert_eq!(h.bin_width(), None);
    }

    #[test]
    fn constant_data_lands_in_last_bin() {
        let h = histogram(&[3.0, 3.0, 3.0], 4).unwrap();
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.bins[3].count, 3);
        assert_eq!(h.bins[0].count, 0);
        assert_eq!(h.bin_width(), Some(0.0));
    }

    #[test]
    fn missing_values_not_counted() {
        let h = histogram(&[0.0, f64::NAN, 1.0, 2.0], 2).unwrap();
        assert_eq!(h.total, 3);
        assert_eq!(h.bins[0].count, 1);
        assert_eq!(h.bins[1].count, 2);
    }
}

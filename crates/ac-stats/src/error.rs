//! Error types for engine operations.
//!
//! Insufficient data is not an error; see the crate docs for the sentinel policy.

use thiserror::Error;

/// Result type for engine operations.
pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("Histogram needs at least 2 bins, got {bins}")]
    InvalidBinCount { bins: usize },

    #[error("Smoothing half-window must be at least 1, got {half_window}")]
    InvalidWindow { half_window: usize },

    #[error("Coordinate count {coords} does not match value count {values}")]
    CoordinateLengthMismatch { values: usize, coords: usize },

    #[error("Invalid threshold: {what}")]
    InvalidThreshold { what: &'static str },
}

//! Statistical comparison engine for chemistry-transport model output.
//!
//! Every routine here is a pure function over immutable numeric series. There
//! is no I/O and no shared state; resolving series from storage and
//! orchestrating multi-simulation comparisons lives in `ac-app`.
//!
//! # Components
//!
//! - [`summary`]: descriptive statistics of one series
//! - [`correlation`]: Pearson correlation between paired samples
//! - [`regression`]: least-squares line, R²
//! - [`error_metrics`]: RMSE, MBE and friends against a reference
//! - [`histogram`]: equal-width frequency distribution
//! - [`trend`]: centered moving average and linear trend
//! - [`difference`]: pointwise differencing against a reference series
//! - [`taylor`]: normalized σ, correlation and centered RMSE
//! - [`agreement`]: pass/fail reproducibility check against thresholds
//!
//! # Missing samples and degenerate inputs
//!
//! Non-finite samples are missing and are dropped pairwise, never imputed.
//! Statistics that cannot be computed because no valid sample remains are
//! reported as `NaN` (see [`ac_core::UNDEFINED`]); zero-variance denominators
//! in correlation and regression degrade to `0`.

pub mod agreement;
pub mod correlation;
pub mod difference;
pub mod error;
pub mod error_metrics;
pub mod histogram;
pub mod nan_as_null;
pub mod regression;
pub mod series;
pub mod summary;
pub mod taylor;
pub mod trend;

pub use agreement::{AgreementReport, AgreementThresholds, check_agreement};
pub use correlation::{pearson, pearson_checked};
pub use difference::{DifferenceMode, DifferencePoint, DifferenceResult, difference, reference_difference};
pub use error::{StatsError, StatsResult};
pub use error_metrics::{ErrorMetrics, error_metrics, mbe, rmse};
pub use histogram::{Histogram, HistogramBin, histogram};
pub use regression::{LinearFit, linear_fit};
pub use series::{Aligned, Coordinate, NamedSeries, Series, align, valid_pairs};
pub use summary::{StatisticalSummary, mean, std_dev, summarize};
pub use taylor::{TaylorPoint, reference_point, taylor_point};
pub use trend::{TrendConfig, TrendDirection, TrendResult, moving_average, trend};

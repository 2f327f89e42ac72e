//! ac-core: stable foundation for the atmospheric-chemistry comparison tools.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers + missing-sample predicate)
//! - ids (simulation identifiers)
//! - units (mixing-ratio units backed by uom)
//! - timing (labelled wall-clock timers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;

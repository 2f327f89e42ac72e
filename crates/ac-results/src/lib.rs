//! ac-results: simulation series storage and comparison report cache.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::{compute_report_id, content_digest};
pub use store::{ReportStore, SeriesStore, parse_csv};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Series not found: {simulation_id}/{variable}")]
    SeriesNotFound {
        simulation_id: String,
        variable: String,
    },

    #[error("Report not found: {report_id}")]
    ReportNotFound { report_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("CSV line {line}: {message}")]
    Csv { line: usize, message: String },
}

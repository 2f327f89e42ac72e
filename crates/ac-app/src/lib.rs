//! Shared application service layer for the comparison tools.
//!
//! This crate sits between the pure statistics engine (`ac-stats`) and the
//! frontends. It owns comparison requests, series resolution, the
//! comparison orchestrator, report caching, and tabular export.

pub mod compare_service;
pub mod error;
pub mod export;
pub mod progress;
pub mod project_service;
pub mod report;
pub mod request;
pub mod resolver;
pub mod run_service;

// Re-export key types for convenience
pub use ac_results::Selectors;
pub use compare_service::{compute_comparison, harmonize_units, run_comparison};
pub use error::{AppError, AppResult};
pub use export::{ExportTable, export_table};
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{
    ComparisonSummary, get_comparison, import_series_csv, list_comparisons, list_series,
    load_project, save_project, validate_project,
};
pub use report::{
    ComparisonReport, PairwiseMetrics, SimulationAgreement, SimulationDifference,
    SimulationReport, SimulationTaylor,
};
pub use request::{ComparisonOptions, ComparisonRequest};
pub use resolver::{InMemoryResolver, MemoResolver, ResolveError, SeriesResolver, StoreResolver};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunResponse, ensure_report,
    ensure_report_with_progress, list_reports, load_report,
};

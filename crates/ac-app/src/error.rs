//! Error types for the ac-app service layer.

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Comparison not found: {0}")]
    ComparisonNotFound(String),

    /// The request cannot be computed as stated; nothing was resolved or computed.
    #[error("Invalid comparison request: {0}")]
    InvalidRequest(String),

    /// The resolver could not produce a series.
    #[error("Failed to resolve '{variable}' for simulation '{simulation_id}': {message}")]
    Resolution {
        simulation_id: String,
        variable: String,
        message: String,
    },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ac-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<ac_project::ProjectError> for AppError {
    fn from(err: ac_project::ProjectError) -> Self {
        match err {
            ac_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<ac_results::ResultsError> for AppError {
    fn from(err: ac_results::ResultsError) -> Self {
        match err {
            ac_results::ResultsError::ReportNotFound { report_id } => {
                AppError::ReportNotFound(report_id)
            }
            other => AppError::Results(other.to_string()),
        }
    }
}

// Every engine error is a bad parameter.
impl From<ac_stats::StatsError> for AppError {
    fn from(err: ac_stats::StatsError) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

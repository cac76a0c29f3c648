//! Error types for og-survey.

use og_core::ScanError;
use thiserror::Error;

/// Failures fetching or reading survey data.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The survey provider could not serve a request.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, SurveyError>`.
pub type SurveyResult<T> = Result<T, SurveyError>;

/// Why an orchard could not be analysed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The orchard has no dated survey.
    #[error("no surveys found for orchard {orchard_id}")]
    NotFound { orchard_id: u64 },

    #[error("failed to retrieve survey data: {0}")]
    Upstream(#[from] SurveyError),

    #[error("error analysing orchard structure: {0}")]
    Analysis(#[from] ScanError),
}

impl AnalysisError {
    /// HTTP-style status code for a service boundary: 404, 502 or 500.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::NotFound { .. } => 404,
            AnalysisError::Upstream(_) => 502,
            AnalysisError::Analysis(_) => 500,
        }
    }
}

//! NLP-specific error types

use thiserror::Error;

/// NLP-specific error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NlpError {
    #[error("Unknown dashboard: {0}")]
    UnknownDashboard(String),

    #[error("Unknown dimension '{dimension}' for dashboard '{dashboard}'")]
    UnknownDimension { dashboard: String, dimension: String },
}

impl NlpError {
    pub fn unknown_dashboard(name: impl Into<String>) -> Self {
        Self::UnknownDashboard(name.into())
    }

    pub fn unknown_dimension(dashboard: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self::UnknownDimension {
            dashboard: dashboard.into(),
            dimension: dimension.into(),
        }
    }
}

/// Result type for NLP operations
pub type Result<T> = std::result::Result<T, NlpError>;

// Convert to dashbot_core AppError
impl From<NlpError> for dashbot_core::AppError {
    fn from(err: NlpError) -> Self {
        dashbot_core::AppError::not_found(err.to_string())
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the [`Explorer`](crate::Explorer) can report.
///
/// None of these abort the caller: the facade returns them and leaves its
/// dataset and figure collection exactly as they were before the call.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("no dataset loaded")]
    NoDataset,

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("table shape mismatch: {0}")]
    Shape(String),

    #[error("failed to load {origin}: {message}")]
    Load { origin: String, message: String },

    #[error("API request failed with status {0}")]
    HttpStatus(u16),

    #[error("invalid {option}: '{value}'")]
    InvalidOption { option: &'static str, value: String },

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("failed to save figure to {}: {message}", path.display())]
    Save { path: PathBuf, message: String },
}

impl ExploreError {
    pub(crate) fn invalid(option: &'static str, value: impl Into<String>) -> Self {
        ExploreError::InvalidOption {
            option,
            value: value.into(),
        }
    }
}

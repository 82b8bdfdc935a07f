use std::path::PathBuf;

use thiserror::Error;

use crate::model::Stage;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the fatal outcomes of a summary run.
///
/// Data-quality problems inside individual rows never show up here; they are
/// handled by dropping the row during cleaning.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Raised when the input path does not resolve to a readable file.
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Raised when the header row lacks one or more required columns.
    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// Raised for any other failure while loading or transforming the data.
    #[error("failed to process {} before reaching stage {stage}: {message}", .path.display())]
    Processing {
        stage: Stage,
        path: PathBuf,
        message: String,
    },

    /// Wrapper for IO failures such as writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the summary could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    pub(crate) fn processing(
        stage: Stage,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        ToolError::Processing {
            stage,
            path: path.into(),
            message: message.into(),
        }
    }
}

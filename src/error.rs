use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the store and repository layers.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// A submission failed validation. `field` is the camelCase input name.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("feedback store at {path} is unreadable: {reason}")]
    StoreUnreadable { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize feedback: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FeedbackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedbackError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FeedbackError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;

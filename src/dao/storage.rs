use std::{io, path::PathBuf};
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by the media store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File-system operation failed.
    #[error("failed to {action} `{}`", path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Uploaded file name has no usable final component.
    #[error("invalid file name `{0}`")]
    InvalidName(String),
}

impl StorageError {
    /// Wrap an I/O failure with the action and path that caused it.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

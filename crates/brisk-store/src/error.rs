//! Error types for brisk-store.

use std::path::PathBuf;

/// Result type for brisk-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in brisk-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Persisted schedule data does not parse as the expected JSON array.
    #[error("Corrupt schedule data: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Failed to create the directory holding the schedule file.
    #[error("Failed to create schedule directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Index outside the current collection.
    #[error("Index {index} out of range for schedule of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the persisted medium held malformed data, the one failure
    /// callers recover from by treating the store as empty.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::Corrupt(_))
    }
}

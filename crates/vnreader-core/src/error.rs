//! Store error types

use thiserror::Error;

/// Library store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Sentence index out of range
    #[error("Sentence index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Data directory could not be resolved
    #[error("Failed to access data directory: {0}")]
    DataDirectory(String),

    /// Backup document rejected
    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! # Dataset Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Dataset storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Dataset not found in storage: {0}")]
    NotFound(String),

    #[error("Dataset id cannot be used as a file name: {0}")]
    InvalidId(String),

    #[error("Checksum mismatch for dataset: {0}")]
    ChecksumMismatch(String),

    #[error("Corrupt dataset file {0}: {1}")]
    Corrupt(String, String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e.to_string())
    }
}

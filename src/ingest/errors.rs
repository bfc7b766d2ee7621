//! # Ingestion Errors

use thiserror::Error;

use crate::dataset::DatasetKind;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors raised while turning an archive into records
#[derive(Debug, Error)]
pub enum IngestError {
    /// Content is not a zip or tar archive, raw or base64
    #[error("Content is not a valid archive: {0}")]
    InvalidArchive(String),

    /// Archive has no entries under the kind's root folder
    #[error("Archive has no '{}/' folder", .0.root_folder())]
    MissingRootFolder(DatasetKind),

    /// Reading an archive entry failed
    #[error("Failed to read archive entry: {0}")]
    Io(#[from] std::io::Error),
}

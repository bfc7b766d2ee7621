//! Dataset ingestion
//!
//! Turns archive content into a typed [`RecordStore`]. Only files under the
//! kind's root folder are read; files that are not valid JSON are skipped
//! and incomplete records are dropped. An archive without the root folder
//! is an error; an archive that yields no records is not (the caller
//! decides).

mod archive;
mod courses;
mod errors;
mod rooms;

pub use archive::{read_archive, ArchiveFile};
pub use errors::{IngestError, IngestResult};

use serde_json::Value;
use tracing::debug;

use crate::dataset::{DatasetKind, RecordStore};

#[cfg(test)]
pub(crate) use archive::fixtures;

/// Parses archive content into records of the given kind
pub fn load_records(kind: DatasetKind, content: &[u8]) -> IngestResult<RecordStore> {
    let files = read_archive(content)?;
    let prefix = format!("{}/", kind.root_folder());
    if !files.iter().any(|f| f.path.starts_with(&prefix)) {
        return Err(IngestError::MissingRootFolder(kind));
    }

    let documents: Vec<Value> = files
        .iter()
        .filter(|f| f.path.starts_with(&prefix))
        .filter_map(|f| match serde_json::from_slice(&f.contents) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!(path = %f.path, error = %e, "skipping non-JSON file");
                None
            }
        })
        .collect();

    let store = match kind {
        DatasetKind::Courses => {
            RecordStore::Courses(documents.iter().flat_map(courses::parse_course_file).collect())
        }
        DatasetKind::Rooms => {
            RecordStore::Rooms(documents.iter().flat_map(rooms::parse_room_file).collect())
        }
    };

    debug!(kind = %kind, files = files.len(), records = store.len(), "archive ingested");
    Ok(store)
}

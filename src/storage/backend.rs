//! # Dataset Storage Trait

use super::errors::StorageResult;
use crate::dataset::Dataset;

/// Persistence collaborator of the facade.
///
/// Writes are whole-dataset; there is no partial update.
pub trait DatasetStorage: Send + Sync + std::fmt::Debug {
    /// Ids of every persisted dataset, sorted
    fn list_ids(&self) -> StorageResult<Vec<String>>;

    /// Reads one dataset back
    fn read_all(&self, id: &str) -> StorageResult<Dataset>;

    /// Persists a dataset, replacing any previous copy
    fn write_all(&mut self, dataset: &Dataset) -> StorageResult<()>;

    /// Deletes a persisted dataset
    fn remove(&mut self, id: &str) -> StorageResult<()>;
}

//! # In-Memory Dataset Storage

use std::collections::BTreeMap;

use super::backend::DatasetStorage;
use super::errors::{StorageError, StorageResult};
use crate::dataset::Dataset;

/// Dataset storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    datasets: BTreeMap<String, Dataset>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetStorage for MemoryStorage {
    fn list_ids(&self) -> StorageResult<Vec<String>> {
        Ok(self.datasets.keys().cloned().collect())
    }

    fn read_all(&self, id: &str) -> StorageResult<Dataset> {
        self.datasets
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn write_all(&mut self, dataset: &Dataset) -> StorageResult<()> {
        self.datasets.insert(dataset.id().to_string(), dataset.clone());
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StorageResult<()> {
        self.datasets
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

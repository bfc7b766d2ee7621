//! The insight facade
//!
//! Owns the dataset registry and runs every public operation to
//! completion. Any rejected call leaves the registry and storage unchanged.

use serde_json::Value;
use tracing::{info, warn};

use super::errors::{InsightError, InsightResult};
use crate::dataset::{Dataset, DatasetInfo, DatasetKind};
use crate::executor::{QueryExecutor, MAX_RESULT_ROWS};
use crate::ingest::load_records;
use crate::planner::{DatasetCatalog, QueryValidator};
use crate::storage::{DatasetStorage, MemoryStorage, StorageError};

/// Entry point for dataset management and queries
#[derive(Debug)]
pub struct InsightFacade {
    /// Registered datasets in insertion order
    datasets: Vec<Dataset>,
    storage: Box<dyn DatasetStorage>,
    max_rows: usize,
}

impl DatasetCatalog for InsightFacade {
    fn dataset_kind(&self, id: &str) -> Option<DatasetKind> {
        self.find(id).map(Dataset::kind)
    }
}

impl InsightFacade {
    /// Opens a facade over `storage`, registering every dataset it holds
    pub fn open(storage: Box<dyn DatasetStorage>) -> InsightResult<Self> {
        let mut datasets = Vec::new();
        for id in storage.list_ids()? {
            let dataset = storage.read_all(&id)?;
            info!(id = %id, kind = %dataset.kind(), rows = dataset.num_rows(), "dataset loaded");
            datasets.push(dataset);
        }

        Ok(Self {
            datasets,
            storage,
            max_rows: MAX_RESULT_ROWS,
        })
    }

    /// Creates an empty facade backed by process memory
    pub fn in_memory() -> Self {
        Self {
            datasets: Vec::new(),
            storage: Box::new(MemoryStorage::new()),
            max_rows: MAX_RESULT_ROWS,
        }
    }

    /// Overrides the query row limit
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Ingests and registers a dataset; returns every registered id
    pub fn add_dataset(
        &mut self,
        id: &str,
        content: &[u8],
        kind: DatasetKind,
    ) -> InsightResult<Vec<String>> {
        validate_id(id)?;
        if self.find(id).is_some() {
            return Err(InsightError::malformed(format!(
                "Dataset '{}' has already been added",
                id
            )));
        }

        let store = load_records(kind, content)?;
        if store.is_empty() {
            return Err(InsightError::malformed(format!(
                "Dataset '{}' has no valid {} records",
                id, kind
            )));
        }

        let dataset = Dataset::new(id, store);
        self.storage.write_all(&dataset)?;
        info!(id = %id, kind = %kind, rows = dataset.num_rows(), "dataset added");
        self.datasets.push(dataset);

        Ok(self.datasets.iter().map(|d| d.id().to_string()).collect())
    }

    /// Unregisters a dataset and deletes its persisted copy
    pub fn remove_dataset(&mut self, id: &str) -> InsightResult<String> {
        validate_id(id)?;
        let position = self
            .datasets
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| InsightError::NotFound(id.to_string()))?;

        match self.storage.remove(id) {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                warn!(id = %id, "dataset had no persisted copy");
            }
            Err(e) => return Err(e.into()),
        }
        self.datasets.remove(position);
        info!(id = %id, "dataset removed");

        Ok(id.to_string())
    }

    /// Snapshot of the registry
    pub fn list_datasets(&self) -> Vec<DatasetInfo> {
        self.datasets.iter().map(Dataset::info).collect()
    }

    /// Validates and runs a query
    pub fn perform_query(&self, query: &Value) -> InsightResult<Vec<Value>> {
        let parsed = QueryValidator::new(self).validate(query).map_err(|e| {
            info!(error = %e, "query rejected");
            InsightError::from(e)
        })?;

        let dataset = self.find(&parsed.dataset_id).ok_or_else(|| {
            InsightError::malformed(format!("Dataset '{}' not found", parsed.dataset_id))
        })?;

        let result = QueryExecutor::new(dataset.store())
            .with_max_rows(self.max_rows)
            .execute(&parsed)
            .map_err(|e| {
                info!(dataset = %parsed.dataset_id, error = %e, "query rejected");
                InsightError::from(e)
            })?;

        info!(
            dataset = %parsed.dataset_id,
            matched = result.matched_count,
            rows = result.len(),
            "query complete"
        );
        Ok(result.into_values())
    }

    fn find(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id() == id)
    }
}

/// Rejects empty, whitespace-only and underscored ids
fn validate_id(id: &str) -> InsightResult<()> {
    if id.trim().is_empty() {
        return Err(InsightError::malformed("Dataset id must not be blank"));
    }
    if id.contains('_') {
        return Err(InsightError::malformed(format!(
            "Dataset id '{}' must not contain an underscore",
            id
        )));
    }
    Ok(())
}

//! Record stores and datasets

use serde::{Deserialize, Serialize};

use super::kind::DatasetKind;
use super::record::{Course, Room};

/// Records of one dataset, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum RecordStore {
    Courses(Vec<Course>),
    Rooms(Vec<Room>),
}

impl RecordStore {
    /// Returns the kind of the stored records
    pub fn kind(&self) -> DatasetKind {
        match self {
            RecordStore::Courses(_) => DatasetKind::Courses,
            RecordStore::Rooms(_) => DatasetKind::Rooms,
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        match self {
            RecordStore::Courses(records) => records.len(),
            RecordStore::Rooms(records) => records.len(),
        }
    }

    /// Returns true if no records are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named dataset owning its record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    id: String,
    store: RecordStore,
}

impl Dataset {
    /// Creates a dataset from an already validated store
    pub fn new(id: impl Into<String>, store: RecordStore) -> Self {
        Self {
            id: id.into(),
            store,
        }
    }

    /// Dataset id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dataset kind
    pub fn kind(&self) -> DatasetKind {
        self.store.kind()
    }

    /// Row count; always equals the number of stored records
    pub fn num_rows(&self) -> usize {
        self.store.len()
    }

    /// Read-only access to the records
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Registry snapshot of this dataset
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            kind: self.kind(),
            num_rows: self.num_rows(),
        }
    }
}

/// Registry entry as reported by `list_datasets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: String,
    pub kind: DatasetKind,
    #[serde(rename = "numRows")]
    pub num_rows: usize,
}

//! # Local Filesystem Dataset Storage
//!
//! One file per dataset: `<data_dir>/<hex(id)>.json` holding
//! `{"checksum": <crc32>, "dataset": {...}}`. Ids are hex-encoded so any
//! id maps to a plain file name. The checksum covers the
//! serialized dataset. Writes go to a temp file that is synced and then
//! renamed over the target.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::DatasetStorage;
use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StorageError, StorageResult};
use crate::dataset::Dataset;

const EXTENSION: &str = "json";

#[derive(Serialize)]
struct StoredDatasetRef<'a> {
    checksum: u32,
    dataset: &'a Dataset,
}

#[derive(Deserialize)]
struct StoredDataset {
    checksum: u32,
    dataset: Dataset,
}

/// Local filesystem dataset storage
#[derive(Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Opens storage rooted at `root`, creating the directory if missing
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> StorageResult<PathBuf> {
        if id.is_empty() {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", hex::encode(id), EXTENSION)))
    }
}

impl DatasetStorage for LocalStorage {
    fn list_ids(&self) -> StorageResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|stem| hex::decode(stem).ok())
                .and_then(|bytes| String::from_utf8(bytes).ok());
            match id {
                Some(id) if !id.is_empty() => ids.push(id),
                _ => debug!(path = %path.display(), "skipping foreign file"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn read_all(&self, id: &str) -> StorageResult<Dataset> {
        let path = self.path_for(id)?;
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(id.to_string())
            } else {
                StorageError::from(e)
            }
        })?;

        let stored: StoredDataset = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupt(path.display().to_string(), e.to_string()))?;
        let payload = serde_json::to_vec(&stored.dataset)
            .map_err(|e| StorageError::Corrupt(path.display().to_string(), e.to_string()))?;
        if !verify_checksum(&payload, stored.checksum) {
            return Err(StorageError::ChecksumMismatch(id.to_string()));
        }
        if stored.dataset.id() != id {
            return Err(StorageError::Corrupt(
                path.display().to_string(),
                format!("file holds dataset '{}'", stored.dataset.id()),
            ));
        }
        Ok(stored.dataset)
    }

    fn write_all(&mut self, dataset: &Dataset) -> StorageResult<()> {
        let path = self.path_for(dataset.id())?;
        let payload = serde_json::to_vec(dataset)
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        let stored = StoredDatasetRef {
            checksum: compute_checksum(&payload),
            dataset,
        };
        let bytes =
            serde_json::to_vec(&stored).map_err(|e| StorageError::IoError(e.to_string()))?;

        let tmp_path = path.with_extension("json.tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path)?;

        debug!(id = dataset.id(), bytes = bytes.len(), "dataset persisted");
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StorageResult<()> {
        let path = self.path_for(id)?;
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(id.to_string())
            } else {
                StorageError::from(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{course, room};
    use crate::dataset::RecordStore;
    use tempfile::TempDir;

    fn dataset(id: &str) -> Dataset {
        Dataset::new(
            id,
            RecordStore::Courses(vec![
                course("cpsc", "310", 85.25, 2015.0),
                course("math", "100", 70.0, 2016.0),
            ]),
        )
    }

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let mut storage = LocalStorage::open(temp.path()).unwrap();

        let ds = dataset("ubc");
        storage.write_all(&ds).unwrap();
        assert!(temp.path().join("756263.json").exists());
        assert_eq!(storage.read_all("ubc").unwrap(), ds);
    }

    #[test]
    fn test_list_and_remove() {
        let temp = TempDir::new().unwrap();
        let mut storage = LocalStorage::open(temp.path().join("nested")).unwrap();

        storage.write_all(&dataset("b")).unwrap();
        storage
            .write_all(&Dataset::new("a", RecordStore::Rooms(vec![room("DMP", "110", 40.0)])))
            .unwrap();
        fs::write(storage.root().join("notes.txt"), b"ignored").unwrap();
        fs::write(storage.root().join("notes.json"), b"ignored").unwrap();
        assert_eq!(storage.list_ids().unwrap(), vec!["a", "b"]);

        storage.remove("b").unwrap();
        assert_eq!(storage.list_ids().unwrap(), vec!["a"]);
        assert!(matches!(storage.remove("b"), Err(StorageError::NotFound(_))));
        assert!(matches!(storage.read_all("b"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        let temp = TempDir::new().unwrap();
        let mut storage = LocalStorage::open(temp.path()).unwrap();
        storage.write_all(&dataset("ubc")).unwrap();

        let path = temp.path().join("756263.json");
        let text = fs::read_to_string(&path).unwrap().replace("cpsc", "cpsd");
        fs::write(&path, text).unwrap();

        assert!(matches!(
            storage.read_all("ubc"),
            Err(StorageError::ChecksumMismatch(_))
        ));
    }

    #[test]
    fn test_path_like_ids_stay_inside_root() {
        let temp = TempDir::new().unwrap();
        let mut storage = LocalStorage::open(temp.path().join("data")).unwrap();

        for id in [".hidden", "../escape", "a/b\\c", "ubc 2024"] {
            storage.write_all(&dataset(id)).unwrap();
            assert_eq!(storage.read_all(id).unwrap().id(), id);
        }
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
        assert_eq!(
            storage.list_ids().unwrap(),
            vec!["../escape", ".hidden", "a/b\\c", "ubc 2024"]
        );

        storage.remove(".hidden").unwrap();
        assert!(!storage.list_ids().unwrap().contains(&".hidden".to_string()));
        assert!(matches!(storage.read_all(""), Err(StorageError::InvalidId(_))));
    }
}

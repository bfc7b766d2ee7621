//! Dataset storage subsystem for insightdb
//!
//! Holds the persistent copy of every registered dataset so that a facade
//! opened later over the same data directory sees the same datasets.
//!
//! # Design Principles
//!
//! - Whole-dataset writes, no partial updates
//! - Checksum-verified on every read
//! - Temp file + rename on write

mod backend;
mod checksum;
mod errors;
mod local;
mod memory;

pub use backend::DatasetStorage;
pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{StorageError, StorageResult};
pub use local::LocalStorage;
pub use memory::MemoryStorage;

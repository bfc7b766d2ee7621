//! Datasets and their record stores
//!
//! A dataset is a named, typed collection of flat records. The kind fixes
//! the field table; records are typed structs read through [`Record`].

mod kind;
mod record;
mod store;

pub use kind::{DatasetKind, Field};
pub use record::{number_to_json, Course, FieldValue, Record, Room, OVERALL_SECTION_YEAR};
pub use store::{Dataset, DatasetInfo, RecordStore};

#[cfg(test)]
pub(crate) use record::fixtures;

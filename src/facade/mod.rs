//! Facade subsystem for insightdb
//!
//! Orchestrates validation, evaluation, aggregation, the row limit and
//! sorting for every query, and owns the dataset registry.

mod errors;
mod insight;

pub use errors::{InsightError, InsightResult};
pub use insight::InsightFacade;

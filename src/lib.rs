//! insightdb - An embedded query engine for course and room datasets
//!
//! Datasets are ingested from archives into typed record stores. Queries
//! are JSON objects with `WHERE`, `OPTIONS` and optional `TRANSFORMATIONS`
//! clauses; they are validated, evaluated, aggregated, bounded and sorted
//! by [`facade::InsightFacade`].

pub mod cli;
pub mod dataset;
pub mod executor;
pub mod facade;
pub mod http_server;
pub mod ingest;
pub mod observability;
pub mod planner;
pub mod storage;

pub use dataset::{DatasetInfo, DatasetKind};
pub use facade::{InsightError, InsightFacade, InsightResult};

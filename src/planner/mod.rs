//! Query planner subsystem for insightdb
//!
//! Validates raw JSON queries and lowers them into a [`ParsedQuery`]: the
//! filter tree, output columns, sort specification and transformations.
//!
//! # Design Principles
//!
//! - Pure: validation reads the query and the catalog, nothing else
//! - Total: a query is either fully parsed or rejected
//! - Single dataset: every key in a query names the same dataset

mod ast;
mod errors;
mod validator;

pub use ast::{
    ApplyOp, ApplyRule, Column, Comparison, ComparisonOp, FieldKey, FilterNode, Literal,
    ParsedQuery, SortDirection, SortSpec, Transformations,
};
pub use errors::{PlannerError, PlannerResult, Severity, QUERY_INVALID};
pub use validator::{split_key, DatasetCatalog, QueryValidator};

//! Result types for query execution

use serde_json::{Map, Value};

/// One output row, keyed by column name in `COLUMNS` order
pub type Row = Map<String, Value>;

/// Result of query execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Rows in result order
    pub rows: Vec<Row>,
    /// Number of records scanned
    pub scanned_count: usize,
    /// Number of records selected by the filter
    pub matched_count: usize,
}

impl ExecutionResult {
    /// Number of returned rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows were produced
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the result, returning the rows as JSON objects
    pub fn into_values(self) -> Vec<Value> {
        self.rows.into_iter().map(Value::Object).collect()
    }
}

//! Query executor for insightdb
//!
//! Executes a validated query against one record store, producing
//! deterministic results.
//!
//! Execution flow (strict order):
//! 1. Compile the filter tree (negations pushed to the leaves)
//! 2. Evaluate it against the store
//! 3. Project or aggregate the candidates
//! 4. Reject results over the row limit
//! 5. Apply sort (if specified)

use tracing::debug;

use super::aggregate::aggregate;
use super::errors::{ExecutorError, ExecutorResult};
use super::evaluator::evaluate;
use super::filters::CompiledFilter;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;
use crate::dataset::{Record, RecordStore};
use crate::planner::ParsedQuery;

/// Maximum number of rows a query may return
pub const MAX_RESULT_ROWS: usize = 5000;

/// Query executor over a single record store
pub struct QueryExecutor<'a> {
    store: &'a RecordStore,
    max_rows: usize,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new executor with the default row limit
    pub fn new(store: &'a RecordStore) -> Self {
        Self {
            store,
            max_rows: MAX_RESULT_ROWS,
        }
    }

    /// Overrides the row limit
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Executes a query and returns results.
    ///
    /// Same query + same store = same results.
    pub fn execute(&self, query: &ParsedQuery) -> ExecutorResult<ExecutionResult> {
        if query.kind != self.store.kind() {
            return Err(ExecutorError::execution_failed(format!(
                "query targets {} records but the store holds {}",
                query.kind,
                self.store.kind()
            )));
        }

        let filter = query
            .filter
            .as_ref()
            .map(CompiledFilter::compile)
            .transpose()?;

        let mut result = match self.store {
            RecordStore::Courses(records) => run(filter.as_ref(), records, query),
            RecordStore::Rooms(records) => run(filter.as_ref(), records, query),
        };

        if result.rows.len() > self.max_rows {
            return Err(ExecutorError::result_too_large(
                result.rows.len(),
                self.max_rows,
            ));
        }

        if let Some(spec) = &query.order {
            ResultSorter::sort(&mut result.rows, spec);
        }

        debug!(
            dataset = %query.dataset_id,
            scanned = result.scanned_count,
            matched = result.matched_count,
            rows = result.rows.len(),
            "query executed"
        );
        Ok(result)
    }
}

fn run<R: Record>(
    filter: Option<&CompiledFilter>,
    records: &[R],
    query: &ParsedQuery,
) -> ExecutionResult {
    let candidates = evaluate(filter, records);
    let rows = aggregate(&candidates, query.transformations.as_ref(), &query.columns);
    ExecutionResult {
        rows,
        scanned_count: records.len(),
        matched_count: candidates.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{course, room};
    use crate::dataset::{DatasetKind, Field};
    use crate::planner::{Column, FieldKey, FilterNode, SortSpec};
    use serde_json::json;

    fn courses() -> RecordStore {
        RecordStore::Courses(vec![
            course("cpsc", "310", 92.0, 2015.0),
            course("math", "100", 70.0, 2016.0),
            course("phys", "101", 95.0, 2014.0),
        ])
    }

    fn query(filter: Option<FilterNode>) -> ParsedQuery {
        ParsedQuery {
            dataset_id: "c".into(),
            kind: DatasetKind::Courses,
            filter,
            columns: vec![
                Column::Field(FieldKey {
                    key: "c_dept".into(),
                    field: Field::Dept,
                }),
                Column::Field(FieldKey {
                    key: "c_avg".into(),
                    field: Field::Avg,
                }),
            ],
            order: None,
            transformations: None,
        }
    }

    #[test]
    fn test_filter_then_sort() {
        let store = courses();
        let mut q = query(Some(FilterNode::gt(Field::Avg, 90.0)));
        q.order = Some(SortSpec::down("c_avg"));

        let result = QueryExecutor::new(&store).execute(&q).unwrap();
        assert_eq!(result.scanned_count, 3);
        assert_eq!(result.matched_count, 2);
        assert_eq!(
            result.into_values(),
            vec![
                json!({"c_dept": "phys", "c_avg": 95}),
                json!({"c_dept": "cpsc", "c_avg": 92}),
            ]
        );
    }

    #[test]
    fn test_no_order_keeps_scan_order() {
        let store = courses();
        let result = QueryExecutor::new(&store).execute(&query(None)).unwrap();
        let depts: Vec<_> = result.rows.iter().map(|r| r["c_dept"].clone()).collect();
        assert_eq!(depts, vec![json!("cpsc"), json!("math"), json!("phys")]);
    }

    #[test]
    fn test_row_limit() {
        let store = courses();
        let q = query(None);

        let err = QueryExecutor::new(&store)
            .with_max_rows(2)
            .execute(&q)
            .unwrap_err();
        assert_eq!(err.rows(), Some(3));

        let ok = QueryExecutor::new(&store).with_max_rows(3).execute(&q);
        assert_eq!(ok.unwrap().len(), 3);
    }

    #[test]
    fn test_kind_mismatch() {
        let store = RecordStore::Rooms(vec![room("DMP", "110", 40.0)]);
        assert!(QueryExecutor::new(&store).execute(&query(None)).is_err());
    }
}

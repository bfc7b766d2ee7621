//! # Facade Errors
//!
//! The only error type callers of the facade see. Subsystem errors are
//! translated here.

use thiserror::Error;

use crate::executor::{ExecutorError, ExecutorErrorCode};
use crate::ingest::IngestError;
use crate::planner::PlannerError;
use crate::storage::StorageError;

/// Result type for facade operations
pub type InsightResult<T> = Result<T, InsightError>;

/// Caller-visible errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    /// Bad id, bad query, bad archive, duplicate dataset, storage failure
    #[error("{0}")]
    Malformed(String),

    /// Dataset to remove is not registered
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// Query produced more rows than allowed
    #[error("Query result too large: {rows} rows")]
    ResultTooLarge { rows: usize },
}

impl InsightError {
    /// Shorthand for a malformed-input error
    pub fn malformed(reason: impl Into<String>) -> Self {
        InsightError::Malformed(reason.into())
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            InsightError::Malformed(_) => "INSIGHT_MALFORMED",
            InsightError::NotFound(_) => "INSIGHT_NOT_FOUND",
            InsightError::ResultTooLarge { .. } => "INSIGHT_RESULT_TOO_LARGE",
        }
    }
}

impl From<PlannerError> for InsightError {
    fn from(e: PlannerError) -> Self {
        InsightError::Malformed(e.message().to_string())
    }
}

impl From<ExecutorError> for InsightError {
    fn from(e: ExecutorError) -> Self {
        match (e.code(), e.rows()) {
            (ExecutorErrorCode::InsightResultTooLarge, Some(rows)) => {
                InsightError::ResultTooLarge { rows }
            }
            _ => InsightError::Malformed(e.message().to_string()),
        }
    }
}

impl From<IngestError> for InsightError {
    fn from(e: IngestError) -> Self {
        InsightError::Malformed(e.to_string())
    }
}

impl From<StorageError> for InsightError {
    fn from(e: StorageError) -> Self {
        InsightError::Malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_mapping() {
        let err: InsightError = ExecutorError::result_too_large(5001, 5000).into();
        assert_eq!(err, InsightError::ResultTooLarge { rows: 5001 });

        let err: InsightError = ExecutorError::execution_failed("x").into();
        assert_eq!(err, InsightError::Malformed("x".into()));
    }

    #[test]
    fn test_planner_mapping() {
        let err: InsightError = PlannerError::unknown_dataset("ubc").into();
        assert!(matches!(err, InsightError::Malformed(msg) if msg.contains("ubc")));
    }
}

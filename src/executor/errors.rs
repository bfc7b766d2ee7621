//! Executor error types
//!
//! Error codes:
//! - INSIGHT_EXECUTION_FAILED
//! - INSIGHT_RESULT_TOO_LARGE

use std::fmt;

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// General execution failure
    InsightExecutionFailed,
    /// Aggregated result exceeds the row cap
    InsightResultTooLarge,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::InsightExecutionFailed => "INSIGHT_EXECUTION_FAILED",
            ExecutorErrorCode::InsightResultTooLarge => "INSIGHT_RESULT_TOO_LARGE",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    /// Row count for result-size errors
    rows: Option<usize>,
}

impl ExecutorError {
    /// Create an execution failed error
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::InsightExecutionFailed,
            message: reason.into(),
            rows: None,
        }
    }

    /// Create a result too large error
    pub fn result_too_large(rows: usize, limit: usize) -> Self {
        Self {
            code: ExecutorErrorCode::InsightResultTooLarge,
            message: format!("Query produced {} rows, limit is {}", rows, limit),
            rows: Some(rows),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the row count if applicable
    pub fn rows(&self) -> Option<usize> {
        self.rows
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

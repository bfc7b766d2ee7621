//! Planner error types
//!
//! Every validation failure is a malformed query. The error carries a
//! human-readable reason and, where one is involved, the offending key.

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Stable code of a query validation error
pub const QUERY_INVALID: &str = "INSIGHT_QUERY_INVALID";

/// Planner error type with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerError {
    /// Human-readable message
    message: String,
    /// Query key if applicable
    key: Option<String>,
}

impl PlannerError {
    /// Create a query invalid error
    pub fn query_invalid(reason: impl Into<String>) -> Self {
        Self {
            message: reason.into(),
            key: None,
        }
    }

    /// Create an error about a specific query key
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        let k = key.into();
        Self {
            message: format!("'{}': {}", k, reason.into()),
            key: Some(k),
        }
    }

    /// Create an unknown dataset error
    pub fn unknown_dataset(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Dataset '{}' has not been added", id),
            key: Some(id),
        }
    }

    /// Create a multiple datasets error
    pub fn multiple_datasets(expected: &str, found: &str) -> Self {
        Self {
            message: format!(
                "Query references dataset '{}' but targets '{}'",
                found, expected
            ),
            key: Some(found.to_string()),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> &'static str {
        QUERY_INVALID
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending key if applicable
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code(), self.message)
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::invalid_key("courses_foo", "unknown field");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("INSIGHT_QUERY_INVALID"));
        assert!(display.contains("courses_foo"));
        assert_eq!(err.key(), Some("courses_foo"));
    }

    #[test]
    fn test_unknown_dataset() {
        let err = PlannerError::unknown_dataset("rooms");
        assert!(err.message().contains("rooms"));
        assert_eq!(err.code(), QUERY_INVALID);
    }
}

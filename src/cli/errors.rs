//! CLI-specific error types

use std::fmt;
use std::io;

use crate::facade::InsightError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Facade or server could not start
    BootFailed,
    /// A dataset or query request was rejected
    RequestFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "INSIGHT_CLI_CONFIG_ERROR",
            Self::IoError => "INSIGHT_CLI_IO_ERROR",
            Self::BootFailed => "INSIGHT_CLI_BOOT_FAILED",
            Self::RequestFailed => "INSIGHT_CLI_REQUEST_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<InsightError> for CliError {
    fn from(e: InsightError) -> Self {
        Self::new(
            CliErrorCode::RequestFailed,
            format!("{}: {}", e.code(), e),
        )
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad port");
        assert_eq!(err.to_string(), "INSIGHT_CLI_CONFIG_ERROR: bad port");
    }

    #[test]
    fn test_from_insight_error() {
        let err: CliError = InsightError::NotFound("ubc".into()).into();
        assert_eq!(err.code(), &CliErrorCode::RequestFailed);
        assert!(err.message().starts_with("INSIGHT_NOT_FOUND"));
    }
}

//! Tracing subscriber setup
//!
//! Events go to stderr so that stdout stays free for command output.
//! `RUST_LOG`, when set, overrides the configured level.

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{0}': {1}")]
    InvalidLevel(String, String),

    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Installs the global subscriber at `level`
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| LoggingError::InvalidLevel(level.to_string(), e.to_string()))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever test installs first wins; a second install must fail
        let _ = init_logging("debug");
        assert!(matches!(
            init_logging("info"),
            Err(LoggingError::AlreadyInitialized) | Err(LoggingError::InvalidLevel(..))
        ));
    }
}

//! Observability subsystem for insightdb
//!
//! Structured logging through `tracing`. Library code only emits events;
//! binaries install a subscriber once with [`init_logging`].

mod logging;

pub use logging::{init_logging, LoggingError};

//! CLI module for insightdb
//!
//! Provides command-line interface for:
//! - serve: HTTP server over the configured data directory
//! - add / remove / list: dataset management
//! - query: one-shot query execution
//! - exec: line-delimited JSON requests on stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    add, exec, exec_stream, handle_request, list, open_facade, query, remove, run, run_command,
    serve, Request,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_response};

//! CLI command implementations
//!
//! Every command opens a facade over the configured data directory, so
//! datasets added by one invocation are visible to the next.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::dataset::DatasetKind;
use crate::facade::{InsightError, InsightFacade};
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::storage::LocalStorage;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_response};

/// One `exec` request line
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    /// `content` is the archive as base64 text
    Add {
        id: String,
        kind: DatasetKind,
        content: String,
    },
    Remove {
        id: String,
    },
    List,
    Query {
        query: Value,
    },
}

/// Parse arguments, load config, and run
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load(&cli.config)?;
    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("logging disabled: {}", e);
    }
    run_command(cli.command, &config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Serve { port } => serve(config, port),
        Command::Add { id, kind, archive } => add(config, &id, kind, &archive),
        Command::Remove { id } => remove(config, &id),
        Command::List => list(config),
        Command::Query { file } => query(config, file.as_deref()),
        Command::Exec => exec(config),
    }
}

/// Open the facade over the configured data directory
pub fn open_facade(config: &Config) -> CliResult<InsightFacade> {
    let storage = LocalStorage::open(config.data_path()).map_err(|e| {
        CliError::boot_failed(format!(
            "Failed to open data directory {}: {}",
            config.data_dir, e
        ))
    })?;
    InsightFacade::open(Box::new(storage))
        .map_err(|e| CliError::boot_failed(format!("Failed to load datasets: {}", e)))
}

/// Start the HTTP server
pub fn serve(config: &Config, port: Option<u16>) -> CliResult<()> {
    let facade = open_facade(config)?;

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::new(http_config, facade);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Add a dataset from an archive file
pub fn add(config: &Config, id: &str, kind: DatasetKind, archive: &Path) -> CliResult<()> {
    let content = fs::read(archive).map_err(|e| {
        CliError::io_error(format!("Failed to read archive {}: {}", archive.display(), e))
    })?;
    let mut facade = open_facade(config)?;
    let ids = facade.add_dataset(id, &content, kind)?;
    write_response(&mut io::stdout(), serde_json::to_value(ids)?)
}

/// Remove a dataset
pub fn remove(config: &Config, id: &str) -> CliResult<()> {
    let mut facade = open_facade(config)?;
    let removed = facade.remove_dataset(id)?;
    write_response(&mut io::stdout(), Value::String(removed))
}

/// List registered datasets
pub fn list(config: &Config) -> CliResult<()> {
    let facade = open_facade(config)?;
    write_response(&mut io::stdout(), serde_json::to_value(facade.list_datasets())?)
}

/// Run one query from a file or stdin
pub fn query(config: &Config, file: Option<&Path>) -> CliResult<()> {
    let query = match file {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::io_error(format!("Failed to read query {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&text)?
        }
        None => read_request()?,
    };

    let facade = open_facade(config)?;
    let rows = facade.perform_query(&query)?;
    write_response(&mut io::stdout(), Value::Array(rows))
}

/// Process line-delimited requests from stdin until EOF
pub fn exec(config: &Config) -> CliResult<()> {
    let mut facade = open_facade(config)?;
    let stdin = io::stdin();
    exec_stream(&mut facade, stdin.lock(), &mut io::stdout())
}

/// Answers every request line; a rejected request does not stop the stream
pub fn exec_stream<R: BufRead, W: Write>(
    facade: &mut InsightFacade,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    for raw in read_requests(input) {
        let request = raw.and_then(|value| {
            serde_json::from_value::<Request>(value)
                .map_err(|e| CliError::io_error(format!("Invalid request: {}", e)))
        });

        match request {
            Ok(request) => match handle_request(facade, request) {
                Ok(data) => write_response(out, data)?,
                Err(e) => {
                    warn!(code = e.code(), error = %e, "request rejected");
                    write_error(out, e.code(), &e.to_string())?
                }
            },
            Err(e) => write_error(out, e.code_str(), e.message())?,
        }
    }
    Ok(())
}

/// Dispatches one request to the facade
pub fn handle_request(facade: &mut InsightFacade, request: Request) -> Result<Value, InsightError> {
    let data = match request {
        Request::Add { id, kind, content } => {
            Value::from(facade.add_dataset(&id, content.as_bytes(), kind)?)
        }
        Request::Remove { id } => Value::String(facade.remove_dataset(&id)?),
        Request::List => serde_json::to_value(facade.list_datasets())
            .map_err(|e| InsightError::malformed(e.to_string()))?,
        Request::Query { query } => Value::Array(facade.perform_query(&query)?),
    };
    Ok(data)
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - insightdb serve [--port <port>]
//! - insightdb add <id> <kind> <archive>
//! - insightdb remove <id>
//! - insightdb list
//! - insightdb query [<file>]
//! - insightdb exec

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dataset::DatasetKind;

/// insightdb - An embedded query engine for course and room datasets
#[derive(Parser, Debug)]
#[command(name = "insightdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./insightdb.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Add a dataset from a tar archive (raw or base64)
    Add {
        /// Dataset id
        id: String,
        /// Dataset kind: courses or rooms
        kind: DatasetKind,
        /// Path to the archive
        archive: PathBuf,
    },

    /// Remove a dataset
    Remove {
        /// Dataset id
        id: String,
    },

    /// List registered datasets
    List,

    /// Run one query read from a file, or from stdin
    Query {
        /// Path to the query JSON
        file: Option<PathBuf>,
    },

    /// Process line-delimited JSON requests from stdin
    Exec,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

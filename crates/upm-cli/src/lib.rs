//! UPM CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Command-line interface over `upm-core`.
//!
//! # Overview
//!
//! - **ID mapping**: translate identifiers between databases (`upm map`)
//! - **Search**: build and run UniProtKB queries (`upm search`)
//! - **Orthologs**: Swiss-Prot orthologs through OrthoDB (`upm orthologs`)
//! - **Registry**: list queryable/returnable fields and mapping databases
//!   (`upm fields`, `upm databases`)

pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use error::{CliError, Result};
pub use output::OutputFormat;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// UPM - UniProt ID mapping and search
#[derive(Parser, Debug)]
#[command(name = "upm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// UniProt REST API base URL
    #[arg(long, env = "UPM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the full CLI reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map identifiers from one database to another
    Map {
        /// Source database (e.g., "UniProtKB_AC-ID")
        #[arg(short, long)]
        from: String,

        /// Target database (e.g., "Ensembl")
        #[arg(short, long)]
        to: String,

        /// Identifiers to map
        ids: Vec<String>,

        /// Read identifiers from a file (one per line, or comma separated)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Return fields, comma separated (UniProtKB targets only)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Identifiers per mapping job
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Jobs to run at the same time
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the output file if it exists
        #[arg(long)]
        overwrite: bool,

        /// Output format (defaults to table on a terminal, tsv otherwise)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Search UniProtKB
    Search {
        /// Raw query string, combined with any --filter expressions
        query: Option<String>,

        /// Field filter: name=value, name==value (exact), name~value (prefix)
        /// or name=low..high (range); repeatable
        #[arg(long = "filter", short = 'F')]
        filters: Vec<String>,

        /// Combine filters with OR instead of AND
        #[arg(long)]
        any: bool,

        /// Return fields, comma separated
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Maximum number of entries to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Include isoform entries
        #[arg(long)]
        isoforms: bool,

        /// Output format (defaults to table on a terminal, tsv otherwise)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the output file if it exists
        #[arg(long)]
        overwrite: bool,

        /// Print the query that would be sent and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Find Swiss-Prot orthologs of UniProtKB accessions through OrthoDB
    Orthologs {
        /// UniProtKB accessions
        ids: Vec<String>,

        /// Read accessions from a file (one per line, or comma separated)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Keep orthologs whose organism name matches this pattern; repeatable
        #[arg(long = "organism")]
        organisms: Vec<String>,

        /// Match organism patterns case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Return fields for the ortholog entries, comma separated
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Identifiers per mapping job
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the output file if it exists
        #[arg(long)]
        overwrite: bool,

        /// Output format (defaults to table on a terminal, tsv otherwise)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List UniProtKB fields
    Fields {
        /// Only show fields in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List databases supported by ID mapping
    Databases,
}

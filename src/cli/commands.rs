//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fivetran API and spreadsheet export toolkit
#[derive(Parser, Debug)]
#[command(name = "fivetran-toolkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filtering options shared by the listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Filter clause as a JSON object, e.g. '{"service":"email"}'.
    /// Repeat to OR clauses together; a JSON array of objects also works.
    #[arg(long = "filter", value_name = "JSON")]
    pub filters: Vec<String>,

    /// Keep scanning after the first match instead of stopping
    #[arg(long)]
    pub all: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List groups
    Groups {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List users
    Users {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List teams
    Teams {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List connectors (of one group, or of every group)
    Connectors {
        /// Group id; every group when omitted
        #[arg(long)]
        group: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Pause a connector
    Pause {
        /// Connector id
        connector_id: String,
    },

    /// Export a sheet to CSV or TSV
    Export {
        /// Spreadsheet id or URL (a workbook file with --local)
        sheet: String,

        /// Sheet (tab) to export
        sheet_name: String,

        /// Destination folder: local path, s3://, r2://, gs://, az:// or memory://
        target: String,

        /// Output format (csv or tsv)
        #[arg(long, default_value = "csv")]
        to: String,

        /// Cell delimiter (defaults to the format's)
        #[arg(long)]
        delimiter: Option<String>,

        /// Read SHEET as a local YAML/JSON workbook file
        #[arg(long)]
        local: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}

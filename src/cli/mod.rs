//! CLI module
//!
//! Command-line interface over the API client and the sheet exporter.
//!
//! # Commands
//!
//! - `groups`, `users`, `teams` - list account resources
//! - `connectors` - list connectors of one group or of every group
//! - `pause` - pause a connector
//! - `export` - export a sheet to CSV/TSV

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, QueryArgs};
pub use runner::{parse_filters, Runner};

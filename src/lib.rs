// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Fivetran Toolkit
//!
//! Query the Fivetran REST API with client-side filtering, and export
//! spreadsheet tabs to CSV/TSV files in local or cloud storage.
//!
//! ## Features
//!
//! - **Cursor Pagination**: follows `next_cursor` until the listing ends
//! - **Filtering**: OR of AND-clauses matched on item fields
//! - **Early Exit**: stop at the first match instead of scanning everything
//! - **Partial Results**: a failing continuation page keeps what was gathered
//! - **Sheet Export**: CSV/TSV to S3, R2, GCS, Azure or local folders
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fivetran_toolkit::{Credentials, FilterSet, FilterSpec, FivetranClient, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = FivetranClient::new(Credentials::new("key", "secret"), 1)?;
//!
//!     let filters = FilterSet::single(FilterSpec::new().with("service", json!("email")));
//!     let result = client.connectors(&filters, true).await?;
//!
//!     for item in &result.items {
//!         println!("{item}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     FivetranClient                       │
//! │  groups()  users()  teams()  connectors()  pause()       │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌───────────┬────────────────┴──────────┬──────────────────┐
//! │   Auth    │   HTTP                    │   Pagination     │
//! ├───────────┼───────────────────────────┼──────────────────┤
//! │ Basic     │ ParamBuilder              │ CursorPager      │
//! │           │ HttpCaller / ApiClient    │ Filter           │
//! └───────────┴───────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the toolkit
pub mod error;

/// Common types and type aliases
pub mod types;

/// Basic authentication
pub mod auth;

/// HTTP transport and request parameters
pub mod http;

/// Item filters
pub mod filter;

/// Cursor pagination
pub mod pagination;

/// Fivetran API client
pub mod client;

/// Configuration loading
pub mod config;

/// Sheet export to CSV/TSV
pub mod export;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{Authenticator, Credentials};
pub use client::{FivetranClient, Resource};
pub use config::ToolkitConfig;
pub use filter::{FilterSet, FilterSpec};
pub use pagination::{DoneReason, QueryResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::client::FivetranClient;
use crate::config::ToolkitConfig;
use crate::error::{Error, Result, ResultExt};
use crate::export::{
    export_sheet, ExportFormat, ExportRequest, ObjectStoreFolder, SheetSource, SheetsApiSource,
    StaticWorkbook,
};
use crate::filter::{FilterSet, FilterSpec};
use crate::pagination::QueryResult;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = ToolkitConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Groups { query } => {
                let client = FivetranClient::from_config(&config)?;
                let (filters, exit) = query_options(query)?;
                let result = client.groups(&filters, exit).await?;
                self.print_result(&result)
            }
            Commands::Users { query } => {
                let client = FivetranClient::from_config(&config)?;
                let (filters, exit) = query_options(query)?;
                let result = client.users(&filters, exit).await?;
                self.print_result(&result)
            }
            Commands::Teams { query } => {
                let client = FivetranClient::from_config(&config)?;
                let (filters, exit) = query_options(query)?;
                let result = client.teams(&filters, exit).await?;
                self.print_result(&result)
            }
            Commands::Connectors { group, query } => {
                let client = FivetranClient::from_config(&config)?;
                let (filters, exit) = query_options(query)?;
                let result = match group {
                    Some(group_id) => client.connectors_in_group(group_id, &filters, exit).await?,
                    None => client.connectors(&filters, exit).await?,
                };
                self.print_result(&result)
            }
            Commands::Pause { connector_id } => {
                let client = FivetranClient::from_config(&config)?;
                client.pause_connector(connector_id).await?;
                self.print(&json!({"connector_id": connector_id, "paused": true}))
            }
            Commands::Export {
                sheet,
                sheet_name,
                target,
                to,
                delimiter,
                local,
            } => {
                let url = self
                    .export(&config, sheet, sheet_name, target, to, delimiter.as_deref(), *local)
                    .await?;
                self.print(&json!({"url": url}))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn export(
        &self,
        config: &ToolkitConfig,
        sheet: &str,
        sheet_name: &str,
        target: &str,
        to: &str,
        delimiter: Option<&str>,
        local: bool,
    ) -> Result<String> {
        for (name, value) in [("sheet", sheet), ("sheet_name", sheet_name), ("target", target)] {
            if value.trim().is_empty() {
                return Err(Error::missing_parameter(name));
            }
        }

        let format = ExportFormat::from_str(to)?;
        let mut request = ExportRequest::new(sheet_name, format);
        if let Some(d) = delimiter {
            request = request.with_delimiter(d);
        }

        let store = ObjectStoreFolder::parse(target)?;
        let source: Box<dyn SheetSource> = if local {
            Box::new(StaticWorkbook::from_file(sheet)?)
        } else {
            let token = config
                .sheets
                .access_token
                .as_deref()
                .ok_or_else(|| Error::missing_field("sheets.access_token"))?;
            let http = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()?;
            Box::new(SheetsApiSource::open(http, &config.sheets.base_url, token, sheet).await?)
        };

        export_sheet(source.as_ref(), &store, &request).await
    }

    fn print_result(&self, result: &QueryResult) -> Result<()> {
        if !result.is_complete() {
            warn!(
                "Result may be partial ({}): {} item(s) from {} page(s)",
                result.reason,
                result.len(),
                result.pages
            );
        }

        match self.cli.format {
            OutputFormat::Json => {
                for item in &result.items {
                    println!("{}", serde_json::to_string(item)?);
                }
                Ok(())
            }
            OutputFormat::Pretty => self.print(&json!({
                "items": result.items,
                "reason": result.reason,
                "pages": result.pages,
            })),
        }
    }

    fn print(&self, value: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

fn query_options(query: &QueryArgs) -> Result<(FilterSet, bool)> {
    Ok((parse_filters(&query.filters)?, !query.all))
}

/// Parse `--filter` arguments: each is a JSON object (one clause) or a JSON
/// array of objects (several clauses)
pub fn parse_filters(raw: &[String]) -> Result<FilterSet> {
    let mut specs = Vec::new();
    for text in raw {
        let value: Value =
            serde_json::from_str(text).with_context(|| format!("Invalid --filter '{text}'"))?;
        match value {
            Value::Object(map) => specs.push(FilterSpec::from(map)),
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(map) => specs.push(FilterSpec::from(map)),
                        other => {
                            return Err(Error::config(format!(
                                "Filter clauses must be JSON objects, got {other}"
                            )))
                        }
                    }
                }
            }
            other => {
                return Err(Error::config(format!(
                    "Filter clauses must be JSON objects, got {other}"
                )))
            }
        }
    }
    Ok(FilterSet::new(specs))
}

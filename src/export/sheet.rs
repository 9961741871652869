//! Spreadsheet sources

use crate::error::{Error, Result};
use crate::filter::scalar_string;
use crate::types::JsonValue;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Google Sheets API root
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// A spreadsheet whose sheets can be read as display strings
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Spreadsheet file name
    fn name(&self) -> &str;

    /// Display values of the used range of `sheet_name`, padded to a
    /// rectangle
    async fn display_values(&self, sheet_name: &str) -> Result<Vec<Vec<String>>>;
}

/// Pad ragged rows to the widest row and render cells as strings
fn rectangular(rows: Vec<Vec<JsonValue>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    rows.into_iter()
        .map(|row| {
            let mut cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    JsonValue::Null => String::new(),
                    other => scalar_string(other).unwrap_or_else(|| other.to_string()),
                })
                .collect();
            cells.resize(width, String::new());
            cells
        })
        .collect()
}

/// Extract the spreadsheet id from either a bare id or a sheet URL
/// (`https://docs.google.com/spreadsheets/d/<id>/edit`)
pub fn parse_spreadsheet_id(sheet_ref: &str) -> Result<String> {
    let sheet_ref = sheet_ref.trim();
    if sheet_ref.is_empty() {
        return Err(Error::missing_parameter("sheet"));
    }
    if !sheet_ref.contains('/') {
        return Ok(sheet_ref.to_string());
    }

    let url = Url::parse(sheet_ref)?;
    let mut segments = url.path_segments().into_iter().flatten();
    while let Some(segment) = segments.next() {
        if segment == "d" {
            if let Some(id) = segments.next().filter(|id| !id.is_empty()) {
                return Ok(id.to_string());
            }
        }
    }
    Err(Error::sheet(format!("No spreadsheet id in URL '{sheet_ref}'")))
}

// ============================================================================
// Google Sheets API
// ============================================================================

#[derive(Deserialize)]
struct SpreadsheetMeta {
    properties: SpreadsheetProperties,
}

#[derive(Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

/// A spreadsheet read through the Google Sheets v4 REST API
#[derive(Debug, Clone)]
pub struct SheetsApiSource {
    client: Client,
    base_url: String,
    access_token: String,
    spreadsheet_id: String,
    title: String,
}

impl SheetsApiSource {
    /// Open a spreadsheet by id or URL and fetch its title
    pub async fn open(
        client: Client,
        base_url: &str,
        access_token: &str,
        sheet_ref: &str,
    ) -> Result<Self> {
        let spreadsheet_id = parse_spreadsheet_id(sheet_ref)?;
        let mut source = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            spreadsheet_id,
            title: String::new(),
        };

        let mut url = source.spreadsheet_url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title");
        let meta: SpreadsheetMeta = source.get_json(url).await?;
        source.title = meta.properties.title;

        debug!(
            "Opened spreadsheet '{}' ({})",
            source.title, source.spreadsheet_id
        );
        Ok(source)
    }

    /// The spreadsheet id
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn spreadsheet_url(&self, extra: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Invalid sheets API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(extra);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::api(status.as_u16(), body));
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::sheet(format!("Unexpected sheets API response: {e}")))
    }
}

#[async_trait]
impl SheetSource for SheetsApiSource {
    fn name(&self) -> &str {
        &self.title
    }

    async fn display_values(&self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        // A1 notation: a bare quoted sheet name selects its whole used range
        let range = format!("'{}'", sheet_name.replace('\'', "''"));
        let mut url = self.spreadsheet_url(&["values", range.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let values: ValueRange = self.get_json(url).await?;
        Ok(rectangular(values.values))
    }
}

// ============================================================================
// Local workbook
// ============================================================================

/// A workbook held in memory, typically loaded from a YAML or JSON file:
///
/// ```yaml
/// name: Budget
/// sheets:
///   Q1:
///     - [Item, Cost]
///     - [Rent, 1200]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticWorkbook {
    name: String,
    #[serde(default)]
    sheets: HashMap<String, Vec<Vec<JsonValue>>>,
}

impl StaticWorkbook {
    /// Create an empty workbook
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: HashMap::new(),
        }
    }

    /// Add a sheet of string rows
    #[must_use]
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(JsonValue::from).collect())
            .collect();
        self.sheets.insert(name.into(), rows);
        self
    }

    /// Load a workbook file (YAML or JSON)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[async_trait]
impl SheetSource for StaticWorkbook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn display_values(&self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        let rows = self
            .sheets
            .get(sheet_name)
            .ok_or_else(|| Error::sheet(format!("Sheet '{sheet_name}' not found in '{}'", self.name)))?;
        Ok(rectangular(rows.clone()))
    }
}

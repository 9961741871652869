//! Delimited text rendering

use crate::error::{Error, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Tab-separated values
    Tsv,
}

impl ExportFormat {
    /// Delimiter used when none is given
    pub fn default_delimiter(self) -> &'static str {
        match self {
            ExportFormat::Csv => ",",
            ExportFormat::Tsv => "\t",
        }
    }

    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }

    /// MIME type of the exported blob
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Tsv => "text/tab-separated-values",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            _ => Err(Error::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render rows with every cell quoted.
///
/// Embedded `"` are doubled, cells are joined by `delimiter` and every row
/// ends with `\n`, so line breaks, tabs and commas inside cells survive.
/// The delimiter must be a single byte.
pub fn generate_sheet_contents(values: &[Vec<String>], delimiter: &str) -> Result<String> {
    let &[byte] = delimiter.as_bytes() else {
        return Err(Error::config(format!(
            "Delimiter must be a single byte, got '{delimiter}'"
        )));
    };

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .delimiter(byte)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(vec![]);

    for row in values {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("Failed to flush sheet contents: {}", e.error())))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("Sheet contents are not UTF-8: {e}")))
}

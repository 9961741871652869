//! Export pipeline

use super::format::{generate_sheet_contents, ExportFormat};
use super::sheet::SheetSource;
use super::store::{Blob, FileStore};
use crate::error::{Error, Result};
use tracing::info;

/// What to export and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Sheet (tab) within the spreadsheet
    pub sheet_name: String,
    /// Output format
    pub format: ExportFormat,
    /// Cell delimiter; the format's default when absent or empty
    pub delimiter: Option<String>,
}

impl ExportRequest {
    /// Export `sheet_name` in `format` with the default delimiter
    pub fn new(sheet_name: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            format,
            delimiter: None,
        }
    }

    /// Use a custom delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Delimiter in effect
    pub fn delimiter(&self) -> &str {
        self.delimiter
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.format.default_delimiter())
    }
}

/// Export one sheet of `source` into `store`.
///
/// The file is named `<spreadsheet name> - <sheet name>.<ext>`. Returns the
/// URL of the stored file.
pub async fn export_sheet(
    source: &dyn SheetSource,
    store: &dyn FileStore,
    request: &ExportRequest,
) -> Result<String> {
    if request.sheet_name.trim().is_empty() {
        return Err(Error::missing_parameter("sheet_name"));
    }

    let values = source.display_values(&request.sheet_name).await?;
    let contents = generate_sheet_contents(&values, request.delimiter())?;

    let blob = Blob::new(
        format!(
            "{} - {}.{}",
            source.name(),
            request.sheet_name,
            request.format.extension()
        ),
        request.format.content_type(),
        contents,
    );

    let url = store.create_file(blob).await?;
    info!("SUCCESS: File exported as {}, {url}", request.format);
    Ok(url)
}

//! Spreadsheet export
//!
//! Reads the display values of one sheet, renders them as delimited text
//! with every cell quoted, and uploads the result to a file store.
//!
//! # Overview
//!
//! - [`SheetSource`]: where cell values come from (Google Sheets API or a
//!   local workbook file)
//! - [`generate_sheet_contents`]: QUOTE_ALL rendering
//! - [`FileStore`]: where the rendered blob goes (object storage or a local
//!   directory)
//! - [`export_sheet`]: the pipeline tying them together

mod exporter;
mod format;
mod sheet;
mod store;

pub use exporter::{export_sheet, ExportRequest};
pub use format::{generate_sheet_contents, ExportFormat};
pub use sheet::{
    parse_spreadsheet_id, SheetSource, SheetsApiSource, StaticWorkbook, DEFAULT_SHEETS_API_URL,
};
pub use store::{Blob, FileStore, ObjectStoreFolder};

//! Export module for writing crawl results
//!
//! Four formats are supported:
//! - JSON: the full record tree as one pretty-printed array
//! - CSV: one summary row per page
//! - XLSX: an `Overview` sheet mirroring the CSV plus a `Tables` sheet
//! - SQLite: `pages`, `tables` and `links` tables
//!
//! Exporting an empty result set is not an error; every format then
//! produces a valid file with headers or schema but no rows.

mod json;
mod schema;
mod spreadsheet;
mod sqlite;
mod tabular;

use crate::model::PageRecord;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column headers shared by the CSV file and the spreadsheet overview
pub const SUMMARY_HEADERS: [&str; 8] = [
    "url",
    "title",
    "word_count",
    "table_count",
    "internal_links",
    "external_links",
    "description",
    "status",
];

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    #[serde(alias = "excel", alias = "spreadsheet")]
    #[value(alias = "excel", alias = "spreadsheet")]
    Xlsx,
    #[serde(alias = "db", alias = "sqlite3")]
    #[value(alias = "db", alias = "sqlite3")]
    Sqlite,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Json, Self::Csv, Self::Xlsx, Self::Sqlite];

    /// File extension used for timestamped export files
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Sqlite => "db",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
            Self::Sqlite => "SQLite",
        };
        write!(f, "{}", name)
    }
}

/// Writes `results` to `path` in the given format
///
/// An existing file at `path` is replaced.
///
/// # Arguments
///
/// * `results` - The page records, in crawl order
/// * `format` - Output format
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(ExportError)` - The destination could not be written
pub fn export(results: &[PageRecord], format: ExportFormat, path: &Path) -> ExportResult<()> {
    tracing::debug!("Exporting {} pages as {} to {}", results.len(), format, path.display());

    match format {
        ExportFormat::Json => json::write_json(results, path),
        ExportFormat::Csv => tabular::write_csv(results, path),
        ExportFormat::Xlsx => spreadsheet::write_xlsx(results, path),
        ExportFormat::Sqlite => sqlite::write_sqlite(results, path),
    }
}

/// Builds the timestamped file name for an export, e.g. `crawl_20240131_154500.json`
pub fn export_file_name(format: ExportFormat) -> String {
    format!(
        "crawl_{}.{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Writes one timestamped file per format into `dir`
///
/// The directory is created if missing. Each format is attempted even if
/// an earlier one failed; the outcome of every format is returned in order.
pub fn export_all(
    results: &[PageRecord],
    formats: &[ExportFormat],
    dir: &Path,
) -> Vec<(ExportFormat, ExportResult<PathBuf>)> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::error!("Cannot create export directory {}: {}", dir.display(), e);
    }

    formats
        .iter()
        .map(|&format| {
            let path = dir.join(export_file_name(format));
            let outcome = export(results, format, &path).map(|()| path);

            match &outcome {
                Ok(path) => tracing::info!("Exported {} to {}", format, path.display()),
                Err(e) => tracing::error!("{} export failed: {}", format, e),
            }

            (format, outcome)
        })
        .collect()
}

/// The flat per-page summary row used by CSV and the spreadsheet overview
pub(crate) fn summary_row(page: &PageRecord) -> [String; 8] {
    [
        page.url.clone(),
        page.title().unwrap_or_default().to_string(),
        page.text.word_count.to_string(),
        page.tables.len().to_string(),
        page.links.internal.len().to_string(),
        page.links.external.len().to_string(),
        page.description().unwrap_or_default().to_string(),
        page.status.label().to_string(),
    ]
}

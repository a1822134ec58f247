//! CSV input for import and batch commands.
//!
//! Rows are returned as read, header included; the services skip row 0.

use std::path::Path;

use archivehub_core::error::{AppError, ErrorKind};
use archivehub_core::result::AppResult;

/// Read every row of a CSV file. Rows may have differing lengths.
pub fn read_rows(path: &Path) -> AppResult<Vec<Vec<String>>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Failed to open '{}': {e}", path.display()),
                e,
            )
        })?;
    collect_rows(reader)
}

/// Read every row from in-memory CSV text.
pub fn parse_rows(content: &str) -> AppResult<Vec<Vec<String>>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(content.as_bytes());
    collect_rows(reader)
}

fn collect_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> AppResult<Vec<Vec<String>>> {
    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Validation, format!("Invalid CSV: {e}"), e)
                })
        })
        .collect()
}

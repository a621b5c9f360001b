//! File formats for moving readings in and out of the tracker
//!
//! - [`json`]: the full collection as a JSON document (save/load and auto-backup)
//! - [`tab_text`]: human-readable tab-separated export, and an importer that also
//!   understands the older layout with a leading reading-number column

pub mod json;
pub mod tab_text;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while reading or writing reading files
#[derive(Debug, Error)]
pub enum TransferError {
    /// The document is not valid JSON for a list of readings
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// The file could not be read or written
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

/// File name offered for downloads, e.g. `bp-readings-2026-01-21.json`
pub fn suggested_file_name(date: NaiveDate, extension: &str) -> String {
    format!("bp-readings-{}.{}", date.format("%Y-%m-%d"), extension)
}

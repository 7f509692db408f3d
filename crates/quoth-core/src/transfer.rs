//! JSON export and import
//!
//! Export produces a pretty-printed JSON array of `{text, category}`
//! objects and a timestamped file name. Import parses a document and
//! hands its items to `QuoteStore::import_batch`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::models::Quote;

/// Errors from reading or writing export documents
#[derive(Error, Debug)]
pub enum TransferError {
    /// Body is not JSON at all
    #[error("Invalid file format: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Body is JSON but not an array
    #[error("Invalid file format: JSON must be an array of quote objects")]
    NotAnArray,

    /// Serializing the store failed
    #[error("Export failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A rendered export document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Suggested file name, e.g. `quotes_2024-05-01-09-30-00.json`
    pub file_name: String,
    /// UTF-8 JSON body with two-space indentation
    pub contents: String,
}

/// Render quotes as an export document stamped with `now`
pub fn export_quotes(quotes: &[Quote], now: DateTime<Utc>) -> Result<ExportDocument, TransferError> {
    let contents = serde_json::to_string_pretty(quotes).map_err(TransferError::Serialize)?;
    Ok(ExportDocument {
        file_name: export_file_name(now),
        contents,
    })
}

/// File name for an export made at `now`
///
/// The ISO-8601 timestamp is cut at seconds and its `:` and `T`
/// separators become `-`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("quotes_{}.json", now.format("%Y-%m-%d-%H-%M-%S"))
}

/// Parse an import document into its raw items
///
/// The whole document is rejected unless it is a JSON array. Items are
/// returned unvalidated; the store applies the per-item shape check.
pub fn parse_import(body: &str) -> Result<Vec<Value>, TransferError> {
    match serde_json::from_str(body).map_err(TransferError::InvalidJson)? {
        Value::Array(items) => Ok(items),
        _ => Err(TransferError::NotAnArray),
    }
}

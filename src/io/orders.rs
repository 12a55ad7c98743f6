//! Order table reader
//!
//! Orders come either as a delimited text file with a header row or as a
//! JSON array of objects. Only the order columns are kept; blank CSV
//! cells are read as nulls so stabilization fills them with `N/A`.

use crate::error::{common, ErrorCode, ErrorExt, FeedError, Result};
use crate::normalize::{RawOrderRow, ORDER_COLUMNS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// Default field delimiter of the order feed
pub const DEFAULT_DELIMITER: char = ';';

/// Supported order file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("csv") | Some("txt") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(FeedError::input_with_code(
                ErrorCode::INPUT_UNSUPPORTED_FORMAT,
                "cannot detect order file format from extension (expected .csv or .json)",
                Some(path.to_path_buf()),
            )),
        }
    }
}

/// Read the order table from disk
pub async fn read_orders(
    path: &Path,
    format: Option<InputFormat>,
    delimiter: char,
) -> Result<Vec<RawOrderRow>> {
    if !path.exists() {
        return Err(common::input_not_found(path));
    }

    let format = match format {
        Some(f) => f,
        None => InputFormat::from_path(path)?,
    };
    let data = fs::read_to_string(path)
        .await
        .to_input_error(path, "failed to read order file")?;

    let rows = match format {
        InputFormat::Csv => parse_orders_csv(&data, delimiter),
        InputFormat::Json => parse_orders_json(&data),
    }
    .map_err(|e| e.with_path(path))?;

    info!("Order data loaded successfully from {}", path.display());
    Ok(rows)
}

/// Parse delimited order data; the first line must be a header row
///
/// Rows shorter than the header are padded with nulls; longer rows are
/// rejected.
pub fn parse_orders_csv(data: &str, delimiter: char) -> Result<Vec<RawOrderRow>> {
    let delimiter = delimiter_byte(delimiter)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader.headers()?.clone();
    debug!("Order file columns: {:?}", headers.iter().collect::<Vec<_>>());
    for column in ORDER_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            warn!("Order file has no '{}' column, filling it with N/A", column);
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(FeedError::input_with_code(
                ErrorCode::INPUT_INVALID_CSV,
                format!(
                    "line {} has {} fields but the header has {}",
                    line,
                    record.len(),
                    headers.len()
                ),
                None,
            ));
        }
        let mut cells = Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            let cell = if field.is_empty() {
                Value::Null
            } else {
                Value::String(field.to_string())
            };
            cells.insert(header.to_string(), cell);
        }
        rows.push(serde_json::from_value(Value::Object(cells))?);
    }

    debug!("Parsed {} order rows", rows.len());
    Ok(rows)
}

/// Parse a JSON array of order objects
pub fn parse_orders_json(data: &str) -> Result<Vec<RawOrderRow>> {
    let value: Value = serde_json::from_str(data)?;
    let Value::Array(items) = value else {
        return Err(common::missing_section(None, "orders"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(FeedError::input_with_code(
                    ErrorCode::INPUT_INVALID_JSON,
                    format!("order {} is not an object", index),
                    None,
                ));
            }
            Ok(serde_json::from_value(item)?)
        })
        .collect()
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(FeedError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_FORMAT,
            format!("delimiter {:?} must be a single ASCII character", delimiter),
            Some("csv_delimiter".to_string()),
        ))
    }
}

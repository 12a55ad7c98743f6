//! Table writers for the normalized outputs
//!
//! CSV output always carries a header row, even for an empty table, and
//! Parquet output always carries the schema. Absent values are empty cells
//! in CSV and nulls in JSON and Parquet.

use super::columnar::{encode_parquet, ColumnKind};
use super::invoices::InvoiceTable;
use crate::error::{ErrorCode, ErrorExt, FeedError, Result};
use crate::normalize::{CleanedOrder, SalesownerAssignment};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Output file format
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// Format named by a file extension, if it is one we write
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// A row type with a fixed output schema
pub trait TableRow: Serialize {
    /// Column names, in field declaration order
    const COLUMNS: &'static [&'static str];

    /// Columns holding integers rather than text
    const INTEGER_COLUMNS: &'static [&'static str] = &[];
}

impl TableRow for CleanedOrder {
    const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "date",
        "company_id",
        "company_name",
        "crate_type",
        "contact_name",
        "contact_surname",
        "city",
        "cp",
    ];
}

impl TableRow for SalesownerAssignment {
    const COLUMNS: &'static [&'static str] = &["order_id", "salesowner", "salesowners_order"];
    const INTEGER_COLUMNS: &'static [&'static str] = &["salesowners_order"];
}

/// Render typed rows in the given format
pub fn render_table<T: TableRow>(rows: &[T], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(Vec::new());
            writer
                .write_record(T::COLUMNS)
                .map_err(serialization_error)?;
            for row in rows {
                writer.serialize(row).map_err(serialization_error)?;
            }
            writer.into_inner().map_err(|e| {
                FeedError::output_with_code(
                    ErrorCode::OUTPUT_SERIALIZATION_ERROR,
                    format!("failed to flush CSV buffer: {}", e),
                    None,
                )
            })
        }
        OutputFormat::Json => serde_json::to_vec_pretty(rows).map_err(serialization_error),
        OutputFormat::Parquet => {
            let records = rows.iter().map(to_record).collect::<Result<Vec<_>>>()?;
            let columns: Vec<String> = T::COLUMNS.iter().map(|c| c.to_string()).collect();
            let kinds: Vec<ColumnKind> = T::COLUMNS
                .iter()
                .map(|c| {
                    if T::INTEGER_COLUMNS.contains(c) {
                        ColumnKind::Integer
                    } else {
                        ColumnKind::Text
                    }
                })
                .collect();
            encode_parquet(&columns, &kinds, &records)
        }
    }
}

/// Render the invoice table in the given format
pub fn render_invoices(table: &InvoiceTable, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer
                .write_record(&table.columns)
                .map_err(serialization_error)?;
            for row in &table.rows {
                let cells: Vec<String> = table
                    .columns
                    .iter()
                    .map(|column| cell_text(row.get(column)))
                    .collect();
                writer.write_record(&cells).map_err(serialization_error)?;
            }
            writer.into_inner().map_err(|e| {
                FeedError::output_with_code(
                    ErrorCode::OUTPUT_SERIALIZATION_ERROR,
                    format!("failed to flush CSV buffer: {}", e),
                    None,
                )
            })
        }
        OutputFormat::Json => serde_json::to_vec_pretty(&table.rows).map_err(serialization_error),
        OutputFormat::Parquet => {
            let kinds: Vec<ColumnKind> = table
                .columns
                .iter()
                .map(|column| ColumnKind::infer(table.rows.iter().map(|row| row.get(column))))
                .collect();
            encode_parquet(&table.columns, &kinds, &table.rows)
        }
    }
}

/// Write typed rows to `path`, creating parent directories
pub async fn write_table<T: TableRow>(path: &Path, rows: &[T], format: OutputFormat) -> Result<()> {
    let bytes = render_table(rows, format).map_err(|e| e.with_path(path))?;
    write_bytes(path, &bytes).await?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the invoice table to `path`, creating parent directories
pub async fn write_invoices(path: &Path, table: &InvoiceTable, format: OutputFormat) -> Result<()> {
    let bytes = render_invoices(table, format).map_err(|e| e.with_path(path))?;
    write_bytes(path, &bytes).await?;
    info!("Wrote {} invoices to {}", table.len(), path.display());
    Ok(())
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .to_output_error(path, "failed to create output directory")?;
        }
    }
    debug!("Writing {} bytes to {}", bytes.len(), path.display());
    fs::write(path, bytes)
        .await
        .to_output_error(path, "failed to write output file")
}

fn to_record<T: Serialize>(row: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(row).map_err(serialization_error)? {
        Value::Object(map) => Ok(map),
        _ => Err(FeedError::output_with_code(
            ErrorCode::OUTPUT_SERIALIZATION_ERROR,
            "table row did not serialize to a record",
            None,
        )),
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn serialization_error(err: impl std::error::Error + Send + Sync + 'static) -> FeedError {
    FeedError::output_with_code(
        ErrorCode::OUTPUT_SERIALIZATION_ERROR,
        "failed to serialize table",
        None,
    )
    .with_source(err)
}

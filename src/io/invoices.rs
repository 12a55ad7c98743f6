//! Invoice document reader
//!
//! Invoices are a structural copy: the records under `data.invoices` are
//! carried through unchanged. The only check is that every record has the
//! same keys as the first one; a mismatch is reported, not fatal.

use crate::error::{common, ErrorExt, FeedError, Result};
use crate::report::{Diagnostic, Reporter, Stage};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// JSON pointer to the invoice array inside the document
pub const INVOICES_POINTER: &str = "/data/invoices";

/// Invoice records plus the column order used when writing them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceTable {
    /// Keys of the first record, then any keys first seen in later records
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl InvoiceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read and extract the invoice table from a JSON document on disk
pub async fn read_invoices(path: &Path, reporter: &dyn Reporter) -> Result<InvoiceTable> {
    if !path.exists() {
        return Err(common::input_not_found(path));
    }

    let data = fs::read_to_string(path)
        .await
        .to_input_error(path, "failed to read invoice file")?;
    let document: Value =
        serde_json::from_str(&data).map_err(|e| FeedError::from(e).with_path(path))?;

    let table = extract_invoices(&document, reporter).map_err(|e| e.with_path(path))?;
    info!("Invoice data loaded successfully from {}", path.display());
    Ok(table)
}

/// Pull `data.invoices` out of a parsed document
pub fn extract_invoices(document: &Value, reporter: &dyn Reporter) -> Result<InvoiceTable> {
    let items = document
        .pointer(INVOICES_POINTER)
        .and_then(Value::as_array)
        .ok_or_else(|| common::missing_section(None, "data.invoices"))?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => rows.push(map.clone()),
            _ => return Err(common::missing_section(None, "data.invoices")),
        }
    }

    let columns = check_key_consistency(&rows, reporter);
    reporter.report(Diagnostic::StageCompleted {
        stage: Stage::Invoices,
        rows: rows.len(),
    });

    Ok(InvoiceTable { columns, rows })
}

/// Report records whose key set differs from the first record's
///
/// Returns the column order: the first record's keys, then extras in
/// order of first appearance.
fn check_key_consistency(rows: &[Map<String, Value>], reporter: &dyn Reporter) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let reference: BTreeSet<&str> = first.keys().map(String::as_str).collect();
    let mut columns: Vec<String> = first.keys().cloned().collect();

    for (index, row) in rows.iter().enumerate().skip(1) {
        let keys: BTreeSet<&str> = row.keys().map(String::as_str).collect();
        if keys != reference {
            reporter.report(Diagnostic::InconsistentInvoiceKeys {
                index,
                expected: reference.iter().map(|k| k.to_string()).collect(),
                found: keys.iter().map(|k| k.to_string()).collect(),
            });
        }
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    columns
}

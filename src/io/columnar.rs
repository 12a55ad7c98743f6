//! Parquet encoding of output tables
//!
//! Every column is nullable. Typed tables declare their integer columns;
//! invoice columns are typed from the values they hold.

use crate::error::{ErrorCode, FeedError, Result};
use arrow_array::{ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Physical type of one output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl ColumnKind {
    fn data_type(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::Utf8,
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Boolean => DataType::Boolean,
        }
    }

    /// Narrowest kind that holds every non-null value of a column
    ///
    /// Integers widen to floats; any other mix, any string and any nested
    /// value make the column text. A column of nulls only is text.
    pub fn infer<'a>(values: impl IntoIterator<Item = Option<&'a Value>>) -> Self {
        let mut kind = None;

        for value in values.into_iter().flatten() {
            let next = match value {
                Value::Null => continue,
                Value::Bool(_) => ColumnKind::Boolean,
                Value::Number(n) if n.is_i64() => ColumnKind::Integer,
                Value::Number(_) => ColumnKind::Float,
                _ => return ColumnKind::Text,
            };
            kind = match (kind, next) {
                (None, next) => Some(next),
                (Some(current), next) if current == next => Some(current),
                (Some(ColumnKind::Integer), ColumnKind::Float)
                | (Some(ColumnKind::Float), ColumnKind::Integer) => Some(ColumnKind::Float),
                _ => return ColumnKind::Text,
            };
        }

        kind.unwrap_or(ColumnKind::Text)
    }
}

/// Encode records as one Parquet file with the given column layout
pub fn encode_parquet(
    columns: &[String],
    kinds: &[ColumnKind],
    rows: &[Map<String, Value>],
) -> Result<Vec<u8>> {
    let fields: Vec<Field> = columns
        .iter()
        .zip(kinds)
        .map(|(name, kind)| Field::new(name.as_str(), kind.data_type(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut writer = ArrowWriter::try_new(Vec::new(), schema.clone(), None).map_err(encode_error)?;

    if !rows.is_empty() {
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .zip(kinds)
            .map(|(name, kind)| build_column(*kind, name, rows))
            .collect();
        let batch = RecordBatch::try_new(schema, arrays).map_err(encode_error)?;
        writer.write(&batch).map_err(encode_error)?;
    }

    writer.into_inner().map_err(encode_error)
}

fn build_column(kind: ColumnKind, column: &str, rows: &[Map<String, Value>]) -> ArrayRef {
    let cells = rows
        .iter()
        .map(|row| row.get(column).filter(|value| !value.is_null()));

    match kind {
        ColumnKind::Text => Arc::new(
            cells
                .map(|cell| cell.map(text_of))
                .collect::<StringArray>(),
        ),
        ColumnKind::Integer => Arc::new(
            cells
                .map(|cell| cell.and_then(Value::as_i64))
                .collect::<Int64Array>(),
        ),
        ColumnKind::Float => Arc::new(
            cells
                .map(|cell| cell.and_then(Value::as_f64))
                .collect::<Float64Array>(),
        ),
        ColumnKind::Boolean => Arc::new(
            cells
                .map(|cell| cell.and_then(Value::as_bool))
                .collect::<BooleanArray>(),
        ),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode_error(err: impl std::error::Error + Send + Sync + 'static) -> FeedError {
    FeedError::output_with_code(
        ErrorCode::OUTPUT_SERIALIZATION_ERROR,
        "failed to encode Parquet table",
        None,
    )
    .with_source(err)
}

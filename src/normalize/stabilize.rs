//! Schema stabilization for raw order rows
//!
//! Every column is cast to canonical text and every absent cell becomes
//! [`NA_SENTINEL`], so later stages always see strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stand-in for "no value" in stabilized columns
pub const NA_SENTINEL: &str = "N/A";

/// Column names of the order table, in source order
pub const ORDER_COLUMNS: [&str; 7] = [
    "order_id",
    "date",
    "company_id",
    "company_name",
    "crate_type",
    "contact_data",
    "salesowners",
];

/// One order row as read from the source, cells still typed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrderRow {
    pub order_id: Value,
    pub date: Value,
    pub company_id: Value,
    pub company_name: Value,
    pub crate_type: Value,
    pub contact_data: Value,
    pub salesowners: Value,
}

/// One order row with every column as canonical text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: String,
    pub date: String,
    pub company_id: String,
    pub company_name: String,
    pub crate_type: String,
    pub contact_data: String,
    pub salesowners: String,
}

impl From<&RawOrderRow> for OrderRow {
    fn from(raw: &RawOrderRow) -> Self {
        Self {
            order_id: canonical_text(&raw.order_id),
            date: canonical_text(&raw.date),
            company_id: canonical_text(&raw.company_id),
            company_name: canonical_text(&raw.company_name),
            crate_type: canonical_text(&raw.crate_type),
            contact_data: canonical_text(&raw.contact_data),
            salesowners: canonical_text(&raw.salesowners),
        }
    }
}

/// Cast a typed cell to text, filling nulls with the sentinel
pub fn canonical_text(cell: &Value) -> String {
    match cell {
        Value::Null => NA_SENTINEL.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Stabilize a whole table, preserving row order
pub fn stabilize(rows: &[RawOrderRow]) -> Vec<OrderRow> {
    rows.iter().map(OrderRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_text_casts_scalars() {
        assert_eq!(canonical_text(&json!("abc")), "abc");
        assert_eq!(canonical_text(&json!(42)), "42");
        assert_eq!(canonical_text(&json!(1.5)), "1.5");
        assert_eq!(canonical_text(&json!(true)), "true");
        assert_eq!(canonical_text(&Value::Null), NA_SENTINEL);
    }

    #[test]
    fn test_canonical_text_keeps_empty_string() {
        // Only nulls are filled; an explicit empty string is a value
        assert_eq!(canonical_text(&json!("")), "");
    }

    #[test]
    fn test_nested_values_become_compact_json() {
        assert_eq!(canonical_text(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_missing_fields_deserialize_as_null_then_sentinel() {
        let raw: RawOrderRow = serde_json::from_value(json!({
            "order_id": "f47ac10b",
            "company_id": 1234,
        }))
        .unwrap();
        let row = OrderRow::from(&raw);

        assert_eq!(row.order_id, "f47ac10b");
        assert_eq!(row.company_id, "1234");
        assert_eq!(row.date, NA_SENTINEL);
        assert_eq!(row.contact_data, NA_SENTINEL);
        assert_eq!(row.salesowners, NA_SENTINEL);
    }

    #[test]
    fn test_stabilize_preserves_order_and_count() {
        let rows = vec![
            RawOrderRow {
                order_id: json!("b"),
                ..Default::default()
            },
            RawOrderRow {
                order_id: json!("a"),
                ..Default::default()
            },
        ];
        let stable = stabilize(&rows);
        assert_eq!(stable.len(), 2);
        assert_eq!(stable[0].order_id, "b");
        assert_eq!(stable[1].order_id, "a");
        assert_eq!(stable[1].crate_type, NA_SENTINEL);
    }
}

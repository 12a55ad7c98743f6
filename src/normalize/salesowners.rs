//! Fan-out of the delimited `salesowners` column
//!
//! Each order's salesowner list becomes one row per name, numbered from 1
//! in list order.

use super::stabilize::OrderRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator between names in the raw `salesowners` column
pub const SALESOWNER_DELIMITER: &str = ", ";

/// One salesowner of one order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesownerAssignment {
    pub order_id: String,
    pub salesowner: String,
    /// 1-based position of this name within the order's list
    pub salesowners_order: u32,
}

/// Split a raw `salesowners` value into names, in source order
///
/// A value without the delimiter (including the `N/A` sentinel) is a
/// one-element list.
pub fn split_salesowners(raw: &str) -> Vec<&str> {
    raw.split(SALESOWNER_DELIMITER).collect()
}

/// Expand every order into one assignment per salesowner
///
/// Numbering is a running count per `order_id`, so it restarts at 1 for
/// each order and `(order_id, salesowners_order)` stays unique even if an
/// order id occurs on more than one row.
pub fn fan_out_salesowners(orders: &[OrderRow]) -> Vec<SalesownerAssignment> {
    let mut next_position: HashMap<&str, u32> = HashMap::new();
    let mut assignments = Vec::with_capacity(orders.len());

    for order in orders {
        let counter = next_position.entry(order.order_id.as_str()).or_insert(0);
        for name in split_salesowners(&order.salesowners) {
            *counter += 1;
            assignments.push(SalesownerAssignment {
                order_id: order.order_id.clone(),
                salesowner: name.to_string(),
                salesowners_order: *counter,
            });
        }
    }

    assignments
}

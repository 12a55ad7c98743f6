//! Reattach parsed contact attributes to their order rows
//!
//! The join key is the raw `contact_data` string. Each key must map to
//! exactly one [`ContactRecord`]; otherwise an order row could be
//! multiplied. Row counts are compared before and after the join and any
//! difference is an integrity error for the `contact_join` stage.

use super::contact::ContactRecord;
use super::stabilize::OrderRow;
use crate::error::{ErrorCode, FeedError, Result};
use crate::report::{Diagnostic, Reporter, Stage};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Order row with raw contact and salesowner columns replaced by contact attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleanedOrder {
    pub order_id: String,
    pub date: String,
    pub company_id: String,
    pub company_name: String,
    pub crate_type: String,
    pub contact_name: Option<String>,
    pub contact_surname: Option<String>,
    pub city: Option<String>,
    pub cp: Option<String>,
}

impl CleanedOrder {
    fn from_parts(order: &OrderRow, contact: &ContactRecord) -> Self {
        Self {
            order_id: order.order_id.clone(),
            date: order.date.clone(),
            company_id: order.company_id.clone(),
            company_name: order.company_name.clone(),
            crate_type: order.crate_type.clone(),
            contact_name: contact.contact_name.clone(),
            contact_surname: contact.contact_surname.clone(),
            city: contact.city.clone(),
            cp: contact.cp.clone(),
        }
    }
}

/// Parsed contacts keyed by their raw string, one record per key
#[derive(Debug, Default)]
pub struct ContactIndex {
    by_raw: HashMap<String, ContactRecord>,
}

impl ContactIndex {
    /// Build the index from deduplicated contact records
    ///
    /// Fails if two different records claim the same raw string.
    pub fn build(records: Vec<ContactRecord>) -> Result<Self> {
        let mut by_raw: HashMap<String, ContactRecord> = HashMap::with_capacity(records.len());

        for record in records {
            match by_raw.entry(record.contact_data.clone()) {
                Entry::Occupied(existing) if *existing.get() == record => {}
                Entry::Occupied(_) => {
                    return Err(FeedError::integrity(
                        ErrorCode::INTEGRITY_DUPLICATE_JOIN_KEY,
                        Stage::ContactJoin.as_str(),
                        format!(
                            "raw contact value {:?} parsed to more than one record",
                            record.contact_data
                        ),
                    ));
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        Ok(Self { by_raw })
    }

    pub fn get(&self, raw: &str) -> Option<&ContactRecord> {
        self.by_raw.get(raw)
    }

    pub fn len(&self) -> usize {
        self.by_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_raw.is_empty()
    }
}

/// Inner-join orders with their contacts on the raw `contact_data` string
///
/// Unmatched orders are reported one by one before the row-count check
/// turns them into an integrity error.
pub fn join_contacts(
    orders: &[OrderRow],
    contacts: &ContactIndex,
    reporter: &dyn Reporter,
) -> Result<Vec<CleanedOrder>> {
    let mut joined = Vec::with_capacity(orders.len());

    for order in orders {
        match contacts.get(&order.contact_data) {
            Some(contact) => joined.push(CleanedOrder::from_parts(order, contact)),
            None => reporter.report(Diagnostic::UnmatchedContact {
                order_id: order.order_id.clone(),
                contact_data: order.contact_data.clone(),
            }),
        }
    }

    debug!(
        "Joined {} of {} order rows against {} contacts",
        joined.len(),
        orders.len(),
        contacts.len()
    );

    verify_row_count(Stage::ContactJoin, orders.len(), joined.len())?;
    Ok(joined)
}

/// Fail unless a stage produced exactly as many rows as it consumed
pub fn verify_row_count(stage: Stage, expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(FeedError::integrity(
            ErrorCode::INTEGRITY_ROWS_LOST,
            stage.as_str(),
            format!("{} of {} rows were lost", expected - actual, expected),
        ));
    }
    if actual > expected {
        return Err(FeedError::integrity(
            ErrorCode::INTEGRITY_ROWS_DUPLICATED,
            stage.as_str(),
            format!("expected {} rows but produced {}", expected, actual),
        ));
    }
    Ok(())
}

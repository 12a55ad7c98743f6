//! Record normalization and fan-out engine
//!
//! Turns raw order rows into two relational tables:
//! - cleaned orders, with the embedded contact string expanded into columns
//! - salesowner assignments, one row per name in each order's list
//!
//! Stage order: stabilize, dedup orders, parse each distinct contact string
//! once, dedup contact records, join on the raw contact string (with a
//! row-count check), and fan out salesowners from the deduplicated rows.

pub mod contact;
pub mod dedup;
pub mod join;
pub mod salesowners;
pub mod stabilize;

pub use contact::{is_sentinel, parse_contact_data, ContactRecord, CONTACT_SENTINELS};
pub use dedup::dedup_rows;
pub use join::{join_contacts, verify_row_count, CleanedOrder, ContactIndex};
pub use salesowners::{
    fan_out_salesowners, split_salesowners, SalesownerAssignment, SALESOWNER_DELIMITER,
};
pub use stabilize::{canonical_text, stabilize, OrderRow, RawOrderRow, NA_SENTINEL, ORDER_COLUMNS};

use crate::error::Result;
use crate::report::{Diagnostic, Reporter, Stage};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Output of one normalization run
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOrders {
    pub orders: Vec<CleanedOrder>,
    pub salesowners: Vec<SalesownerAssignment>,
    pub stats: NormalizeStats,
}

/// Row counts gathered while normalizing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub rows_after_dedup: usize,
    pub distinct_contacts: usize,
    pub empty_contacts: usize,
    /// Distinct non-sentinel contact strings that yielded no mapping
    pub unparsed_contacts: usize,
    pub cleaned_orders: usize,
    pub salesowner_rows: usize,
}

/// Runs the normalization stages against an injected reporter
pub struct Normalizer<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> Normalizer<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Normalize a complete raw order table
    pub fn run(&self, raw: &[RawOrderRow]) -> Result<NormalizedOrders> {
        let stable = stabilize(raw);
        self.stage_done(Stage::Stabilize, stable.len());

        let orders = dedup_rows(stable);
        self.stage_done(Stage::DedupOrders, orders.len());
        debug!("Collapsed {} duplicate order rows", raw.len() - orders.len());

        let parsed = self.parse_contacts(&orders);
        self.stage_done(Stage::ParseContacts, parsed.len());

        let contacts = dedup_rows(parsed);
        self.stage_done(Stage::DedupContacts, contacts.len());
        let distinct_contacts = contacts.len();
        let empty_contacts = contacts.iter().filter(|c| c.is_empty()).count();
        let unparsed_contacts = contacts
            .iter()
            .filter(|c| c.is_empty() && !is_sentinel(&c.contact_data))
            .count();

        let index = ContactIndex::build(contacts)?;
        let cleaned = join_contacts(&orders, &index, self.reporter)?;
        self.stage_done(Stage::ContactJoin, cleaned.len());

        let salesowners = fan_out_salesowners(&orders);
        self.stage_done(Stage::SalesownerFanOut, salesowners.len());

        let stats = NormalizeStats {
            rows_read: raw.len(),
            rows_after_dedup: orders.len(),
            distinct_contacts,
            empty_contacts,
            unparsed_contacts,
            cleaned_orders: cleaned.len(),
            salesowner_rows: salesowners.len(),
        };

        Ok(NormalizedOrders {
            orders: cleaned,
            salesowners,
            stats,
        })
    }

    /// Parse contacts in row order, once per distinct raw string
    fn parse_contacts(&self, orders: &[OrderRow]) -> Vec<ContactRecord> {
        let mut memo: HashMap<&str, ContactRecord> = HashMap::new();
        let mut parsed = Vec::with_capacity(orders.len());

        for order in orders {
            let record = memo
                .entry(order.contact_data.as_str())
                .or_insert_with(|| parse_contact_data(&order.contact_data, self.reporter));
            parsed.push(record.clone());
        }

        parsed
    }

    fn stage_done(&self, stage: Stage, rows: usize) {
        self.reporter.report(Diagnostic::StageCompleted { stage, rows });
    }
}

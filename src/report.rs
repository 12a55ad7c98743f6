//! Diagnostic reporting for pipeline runs
//!
//! Stages never log directly. They hand a [`Diagnostic`] to whatever
//! [`Reporter`] the caller injected, so a run carries no process-wide
//! logging lifecycle of its own.

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Pipeline stage names used in diagnostics and integrity errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Stabilize,
    DedupOrders,
    ParseContacts,
    DedupContacts,
    ContactJoin,
    SalesownerFanOut,
    Invoices,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Stabilize => "stabilize",
            Stage::DedupOrders => "dedup_orders",
            Stage::ParseContacts => "parse_contacts",
            Stage::DedupContacts => "dedup_contacts",
            Stage::ContactJoin => "contact_join",
            Stage::SalesownerFanOut => "salesowner_fan_out",
            Stage::Invoices => "invoices",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a stage wants the operator to know about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The raw contact string could not be decoded at all
    ContactParseFailed { entry: String, reason: String },
    /// The raw contact string decoded, but not to a key-value mapping
    ContactNotObject { entry: String },
    /// An order row found no parsed contact for its raw string
    UnmatchedContact {
        order_id: String,
        contact_data: String,
    },
    /// An invoice does not share the key set of the first invoice
    InconsistentInvoiceKeys {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// A stage finished and produced `rows` rows
    StageCompleted { stage: Stage, rows: usize },
}

/// Sink for pipeline diagnostics
pub trait Reporter: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default reporter: forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::ContactParseFailed { entry, reason } => {
                error!("Error parsing contact entry: {}. Error: {}", entry, reason);
            }
            Diagnostic::ContactNotObject { entry } => {
                warn!(
                    "Parsed contact entry is not a mapping, using empty contact: {}",
                    entry
                );
            }
            Diagnostic::UnmatchedContact {
                order_id,
                contact_data,
            } => {
                error!(
                    "Order {} has no parsed contact for raw value {:?}",
                    order_id, contact_data
                );
            }
            Diagnostic::InconsistentInvoiceKeys {
                index,
                expected,
                found,
            } => {
                error!(
                    "Invoice {} has keys {:?}, expected {:?}",
                    index, found, expected
                );
            }
            Diagnostic::StageCompleted { stage, rows } => {
                info!(stage = %stage, rows, "Stage completed");
            }
        }
    }
}

/// Reporter that keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.diagnostics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Count diagnostics matching a predicate
    pub fn count(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
        self.diagnostics().iter().filter(|d| predicate(d)).count()
    }

    /// Rows reported for a completed stage
    pub fn rows_for(&self, stage: Stage) -> Option<usize> {
        self.diagnostics().iter().rev().find_map(|d| match d {
            Diagnostic::StageCompleted { stage: s, rows } if *s == stage => Some(*rows),
            _ => None,
        })
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, diagnostic: Diagnostic) {
        debug!(?diagnostic, "Recording diagnostic");
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

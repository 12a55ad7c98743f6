//! Tolerant parser for the embedded `contact_data` field
//!
//! Contact data arrives as a Python-repr style string: a JSON-like object
//! written with single quotes, sometimes wrapped in a one-element list, or a
//! sentinel meaning "no contact". Every input yields a [`ContactRecord`];
//! decoding problems are reported and resolved to the empty record.

use crate::report::{Diagnostic, Reporter};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// Raw values that mean "no contact"
pub const CONTACT_SENTINELS: [&str; 3] = ["N/A", "0", ""];

/// Contact attributes recovered from one raw `contact_data` string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactRecord {
    /// The raw string this record was parsed from; the join key
    pub contact_data: String,
    pub contact_name: Option<String>,
    pub contact_surname: Option<String>,
    pub city: Option<String>,
    pub cp: Option<String>,
}

impl ContactRecord {
    /// Record with every derived attribute absent
    pub fn empty(entry: impl Into<String>) -> Self {
        Self {
            contact_data: entry.into(),
            contact_name: None,
            contact_surname: None,
            city: None,
            cp: None,
        }
    }

    /// True when none of the four derived attributes carries a value
    pub fn is_empty(&self) -> bool {
        self.contact_name.is_none()
            && self.contact_surname.is_none()
            && self.city.is_none()
            && self.cp.is_none()
    }

    fn from_mapping(entry: &str, mapping: &Map<String, Value>) -> Self {
        Self {
            contact_data: entry.to_string(),
            contact_name: field_text(mapping, "contact_name"),
            contact_surname: field_text(mapping, "contact_surname"),
            city: field_text(mapping, "city"),
            cp: field_text(mapping, "cp"),
        }
    }
}

/// Whether `entry` is one of the "no contact" sentinels
pub fn is_sentinel(entry: &str) -> bool {
    CONTACT_SENTINELS.contains(&entry)
}

/// Parse one raw `contact_data` value
///
/// Never fails: malformed text and non-mapping values produce
/// [`ContactRecord::empty`] and a diagnostic, missing keys leave just that
/// attribute absent. The result depends only on `entry`.
pub fn parse_contact_data(entry: &str, reporter: &dyn Reporter) -> ContactRecord {
    trace!("Processing contact entry: {}", entry);

    if is_sentinel(entry) {
        trace!("Contact entry is a sentinel: {:?}", entry);
        return ContactRecord::empty(entry);
    }

    let normalized = entry.replace('\'', "\"");
    let parsed = serde_json::from_str::<Value>(&normalized).or_else(|err| {
        match null_non_finite(&normalized) {
            Some(patched) => serde_json::from_str(&patched),
            None => Err(err),
        }
    });
    let decoded = match parsed {
        Ok(value) => value,
        Err(e) => {
            reporter.report(Diagnostic::ContactParseFailed {
                entry: entry.to_string(),
                reason: e.to_string(),
            });
            return ContactRecord::empty(entry);
        }
    };

    let candidate = match decoded {
        Value::Array(items) if !items.is_empty() => items.into_iter().next(),
        other => Some(other),
    };

    match candidate {
        Some(Value::Object(mapping)) => {
            trace!("Parsed contact mapping with {} keys", mapping.len());
            ContactRecord::from_mapping(entry, &mapping)
        }
        _ => {
            reporter.report(Diagnostic::ContactNotObject {
                entry: entry.to_string(),
            });
            ContactRecord::empty(entry)
        }
    }
}

/// Replace the bare `NaN`, `Infinity` and `-Infinity` literals that Python
/// emits for non-finite floats with `null`, leaving string contents alone
///
/// Returns `None` when there was nothing to replace.
fn null_non_finite(text: &str) -> Option<String> {
    const LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    let mut out = String::with_capacity(text.len());
    let mut replaced = false;
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(literal) = LITERALS.iter().find(|l| rest.starts_with(**l)) {
            out.push_str("null");
            rest = &rest[literal.len()..];
            replaced = true;
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    replaced.then_some(out)
}

/// Canonical text for a looked-up key; JSON `null` and a missing key are absence
fn field_text(mapping: &Map<String, Value>, key: &str) -> Option<String> {
    match mapping.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

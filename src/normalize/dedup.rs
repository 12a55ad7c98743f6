//! Exact-duplicate row removal

use std::collections::HashSet;
use std::hash::Hash;

/// Remove rows that are equal across all columns
///
/// Keeps the first occurrence of each row and preserves first-seen order.
/// Applying it to its own output is a no-op.
pub fn dedup_rows<T>(rows: Vec<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::with_capacity(rows.len());
    let mut result = Vec::with_capacity(rows.len());

    for row in rows {
        if seen.insert(row.clone()) {
            result.push(row);
        }
    }

    result
}

//! Key-sorted copies of flat records.
//!
//! Records keep insertion order, so two records with the same entries can
//! serialize differently. Canonicalizing first makes them compare, hash and
//! serialize identically, which is what memoization keys need.

use serde_json::{Map, Value};

/// A flat JSON record in insertion order.
pub type Record = Map<String, Value>;

/// Copy `record` with its keys sorted by codepoint.
///
/// `None` (the absence value) passes through unchanged. Nested values are
/// copied as-is; only the top level is reordered.
pub fn canonicalize(record: Option<&Record>) -> Option<Record> {
    let record = record?;
    let mut entries: Vec<(&String, &Value)> = record.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    Some(
        entries
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

/// Stable string form of a record, for use as a memo key.
pub fn canonical_string(record: &Record) -> String {
    canonicalize(Some(record))
        .map(|sorted| Value::Object(sorted).to_string())
        .unwrap_or_default()
}

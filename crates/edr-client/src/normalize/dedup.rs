//! Feature deduplication by a caller-chosen property.

use std::collections::HashSet;

use edr_protocol::{Feature, Location};
use serde_json::{Number, Value};

/// Anything with a named property bag.
pub trait HasProperties {
    fn property(&self, name: &str) -> Option<&Value>;
}

impl HasProperties for Feature {
    fn property(&self, name: &str) -> Option<&Value> {
        Feature::property(self, name)
    }
}

impl HasProperties for Location {
    fn property(&self, name: &str) -> Option<&Value> {
        Location::property(self, name)
    }
}

/// Hashable form of scalar property values.
///
/// Equality is exactly `Value` equality: `1` and `1.0` stay distinct while
/// `0.0` and `-0.0` are one key.
#[derive(Debug, PartialEq, Eq, Hash)]
enum ScalarKey<'a> {
    Absent,
    Null,
    Bool(bool),
    Number(&'a Number),
    String(&'a str),
}

/// Keep the first item for each distinct value of `property`.
///
/// Order of first occurrences is preserved. Items lacking the property
/// all share one identity, so at most one of them survives. The input is
/// not modified.
pub fn unique_by<T: HasProperties + Clone>(features: &[T], property: &str) -> Vec<T> {
    let mut seen_scalars: HashSet<ScalarKey<'_>> = HashSet::new();
    let mut seen_composites: Vec<&Value> = Vec::new();
    let mut unique = Vec::new();

    for feature in features {
        let first = match feature.property(property) {
            None => seen_scalars.insert(ScalarKey::Absent),
            Some(Value::Null) => seen_scalars.insert(ScalarKey::Null),
            Some(Value::Bool(b)) => seen_scalars.insert(ScalarKey::Bool(*b)),
            Some(Value::Number(n)) => seen_scalars.insert(ScalarKey::Number(n)),
            Some(Value::String(s)) => seen_scalars.insert(ScalarKey::String(s)),
            Some(composite) => {
                if seen_composites.contains(&composite) {
                    false
                } else {
                    seen_composites.push(composite);
                    true
                }
            }
        };

        if first {
            unique.push(feature.clone());
        }
    }

    unique
}

//! Grouping of location identifiers by collection or by map layer.
//!
//! Both keys are in use: newer map code groups by collection, older layer
//! code still groups by layer id. Which one applies is the caller's choice
//! ([`GroupingKey`]); neither supersedes the other.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use edr_protocol::{Identifier, Location};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// What to group locations by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingKey {
    /// The owning collection id.
    #[default]
    Collection,
    /// The map layer id (legacy).
    Layer,
}

impl FromStr for GroupingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collection" => Ok(GroupingKey::Collection),
            "layer" => Ok(GroupingKey::Layer),
            other => Err(format!("unknown grouping key '{}' (expected collection or layer)", other)),
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingKey::Collection => f.write_str("collection"),
            GroupingKey::Layer => f.write_str("layer"),
        }
    }
}

/// Identifiers grouped under string keys, keys in first-seen order.
///
/// Serializes as a JSON object whose members follow that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationGroups {
    entries: Vec<(String, Vec<Identifier>)>,
    index: HashMap<String, usize>,
}

impl LocationGroups {
    /// Empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to the list under `key`, creating it on first use.
    pub fn push(&mut self, key: &str, id: Identifier) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1.push(id),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), vec![id]));
            }
        }
    }

    /// Identifiers under `key`.
    pub fn get(&self, key: &str) -> Option<&[Identifier]> {
        self.index.get(key).map(|&i| self.entries[i].1.as_slice())
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, ids)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Identifier])> {
        self.entries.iter().map(|(k, ids)| (k.as_str(), ids.as_slice()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LocationGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, ids) in &self.entries {
            map.serialize_entry(key, ids)?;
        }
        map.end()
    }
}

/// Group location ids by the chosen key, preserving input order.
///
/// Locations without a layer id are left out of layer grouping.
pub fn group_locations(locations: &[Location], key: GroupingKey) -> LocationGroups {
    let mut groups = LocationGroups::new();
    for location in locations {
        let group = match key {
            GroupingKey::Collection => Some(location.collection_id.as_str()),
            GroupingKey::Layer => location.layer_id.as_deref(),
        };
        if let Some(group) = group {
            groups.push(group, location.id.clone());
        }
    }
    groups
}

/// Group location ids by collection id.
pub fn group_by_collection(locations: &[Location]) -> LocationGroups {
    group_locations(locations, GroupingKey::Collection)
}

/// Group location ids by layer id.
pub fn group_by_layer(locations: &[Location]) -> LocationGroups {
    group_locations(locations, GroupingKey::Layer)
}

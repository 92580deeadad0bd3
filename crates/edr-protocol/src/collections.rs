//! EDR collection metadata and temporal extent extraction.
//!
//! Collections describe the datasets a server exposes. The map front end
//! mostly cares about two things here: the label shown to users and the
//! usable time window, which drives the time slider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::EdrError;
use crate::pagination::Paged;
use crate::parameters::Parameter;
use crate::types::{Extent, Link};

/// Response of `GET /collections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionList {
    /// Links to related resources (may include `next`).
    #[serde(default)]
    pub links: Vec<Link>,

    /// The collections on this page.
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl CollectionList {
    /// Find a collection by identifier.
    pub fn find(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }
}

impl Paged for CollectionList {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

/// An EDR collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    /// Unique identifier.
    pub id: String,

    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Discovery keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Declared spatial/temporal/vertical extent. An extent that does not
    /// decode is dropped rather than failing the collection.
    #[serde(
        default,
        deserialize_with = "crate::types::lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub extent: Option<Extent>,

    /// Query types offered by the collection, kept as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_queries: Option<HashMap<String, serde_json::Value>>,

    /// Supported coordinate reference systems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Vec<String>>,

    /// Supported output formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_formats: Option<Vec<String>>,

    /// Parameters available in this collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_names: Option<HashMap<String, Parameter>>,
}

impl Collection {
    /// Create a collection with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            keywords: None,
            links: Vec::new(),
            extent: None,
            data_queries: None,
            crs: None,
            output_formats: None,
            parameter_names: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the extent.
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// The label to show for this collection, falling back to its id.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Names of the parameters the collection declares, sorted.
    pub fn parameter_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .parameter_names
            .as_ref()
            .map(|params| params.keys().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// The usable temporal range, if any. See [`temporal_extent`].
    pub fn temporal_extent(&self) -> Option<TemporalRange> {
        temporal_extent(self)
    }
}

/// A usable temporal range: the two bounds of a collection's single interval.
///
/// Bounds are the raw values the server declared; `null` marks an open end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalRange {
    /// Start bound.
    pub min: Value,
    /// End bound.
    pub max: Value,
}

impl TemporalRange {
    /// Start bound as text, if it is a string.
    pub fn min_str(&self) -> Option<&str> {
        self.min.as_str()
    }

    /// End bound as text, if it is a string.
    pub fn max_str(&self) -> Option<&str> {
        self.max.as_str()
    }

    /// Parse both bounds as RFC 3339 timestamps.
    ///
    /// Open bounds stay `None`. Extraction never does this itself; it is for
    /// consumers that need real times.
    pub fn parse(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), EdrError> {
        Ok((parse_bound(&self.min)?, parse_bound(&self.max)?))
    }
}

fn parse_bound(bound: &Value) -> Result<Option<DateTime<Utc>>, EdrError> {
    match bound {
        Value::Null => Ok(None),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| EdrError::InvalidTimestamp(format!("{}: {}", s, e))),
        other => Err(EdrError::InvalidTimestamp(other.to_string())),
    }
}

/// Extract the usable temporal range of a collection.
///
/// Returns `None` unless the extent declares exactly one interval array with
/// exactly two bounds. Bounds are returned verbatim; any other shape means
/// "no usable extent", not an error.
pub fn temporal_extent(collection: &Collection) -> Option<TemporalRange> {
    let temporal = collection.extent.as_ref()?.temporal.as_ref()?;
    match temporal.interval.as_slice() {
        [Value::Array(bounds)] => match bounds.as_slice() {
            [min, max] => Some(TemporalRange {
                min: min.clone(),
                max: max.clone(),
            }),
            _ => None,
        },
        _ => None,
    }
}

//! Shared building blocks of EDR payloads: links, extents and identifiers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Relation label that marks the link to the following page.
pub const REL_NEXT: &str = "next";

/// A hyperlink descriptor as found in `links` arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// Target address, absolute or relative to the API root.
    pub href: String,

    /// Relation label (e.g. "self", "next", "data").
    pub rel: String,

    /// Media type of the target.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Whether `href` is a URI template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,

    /// Language of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

impl Link {
    /// Create a link from its two required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            type_: None,
            title: None,
            templated: None,
            hreflang: None,
        }
    }

    /// Create a `rel="next"` link.
    pub fn next(href: impl Into<String>) -> Self {
        Self::new(href, REL_NEXT)
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// True if this link points at the following page.
    pub fn is_next(&self) -> bool {
        self.rel == REL_NEXT
    }
}

/// Identifier of a feature or location.
///
/// Servers emit either JSON strings or numbers; the two never compare equal
/// (`"1"` and `1` are different identities). Numbers are kept as received,
/// so fractional ids and ids beyond `i64` survive decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric identifier.
    Number(Number),
    /// String identifier.
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Number(value.into())
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Number(value.into())
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Number(value.into())
    }
}

impl From<Number> for Identifier {
    fn from(value: Number) -> Self {
        Identifier::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// The declared spatial, temporal and vertical extent of a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    /// Spatial extent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialExtent>,

    /// Temporal extent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalExtent>,

    /// Vertical extent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalExtent>,
}

impl Extent {
    /// Create an empty extent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the temporal extent (builder pattern).
    pub fn with_temporal(mut self, temporal: TemporalExtent) -> Self {
        self.temporal = Some(temporal);
        self
    }

    /// Set the spatial extent from a single bounding box (builder pattern).
    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.spatial = Some(SpatialExtent {
            bbox: vec![Value::from(bbox.to_vec())],
            crs: None,
        });
        self
    }
}

/// Decode a list member as raw values; anything but an array becomes empty.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Decode an optional member, treating a body that does not fit `T` as absent.
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Spatial extent as one or more bounding boxes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpatialExtent {
    /// Boxes as `[west, south, east, north]` (or 6 values with heights),
    /// kept as received.
    #[serde(default, deserialize_with = "lenient_list")]
    pub bbox: Vec<Value>,

    /// Coordinate reference system, CRS:84 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
}

/// Temporal extent as declared by the server.
///
/// `interval` is kept exactly as received, whatever its shape. Only a single
/// interval with two bounds is considered usable; see
/// [`crate::collections::temporal_extent`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporalExtent {
    /// `[start, end]` pairs; `null` marks an open bound.
    #[serde(default, deserialize_with = "lenient_list")]
    pub interval: Vec<Value>,

    /// Discrete time values, if the server lists them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,

    /// Temporal reference system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trs: Option<String>,
}

impl TemporalExtent {
    /// A temporal extent with one `[start, end]` interval.
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self::from_intervals(vec![Value::from(vec![Value::from(start), Value::from(end)])])
    }

    /// A temporal extent with arbitrary interval values, as a server may send them.
    pub fn from_intervals(interval: Vec<Value>) -> Self {
        Self {
            interval,
            values: None,
            trs: None,
        }
    }
}

/// Vertical extent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerticalExtent {
    /// Level intervals.
    #[serde(default, deserialize_with = "lenient_list")]
    pub interval: Vec<Value>,

    /// Vertical reference system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrs: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_deserialization_ignores_unknown_fields() {
        let json = r#"{"href":"https://edr.example/collections?offset=10","rel":"next","type":"application/json","length":120}"#;
        let link: Link = serde_json::from_str(json).unwrap();
        assert_eq!(link.href, "https://edr.example/collections?offset=10");
        assert!(link.is_next());
        assert_eq!(link.type_, Some("application/json".to_string()));
    }

    #[test]
    fn test_link_serialization_skips_empty_fields() {
        let json = serde_json::to_string(&Link::next("http://example.com/p2")).unwrap();
        assert!(json.contains("\"rel\":\"next\""));
        assert!(!json.contains("\"title\""));
        assert!(!json.contains("\"templated\""));
    }

    #[test]
    fn test_identifier_variants() {
        let ids: Vec<Identifier> = serde_json::from_str(r#"[1, "1", "KJFK"]"#).unwrap();
        assert_eq!(ids[0], Identifier::from(1));
        assert_eq!(ids[1], Identifier::Text("1".to_string()));
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[2].to_string(), "KJFK");
        assert_eq!(serde_json::to_string(&ids[0]).unwrap(), "1");
    }

    #[test]
    fn test_temporal_extent_with_open_bound() {
        let json = r#"{"interval":[["2020-01-01T00:00:00Z",null]],"trs":"Gregorian"}"#;
        let temporal: TemporalExtent = serde_json::from_str(json).unwrap();
        assert_eq!(temporal.interval.len(), 1);
        assert_eq!(temporal.interval[0][1], Value::Null);
        assert_eq!(temporal.trs.as_deref(), Some("Gregorian"));
    }

    #[test]
    fn test_extent_missing_members() {
        let extent: Extent = serde_json::from_str(r#"{"spatial":{"bbox":[[-180,-90,180,90]]}}"#).unwrap();
        assert!(extent.temporal.is_none());
        assert_eq!(extent.spatial.unwrap().bbox[0].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_identifier_non_integer_numbers() {
        let ids: Vec<Identifier> = serde_json::from_str("[1.5, 18446744073709551615, -3]").unwrap();
        assert_eq!(ids[0].to_string(), "1.5");
        assert_eq!(ids[1], Identifier::from(u64::MAX));
        assert_eq!(ids[1].to_string(), "18446744073709551615");
        assert_eq!(ids[2], Identifier::from(-3));
        assert_eq!(serde_json::to_string(&ids[0]).unwrap(), "1.5");
    }

    #[test]
    fn test_temporal_extent_keeps_odd_shapes() {
        let flat: TemporalExtent = serde_json::from_str(r#"{"interval":["2020-01-01","2021-01-01"]}"#).unwrap();
        assert_eq!(flat.interval, vec![Value::from("2020-01-01"), Value::from("2021-01-01")]);

        let numeric: TemporalExtent = serde_json::from_str(r#"{"interval":[[2020,2021]],"values":[2020]}"#).unwrap();
        assert_eq!(numeric.interval[0][0], Value::from(2020));

        let scalar: TemporalExtent = serde_json::from_str(r#"{"interval":"2020/2021"}"#).unwrap();
        assert!(scalar.interval.is_empty());
    }

    #[test]
    fn test_flat_bbox_decodes() {
        let spatial: SpatialExtent = serde_json::from_str(r#"{"bbox":[-180,-90,180,90]}"#).unwrap();
        assert_eq!(spatial.bbox.len(), 4);
    }
}

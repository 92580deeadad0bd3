//! GeoJSON features and the paged feature collections EDR servers return.
//!
//! `ExtendedFeatureCollection` is a standard FeatureCollection plus the
//! optional `links` array (and OGC API paging counters) used to chain pages.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::pagination::Paged;
use crate::types::{Identifier, Link};

/// Property bag of a feature.
pub type Properties = Map<String, Value>;

/// A FeatureCollection page, optionally linked to the following page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtendedFeatureCollection {
    /// Always "FeatureCollection".
    #[serde(rename = "type")]
    pub type_: String,

    /// Features on this page, in server order.
    #[serde(default)]
    pub features: Vec<Feature>,

    /// Hyperlinks; a `rel="next"` entry addresses the following page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,

    /// Total number of matching features, if the server reports it.
    #[serde(rename = "numberMatched", default, skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,

    /// Number of features on this page, if the server reports it.
    #[serde(rename = "numberReturned", default, skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,

    /// Response timestamp.
    #[serde(rename = "timeStamp", default, skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
}

impl ExtendedFeatureCollection {
    /// An empty collection with no links.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
            links: None,
            number_matched: None,
            number_returned: None,
            time_stamp: None,
        }
    }

    /// Add features.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    /// Set the links.
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links);
        self
    }
}

impl Default for ExtendedFeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl Paged for ExtendedFeatureCollection {
    fn links(&self) -> &[Link] {
        self.links.as_deref().unwrap_or(&[])
    }
}

/// A GeoJSON feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Always "Feature".
    #[serde(rename = "type", default = "feature_type_tag")]
    pub type_: String,

    /// Feature identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,

    /// Geometry; `null` is allowed by GeoJSON.
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Property bag; a `null` bag decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

fn feature_type_tag() -> String {
    "Feature".to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    /// A point feature with no properties.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            type_: feature_type_tag(),
            id: None,
            geometry: Some(Geometry::Point {
                coordinates: vec![lon, lat],
            }),
            properties: Properties::new(),
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set one property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Read a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A position: `[lon, lat]` or `[lon, lat, height]`.
pub type Position = Vec<f64>;

/// GeoJSON geometries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// `(lon, lat)` of a point geometry.
    pub fn as_point(&self) -> Option<(f64, f64)> {
        match self {
            Geometry::Point { coordinates } if coordinates.len() >= 2 => {
                Some((coordinates[0], coordinates[1]))
            }
            _ => None,
        }
    }
}

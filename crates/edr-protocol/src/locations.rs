//! Location records built from `/collections/{id}/locations` features.
//!
//! A location belongs to exactly one collection and, for map layers, to one
//! layer. Its identity is the pair `(collection_id, id)`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EdrError;
use crate::geojson::{Feature, Geometry, Properties};
use crate::types::Identifier;

/// A named location of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Identifier within the collection.
    pub id: Identifier,

    /// Owning collection.
    pub collection_id: String,

    /// Map layer the location is drawn on, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,

    /// Geometry of the source feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    /// Feature properties.
    #[serde(default)]
    pub properties: Properties,
}

impl Location {
    /// A location with no layer, geometry or properties.
    pub fn new(id: impl Into<Identifier>, collection_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection_id: collection_id.into(),
            layer_id: None,
            geometry: None,
            properties: Properties::new(),
        }
    }

    /// Assign a layer.
    pub fn with_layer(mut self, layer_id: impl Into<String>) -> Self {
        self.layer_id = Some(layer_id.into());
        self
    }

    /// Set one property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Convert a location feature, tagging it with its collection and layer.
    ///
    /// A feature without an `id` cannot be addressed later and is rejected.
    pub fn from_feature(
        feature: Feature,
        collection_id: &str,
        layer_id: Option<&str>,
    ) -> Result<Self, EdrError> {
        let id = feature
            .id
            .ok_or_else(|| EdrError::MissingIdentifier(collection_id.to_string()))?;

        Ok(Self {
            id,
            collection_id: collection_id.to_string(),
            layer_id: layer_id.map(str::to_string),
            geometry: feature.geometry,
            properties: feature.properties,
        })
    }

    /// Display name: the `name` property, else the identifier.
    pub fn label(&self) -> String {
        match self.properties.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => self.id.to_string(),
        }
    }

    /// Read a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Identity key `(collection_id, id)`.
    pub fn key(&self) -> (&str, &Identifier) {
        (&self.collection_id, &self.id)
    }
}

/// Convert a page sequence of features into locations, preserving order.
pub fn locations_from_features(
    features: Vec<Feature>,
    collection_id: &str,
    layer_id: Option<&str>,
) -> Result<Vec<Location>, EdrError> {
    features
        .into_iter()
        .map(|f| Location::from_feature(f, collection_id, layer_id))
        .collect()
}

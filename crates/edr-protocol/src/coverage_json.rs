//! CoverageJSON documents returned by EDR data queries.
//!
//! A `Coverage` carries one domain plus parameter-valued ranges; a
//! `CoverageCollection` is an ordered list of coverages sharing a domain
//! family and, on paged servers, a `links` array.
//!
//! See: <https://covjson.org/>

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::pagination::Paged;
use crate::parameters::Parameter;
use crate::types::Link;

/// Document type tag of a CoverageJSON document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CoverageType {
    /// Single coverage.
    Coverage,
    /// Collection of coverages.
    CoverageCollection,
}

/// A single CoverageJSON coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageJson {
    /// Always `Coverage`.
    #[serde(rename = "type")]
    pub type_: CoverageType,

    /// Spatial/temporal domain of the values.
    pub domain: Domain,

    /// Parameter definitions keyed by parameter id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<HashMap<String, Parameter>>,

    /// Value arrays keyed by parameter id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<HashMap<String, NdArray>>,
}

impl CoverageJson {
    /// A coverage over `domain` with no parameters yet.
    pub fn new(domain: Domain) -> Self {
        Self {
            type_: CoverageType::Coverage,
            domain,
            parameters: Some(HashMap::new()),
            ranges: Some(HashMap::new()),
        }
    }

    /// Add a parameter and its values.
    pub fn with_range(mut self, name: &str, param: Parameter, values: Vec<Option<f64>>) -> Self {
        self.parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), param);
        self.ranges
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), NdArray::new(values));
        self
    }

    /// Parameter ids present in `ranges`, sorted.
    pub fn parameter_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .ranges
            .as_ref()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Values of the `t` axis, if it is an explicit list of timestamps.
    pub fn time_values(&self) -> Vec<&str> {
        match self.domain.axes.get("t") {
            Some(Axis::Values { values }) => values.iter().filter_map(AxisValue::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Pair each timestamp with the parameter's value, for time-series charts.
    ///
    /// Returns `None` when the parameter has no range. Extra values beyond
    /// the time axis are dropped; missing values read as `None`.
    pub fn time_series(&self, parameter: &str) -> Option<Vec<(String, Option<f64>)>> {
        let range = self.ranges.as_ref()?.get(parameter)?;
        Some(
            self.time_values()
                .into_iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), range.values.get(i).copied().flatten()))
                .collect(),
        )
    }
}

/// An ordered collection of coverages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageCollection {
    /// Always `CoverageCollection`.
    #[serde(rename = "type")]
    pub type_: CoverageType,

    /// Domain type shared by the members, if declared once.
    #[serde(rename = "domainType", default, skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<DomainType>,

    /// Member coverages, in server order.
    #[serde(default)]
    pub coverages: Vec<CoverageJson>,

    /// Parameter definitions shared by the members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<HashMap<String, Parameter>>,

    /// Reference systems shared by the members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referencing: Option<Vec<ReferenceSystemConnection>>,

    /// Paging links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl CoverageCollection {
    /// A collection holding the given coverages.
    pub fn new(coverages: Vec<CoverageJson>) -> Self {
        Self {
            type_: CoverageType::CoverageCollection,
            domain_type: None,
            coverages,
            parameters: None,
            referencing: None,
            links: None,
        }
    }

    /// Set the paging links.
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links);
        self
    }
}

impl Paged for CoverageCollection {
    fn links(&self) -> &[Link] {
        self.links.as_deref().unwrap_or(&[])
    }
}

/// The domain of a coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Domain {
    /// Always "Domain".
    #[serde(rename = "type", default = "domain_type_tag")]
    pub type_: String,

    /// Domain type; members of a collection may inherit it instead.
    #[serde(rename = "domainType", default, skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<DomainType>,

    /// Axes keyed by name (`x`, `y`, `t`, `z`, `composite`, ...).
    #[serde(default)]
    pub axes: HashMap<String, Axis>,

    /// Reference systems of the axes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referencing: Option<Vec<ReferenceSystemConnection>>,
}

fn domain_type_tag() -> String {
    "Domain".to_string()
}

impl Domain {
    /// A point series domain: one position, many timestamps.
    pub fn point_series(x: f64, y: f64, t_values: Vec<String>) -> Self {
        let mut axes = HashMap::new();
        axes.insert("x".to_string(), Axis::values(vec![AxisValue::Float(x)]));
        axes.insert("y".to_string(), Axis::values(vec![AxisValue::Float(y)]));
        axes.insert(
            "t".to_string(),
            Axis::values(t_values.into_iter().map(AxisValue::String).collect()),
        );

        Self {
            type_: domain_type_tag(),
            domain_type: Some(DomainType::PointSeries),
            axes,
            referencing: None,
        }
    }
}

/// Domain types defined by CoverageJSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DomainType {
    Grid,
    VerticalProfile,
    PointSeries,
    Point,
    MultiPointSeries,
    MultiPoint,
    PolygonSeries,
    Polygon,
    MultiPolygonSeries,
    MultiPolygon,
    Trajectory,
    Section,
}

/// An axis of a domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Axis {
    /// Tuple-valued axis (trajectories, polygons).
    Composite {
        /// Usually "tuple" or "polygon".
        #[serde(rename = "dataType")]
        data_type: String,
        /// Names of the tuple members.
        coordinates: Vec<String>,
        /// Tuples, kept as raw JSON.
        values: Vec<serde_json::Value>,
    },
    /// Explicit list of values.
    Values {
        /// The values.
        values: Vec<AxisValue>,
    },
    /// Regularly spaced values.
    Regular { start: f64, stop: f64, num: usize },
}

impl Axis {
    /// An explicit-values axis.
    pub fn values(values: Vec<AxisValue>) -> Self {
        Axis::Values { values }
    }

    /// Number of positions on the axis.
    pub fn len(&self) -> usize {
        match self {
            Axis::Composite { values, .. } => values.len(),
            Axis::Values { values } => values.len(),
            Axis::Regular { num, .. } => *num,
        }
    }

    /// True if the axis has no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single axis value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AxisValue {
    /// Numeric value (coordinates, levels).
    Float(f64),
    /// String value (timestamps).
    String(String),
}

impl AxisValue {
    /// The string value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AxisValue::String(s) => Some(s),
            AxisValue::Float(_) => None,
        }
    }
}

/// Connects axes to a reference system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceSystemConnection {
    /// Axis names.
    pub coordinates: Vec<String>,

    /// The reference system.
    pub system: ReferenceSystem,
}

/// Reference system definitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ReferenceSystem {
    #[serde(rename = "GeographicCRS")]
    Geographic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    #[serde(rename = "TemporalRS")]
    Temporal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calendar: Option<String>,
    },

    #[serde(rename = "VerticalCRS")]
    Vertical {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    #[serde(rename = "IdentifierRS")]
    Identifier {
        #[serde(rename = "targetConcept", default, skip_serializing_if = "Option::is_none")]
        target_concept: Option<serde_json::Value>,
    },

    /// Any system this crate does not model (e.g. ProjectedCRS).
    #[serde(other)]
    Other,
}

/// N-dimensional value array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NdArray {
    /// Always "NdArray".
    #[serde(rename = "type", default = "ndarray_type_tag")]
    pub type_: String,

    /// "float" or "integer".
    #[serde(rename = "dataType", default = "ndarray_data_type")]
    pub data_type: String,

    /// Axis order of `values`.
    #[serde(rename = "axisNames", default, skip_serializing_if = "Option::is_none")]
    pub axis_names: Option<Vec<String>>,

    /// Shape of `values`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,

    /// Flattened values; `null` marks missing data.
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

fn ndarray_type_tag() -> String {
    "NdArray".to_string()
}

fn ndarray_data_type() -> String {
    "float".to_string()
}

impl NdArray {
    /// A one-dimensional array along `t`.
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self {
            type_: ndarray_type_tag(),
            data_type: ndarray_data_type(),
            axis_names: Some(vec!["t".to_string()]),
            shape: Some(vec![values.len()]),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERIES: &str = r#"{
        "type": "Coverage",
        "domain": {
            "type": "Domain",
            "domainType": "PointSeries",
            "axes": {
                "x": {"values": [-105.1]},
                "y": {"values": [39.7]},
                "t": {"values": ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", "2024-01-03T00:00:00Z"]}
            },
            "referencing": [
                {"coordinates": ["x", "y"], "system": {"type": "GeographicCRS", "id": "http://www.opengis.net/def/crs/OGC/1.3/CRS84"}},
                {"coordinates": ["t"], "system": {"type": "TemporalRS", "calendar": "Gregorian"}},
                {"coordinates": ["x", "y"], "system": {"type": "ProjectedCRS", "id": "EPSG:3857"}}
            ]
        },
        "parameters": {
            "storage": {"type": "Parameter", "observedProperty": {"label": "Storage"}, "unit": {"symbol": "af"}}
        },
        "ranges": {
            "storage": {"type": "NdArray", "dataType": "float", "axisNames": ["t"], "shape": [3], "values": [10.5, null, 12]}
        }
    }"#;

    #[test]
    fn test_decode_point_series() {
        let cov: CoverageJson = serde_json::from_str(SERIES).unwrap();
        assert_eq!(cov.type_, CoverageType::Coverage);
        assert_eq!(cov.domain.domain_type, Some(DomainType::PointSeries));
        assert_eq!(cov.domain.axes["t"].len(), 3);
        assert_eq!(cov.parameter_ids(), vec!["storage"]);

        let refs = cov.domain.referencing.as_ref().unwrap();
        assert_eq!(refs[2].system, ReferenceSystem::Other);
    }

    #[test]
    fn test_time_series_pairs_values_with_times() {
        let cov: CoverageJson = serde_json::from_str(SERIES).unwrap();
        let series = cov.time_series("storage").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], ("2024-01-01T00:00:00Z".to_string(), Some(10.5)));
        assert_eq!(series[1].1, None);
        assert_eq!(series[2].1, Some(12.0));
        assert!(cov.time_series("missing").is_none());
    }

    #[test]
    fn test_composite_and_regular_axes() {
        let json = r#"{
            "composite": {"dataType": "tuple", "coordinates": ["t", "x", "y"],
                          "values": [["2024-01-01T00:00:00Z", 1.0, 2.0], ["2024-01-01T01:00:00Z", 1.5, 2.5]]},
            "x": {"start": 0.0, "stop": 10.0, "num": 11},
            "z": {"values": [850, 700]}
        }"#;
        let axes: HashMap<String, Axis> = serde_json::from_str(json).unwrap();
        assert!(matches!(axes["composite"], Axis::Composite { .. }));
        assert_eq!(axes["composite"].len(), 2);
        assert!(matches!(axes["x"], Axis::Regular { num: 11, .. }));
        assert_eq!(axes["z"].len(), 2);
    }

    #[test]
    fn test_collection_members_inherit_domain_type() {
        let json = r#"{
            "type": "CoverageCollection",
            "domainType": "PointSeries",
            "coverages": [
                {"type": "Coverage", "domain": {"type": "Domain", "axes": {"t": {"values": ["2024-01-01"]}}},
                 "ranges": {"q": {"type": "NdArray", "values": [1]}}}
            ],
            "links": [{"href": "https://edr.example/next", "rel": "next"}]
        }"#;
        let collection: CoverageCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.domain_type, Some(DomainType::PointSeries));
        assert_eq!(collection.coverages.len(), 1);
        assert_eq!(collection.coverages[0].domain.domain_type, None);
        assert_eq!(collection.links().len(), 1);
    }

    #[test]
    fn test_built_coverage_serializes_as_coverage() {
        let cov = CoverageJson::new(Domain::point_series(
            -97.5,
            35.2,
            vec!["2024-12-29T12:00:00Z".to_string()],
        ))
        .with_range("TMP", Parameter::new("TMP", "Temperature"), vec![Some(288.5)]);

        let json = serde_json::to_value(&cov).unwrap();
        assert_eq!(json["type"], "Coverage");
        assert_eq!(json["domain"]["domainType"], "PointSeries");
        assert_eq!(json["ranges"]["TMP"]["values"][0], 288.5);
        assert_eq!(cov.time_series("TMP").unwrap()[0].1, Some(288.5));
    }
}

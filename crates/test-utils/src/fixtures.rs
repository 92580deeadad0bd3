//! Common EDR response fixtures.
//!
//! Every builder returns a `serde_json::Value` exactly as a server would
//! send it, so tests exercise the real decoding path.

use serde_json::{json, Value};

/// Base URL used by the scripted transports in tests.
pub const BASE_URL: &str = "https://edr.example/api";

/// Common collection ids.
pub mod collections {
    /// River gauges collection.
    pub const GAUGES: &str = "river-gauges";

    /// Reservoir collection.
    pub const RESERVOIRS: &str = "reservoirs";
}

/// A point location feature with a numeric or string id and a `name`.
pub fn location_feature(id: impl Into<Value>, name: &str, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "id": id.into(),
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": {"name": name}
    })
}

/// A `rel=next` link object.
pub fn next_link(href: &str) -> Value {
    json!({"href": href, "rel": "next", "type": "application/geo+json"})
}

/// A FeatureCollection page, optionally pointing at the next page.
pub fn feature_collection(features: Vec<Value>, next: Option<&str>) -> Value {
    let returned = features.len();
    let mut page = json!({
        "type": "FeatureCollection",
        "features": features,
        "numberReturned": returned
    });
    if let Some(href) = next {
        page["links"] = json!([
            {"href": format!("{}#self", href), "rel": "self"},
            next_link(href)
        ]);
    }
    page
}

/// A PointSeries coverage of one parameter.
pub fn point_series_coverage(lon: f64, lat: f64, times: &[&str], parameter: &str, values: &[f64]) -> Value {
    json!({
        "type": "Coverage",
        "domain": {
            "type": "Domain",
            "domainType": "PointSeries",
            "axes": {
                "x": {"values": [lon]},
                "y": {"values": [lat]},
                "t": {"values": times}
            }
        },
        "parameters": {
            parameter: {
                "type": "Parameter",
                "observedProperty": {"label": {"en": parameter}}
            }
        },
        "ranges": {
            parameter: {
                "type": "NdArray",
                "dataType": "float",
                "axisNames": ["t"],
                "shape": [values.len()],
                "values": values
            }
        }
    })
}

/// A CoverageCollection page, optionally pointing at the next page.
pub fn coverage_collection(coverages: Vec<Value>, next: Option<&str>) -> Value {
    let mut page = json!({
        "type": "CoverageCollection",
        "domainType": "PointSeries",
        "coverages": coverages
    });
    if let Some(href) = next {
        page["links"] = json!([next_link(href)]);
    }
    page
}

/// Collection metadata with the given temporal `interval` array.
///
/// Pass `Value::Null` to omit the temporal extent entirely.
pub fn collection(id: &str, title: &str, interval: Value) -> Value {
    let mut doc = json!({
        "id": id,
        "title": title,
        "links": [{"href": format!("{}/collections/{}", BASE_URL, id), "rel": "self"}],
        "extent": {
            "spatial": {"bbox": [[-180.0, -90.0, 180.0, 90.0]], "crs": "OGC:CRS84"}
        },
        "data_queries": {
            "locations": {"link": {"href": format!("{}/collections/{}/locations", BASE_URL, id), "rel": "data"}}
        },
        "parameter_names": {
            "discharge": {
                "type": "Parameter",
                "observedProperty": {"label": "Discharge"},
                "unit": {"symbol": "m3/s"}
            }
        }
    });
    if !interval.is_null() {
        doc["extent"]["temporal"] = json!({"interval": interval, "trs": "Gregorian"});
    }
    doc
}

/// The `/collections` document.
pub fn collection_list(collections: Vec<Value>) -> Value {
    json!({
        "links": [{"href": format!("{}/collections", BASE_URL), "rel": "self"}],
        "collections": collections
    })
}

/// A problem-details error body.
pub fn exception(status: u16, detail: &str) -> Value {
    json!({"type": "about:blank", "title": "Error", "status": status, "detail": detail})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_collection_links() {
        let page = feature_collection(vec![location_feature(1, "A", 1.0, 2.0)], Some("https://x/p2"));
        assert_eq!(page["type"], "FeatureCollection");
        assert_eq!(page["numberReturned"], 1);
        assert_eq!(page["links"][1]["rel"], "next");
        assert_eq!(page["links"][1]["href"], "https://x/p2");

        let last = feature_collection(vec![], None);
        assert!(last.get("links").is_none());
    }

    #[test]
    fn test_collection_interval() {
        let doc = collection("c", "C", json!([["2020-01-01", null]]));
        assert_eq!(doc["extent"]["temporal"]["interval"][0][0], "2020-01-01");

        let doc = collection("c", "C", Value::Null);
        assert!(doc["extent"].get("temporal").is_none());
    }

    #[test]
    fn test_point_series_shape() {
        let cov = point_series_coverage(5.0, 52.0, &["2024-01-01T00:00:00Z"], "stage", &[1.5]);
        assert_eq!(cov["ranges"]["stage"]["shape"][0], 1);
        assert_eq!(cov["domain"]["axes"]["t"]["values"][0], "2024-01-01T00:00:00Z");
    }
}

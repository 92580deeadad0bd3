//! Query options for location, item and position requests.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::normalize::{canonical_string, Record};

/// Options shared by the paged EDR queries.
///
/// Everything except `layer_id` is sent to the server; the layer id only
/// tags the resulting locations for legacy layer grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationQuery {
    pub parameter_names: Vec<String>,
    pub datetime: Option<String>,
    pub limit: Option<u32>,
    pub format: Option<String>,
    pub layer_id: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl LocationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter_names.push(name.into());
        self
    }

    /// Raw `datetime` value: an instant or an interval as the server expects it.
    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    /// `datetime` as an interval, `..` standing for an open end.
    pub fn with_datetime_range(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        let bound = |t: Option<DateTime<Utc>>| {
            t.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_else(|| "..".to_string())
        };
        self.datetime = Some(format!("{}/{}", bound(start), bound(end)));
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Output format (`f`), e.g. `geojson` or `covjson`.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_layer(mut self, layer_id: impl Into<String>) -> Self {
        self.layer_id = Some(layer_id.into());
        self
    }

    /// Any other query parameter, sent after the named ones.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Query string pairs in a fixed order, extras last in insertion order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.parameter_names.is_empty() {
            pairs.push(("parameter-name".to_string(), self.parameter_names.join(",")));
        }
        if let Some(datetime) = &self.datetime {
            pairs.push(("datetime".to_string(), datetime.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(format) = &self.format {
            pairs.push(("f".to_string(), format.clone()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }

    /// Query parameters as a record. A repeated extra key keeps its last value.
    pub fn to_record(&self) -> Record {
        self.to_query_pairs()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    }

    /// Memo key for this query against `path`.
    ///
    /// Independent of the order in which extra parameters were added. The
    /// layer id follows the parameter object, so no query parameter can
    /// stand in for it.
    pub fn cache_key(&self, path: &str) -> String {
        let key = format!("{}?{}", path, canonical_string(&self.to_record()));
        match &self.layer_id {
            Some(layer) => format!("{}#layer={}", key, Value::String(layer.clone())),
            None => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_empty_query_has_no_pairs() {
        assert!(LocationQuery::new().to_query_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs_order() {
        let query = LocationQuery::new()
            .with_param("bbox", "-10,40,5,55")
            .with_parameter("discharge")
            .with_parameter("stage")
            .with_limit(500)
            .with_format("geojson")
            .with_layer("rivers");

        assert_eq!(
            query.to_query_pairs(),
            owned(&[
                ("parameter-name", "discharge,stage"),
                ("limit", "500"),
                ("f", "geojson"),
                ("bbox", "-10,40,5,55"),
            ])
        );
    }

    #[test]
    fn test_datetime_range() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2021, 6, 30, 12, 0, 0).unwrap();

        let closed = LocationQuery::new().with_datetime_range(Some(start), Some(end));
        assert_eq!(closed.datetime.as_deref(), Some("2020-01-01T00:00:00Z/2021-06-30T12:00:00Z"));

        let open_end = LocationQuery::new().with_datetime_range(Some(start), None);
        assert_eq!(open_end.datetime.as_deref(), Some("2020-01-01T00:00:00Z/.."));

        let open_start = LocationQuery::new().with_datetime_range(None, Some(end));
        assert_eq!(open_start.datetime.as_deref(), Some("../2021-06-30T12:00:00Z"));
    }

    #[test]
    fn test_cache_key_ignores_extra_order() {
        let a = LocationQuery::new()
            .with_param("bbox", "0,0,1,1")
            .with_param("z", "10");
        let b = LocationQuery::new()
            .with_param("z", "10")
            .with_param("bbox", "0,0,1,1");

        assert_eq!(a.cache_key("/collections/c/locations"), b.cache_key("/collections/c/locations"));
        assert_eq!(
            a.cache_key("/collections/c/locations"),
            r#"/collections/c/locations?{"bbox":"0,0,1,1","z":"10"}"#
        );
    }

    #[test]
    fn test_cache_key_distinguishes_layer_and_path() {
        let base = LocationQuery::new().with_parameter("stage");
        let layered = base.clone().with_layer("lakes");

        assert_ne!(base.cache_key("/p"), layered.cache_key("/p"));
        assert_ne!(base.cache_key("/p"), base.cache_key("/q"));
    }

    #[test]
    fn test_cache_key_layer_never_collides_with_layer_param() {
        let tagged = LocationQuery::new().with_layer("lakes");
        let param = LocationQuery::new().with_param("layer", "lakes");
        let both = LocationQuery::new().with_param("layer", "rivers").with_layer("lakes");
        let swapped = LocationQuery::new().with_param("layer", "lakes").with_layer("rivers");

        assert_ne!(tagged.cache_key("/p"), param.cache_key("/p"));
        assert_ne!(both.cache_key("/p"), swapped.cache_key("/p"));
        assert_eq!(tagged.cache_key("/p"), r#"/p?{}#layer="lakes""#);
    }
}

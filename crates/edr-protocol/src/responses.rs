//! Response shape discrimination.
//!
//! EDR data endpoints answer with one of three JSON shapes. The shape is read
//! from the body's own `type` tag; a missing or unknown tag is an error and
//! is never mapped onto one of the known shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::coverage_json::{CoverageCollection, CoverageJson};
use crate::errors::EdrError;
use crate::geojson::ExtendedFeatureCollection;
use crate::pagination::Paged;
use crate::types::Link;

/// The three response shapes an EDR data endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKind {
    /// `type: "CoverageCollection"`.
    CoverageCollection,
    /// `type: "Coverage"`.
    Coverage,
    /// `type: "FeatureCollection"`.
    FeatureCollection,
}

impl ResponseKind {
    /// The `type` tag of this shape.
    pub fn tag(self) -> &'static str {
        match self {
            ResponseKind::CoverageCollection => "CoverageCollection",
            ResponseKind::Coverage => "Coverage",
            ResponseKind::FeatureCollection => "FeatureCollection",
        }
    }

    /// Classify a decoded body by its `type` tag alone.
    pub fn classify(value: &Value) -> Result<Self, EdrError> {
        let tag = value.get("type").and_then(Value::as_str);
        match tag {
            Some("CoverageCollection") => Ok(ResponseKind::CoverageCollection),
            Some("Coverage") => Ok(ResponseKind::Coverage),
            Some("FeatureCollection") => Ok(ResponseKind::FeatureCollection),
            _ => Err(EdrError::UnrecognizedShape {
                found: tag.map(str::to_string),
            }),
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A typed EDR data response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdrResponse {
    CoverageCollection(CoverageCollection),
    Coverage(CoverageJson),
    FeatureCollection(ExtendedFeatureCollection),
}

impl EdrResponse {
    /// Classify and decode a body.
    pub fn from_value(value: Value) -> Result<Self, EdrError> {
        let kind = ResponseKind::classify(&value)?;
        let malformed = |e: serde_json::Error| EdrError::MalformedResponse {
            kind,
            message: e.to_string(),
        };

        match kind {
            ResponseKind::CoverageCollection => serde_json::from_value(value)
                .map(EdrResponse::CoverageCollection)
                .map_err(malformed),
            ResponseKind::Coverage => serde_json::from_value(value)
                .map(EdrResponse::Coverage)
                .map_err(malformed),
            ResponseKind::FeatureCollection => serde_json::from_value(value)
                .map(EdrResponse::FeatureCollection)
                .map_err(malformed),
        }
    }

    /// The shape of this response.
    pub fn kind(&self) -> ResponseKind {
        match self {
            EdrResponse::CoverageCollection(_) => ResponseKind::CoverageCollection,
            EdrResponse::Coverage(_) => ResponseKind::Coverage,
            EdrResponse::FeatureCollection(_) => ResponseKind::FeatureCollection,
        }
    }

    /// Fail unless this response has the `expected` shape.
    pub fn expect_kind(self, expected: ResponseKind) -> Result<Self, EdrError> {
        let found = self.kind();
        if found == expected {
            Ok(self)
        } else {
            Err(EdrError::UnexpectedShape { expected, found })
        }
    }

    /// Take the feature collection, or report the shape that arrived instead.
    pub fn into_feature_collection(self) -> Result<ExtendedFeatureCollection, EdrError> {
        match self {
            EdrResponse::FeatureCollection(fc) => Ok(fc),
            other => Err(EdrError::UnexpectedShape {
                expected: ResponseKind::FeatureCollection,
                found: other.kind(),
            }),
        }
    }

    /// Number of top-level items: features, coverages, or 1 for a coverage.
    pub fn item_count(&self) -> usize {
        match self {
            EdrResponse::CoverageCollection(c) => c.coverages.len(),
            EdrResponse::Coverage(_) => 1,
            EdrResponse::FeatureCollection(fc) => fc.features.len(),
        }
    }

    /// Append the items of the following page and adopt its links.
    ///
    /// Pages of a single query must share a shape; a lone Coverage is never
    /// paged.
    pub fn absorb(&mut self, next: EdrResponse) -> Result<(), EdrError> {
        match (self, next) {
            (EdrResponse::FeatureCollection(acc), EdrResponse::FeatureCollection(page)) => {
                acc.features.extend(page.features);
                acc.links = page.links;
                acc.number_returned = Some(acc.features.len() as u64);
                Ok(())
            }
            (EdrResponse::CoverageCollection(acc), EdrResponse::CoverageCollection(page)) => {
                acc.coverages.extend(page.coverages);
                acc.links = page.links;
                if let Some(params) = page.parameters {
                    acc.parameters.get_or_insert_with(Default::default).extend(params);
                }
                Ok(())
            }
            (acc, page) => Err(EdrError::UnexpectedShape {
                expected: acc.kind(),
                found: page.kind(),
            }),
        }
    }
}

impl Paged for EdrResponse {
    fn links(&self) -> &[Link] {
        match self {
            EdrResponse::CoverageCollection(c) => c.links(),
            EdrResponse::Coverage(_) => &[],
            EdrResponse::FeatureCollection(fc) => fc.links(),
        }
    }
}

/// Problem-details body servers send with error statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type URI or code.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// pygeoapi-style `description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExceptionResponse {
    /// Best human-readable message in the body.
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.description.as_deref())
            .or(self.title.as_deref())
    }
}

//! OGC API - Environmental Data Retrieval (EDR) payloads, client side.
//!
//! This crate decodes what EDR servers send back and answers the questions a
//! client has to ask of it before anything is drawn on a map:
//!
//! - which of the three response shapes arrived ([`ResponseKind::classify`]),
//! - whether there is another page ([`next_link`]),
//! - what time window a collection covers ([`temporal_extent`]).
//!
//! Nothing here performs I/O.
//!
//! # Example
//!
//! ```rust
//! use edr_protocol::{next_link, EdrResponse, ResponseKind};
//! use serde_json::json;
//!
//! let body = json!({
//!     "type": "FeatureCollection",
//!     "features": [],
//!     "links": [{"rel": "next", "href": "https://edr.example/collections/x/locations?offset=100"}]
//! });
//!
//! let page = EdrResponse::from_value(body).unwrap();
//! assert_eq!(page.kind(), ResponseKind::FeatureCollection);
//! assert!(next_link(&page).is_some());
//! ```

pub mod collections;
pub mod coverage_json;
pub mod errors;
pub mod geojson;
pub mod locations;
pub mod pagination;
pub mod parameters;
pub mod responses;
pub mod types;

// Re-export commonly used types
pub use collections::{temporal_extent, Collection, CollectionList, TemporalRange};
pub use coverage_json::{Axis, AxisValue, CoverageCollection, CoverageJson, Domain, DomainType, NdArray};
pub use errors::EdrError;
pub use geojson::{ExtendedFeatureCollection, Feature, Geometry, Properties};
pub use locations::{locations_from_features, Location};
pub use pagination::{next_link, Paged};
pub use parameters::{I18nString, Parameter, Unit};
pub use responses::{EdrResponse, ExceptionResponse, ResponseKind};
pub use types::{Extent, Identifier, Link, SpatialExtent, TemporalExtent, REL_NEXT};

/// Media types used in EDR responses
pub mod media_types {
    /// CoverageJSON media type
    pub const COVERAGE_JSON: &str = "application/vnd.cov+json";
    /// GeoJSON media type
    pub const GEO_JSON: &str = "application/geo+json";
    /// JSON media type
    pub const JSON: &str = "application/json";
}

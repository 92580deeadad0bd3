//! Client for OGC EDR APIs.
//!
//! [`EdrClient`] walks paged location and item queries to completion over a
//! pluggable [`Transport`], reporting partial results when a later page
//! fails. The [`normalize`] module turns fetched features and locations into
//! the shapes map and chart code consumes.
//!
//! # Example
//!
//! ```no_run
//! use edr_client::{ClientConfig, EdrClient, LocationQuery};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = EdrClient::from_config(ClientConfig::new("https://edr.example/api"))?;
//! let query = LocationQuery::new().with_parameter("discharge");
//! let locations = client
//!     .get_locations("river-gauges", &query, &CancellationToken::new())
//!     .await?;
//! let groups = client.group(&locations);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod query;
pub mod transport;

pub use client::EdrClient;
pub use config::ClientConfig;
pub use error::{ClientError, PartialFetch, TransportError};
pub use normalize::{
    canonicalize, group_by_collection, group_by_layer, group_locations, unique_by, GroupingKey,
    LocationGroups, Record,
};
pub use query::LocationQuery;
pub use transport::{HttpTransport, Transport};

//! EDR API client.
//!
//! Every query is one independent, strictly sequential walk: fetch a page,
//! classify it, follow its `next` link, repeat. Results are fully
//! materialized before they are returned.

use std::collections::HashSet;
use std::sync::Arc;

use edr_protocol::{
    locations_from_features, next_link, Collection, CollectionList, EdrError, EdrResponse,
    ExtendedFeatureCollection, Identifier, Location,
};
use metrics::counter;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, PartialFetch};
use crate::normalize::{group_locations, GroupingKey, LocationGroups};
use crate::query::LocationQuery;
use crate::transport::{HttpTransport, Transport};

/// Client for one EDR API root.
///
/// Holds no per-query state, so clones and concurrent calls never interfere.
pub struct EdrClient<T> {
    transport: Arc<T>,
    base_url: Url,
    config: Arc<ClientConfig>,
}

impl<T> Clone for EdrClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl EdrClient<HttpTransport> {
    /// Client over HTTP, configured from `config`.
    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport)?)
    }
}

impl<T: Transport> EdrClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    /// Client sharing a transport (and its connection pool) with others.
    pub fn with_shared_transport(config: ClientConfig, transport: Arc<T>) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        Ok(Self {
            transport,
            base_url,
            config: Arc::new(config),
        })
    }

    /// The API root, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List the collections the server offers.
    #[instrument(skip(self, cancel), fields(base = %self.base_url))]
    pub async fn get_collections(&self, cancel: &CancellationToken) -> Result<CollectionList, ClientError> {
        let url = self.endpoint(&["collections"]);
        let value = self.fetch(url.as_str(), &[], cancel).await?;
        let list: CollectionList = decode_document(value, "collection list")?;
        info!(collections = list.collections.len(), "Fetched collection list");
        Ok(list)
    }

    /// Metadata of one collection, including its extents.
    #[instrument(skip(self, cancel), fields(base = %self.base_url))]
    pub async fn get_collection(
        &self,
        collection_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Collection, ClientError> {
        let url = self.endpoint(&["collections", collection_id]);
        let value = self.fetch(url.as_str(), &[], cancel).await?;
        decode_document(value, "collection")
    }

    /// All locations of a collection, across every page.
    ///
    /// Locations are tagged with `collection_id` and with the query's layer
    /// id, if it has one.
    #[instrument(skip(self, query, cancel), fields(base = %self.base_url))]
    pub async fn get_locations(
        &self,
        collection_id: &str,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Location>, ClientError> {
        let url = self.endpoint(&["collections", collection_id, "locations"]);
        let response = self.fetch_all(url, query, cancel).await?;
        let features = response.into_feature_collection()?.features;
        let locations = locations_from_features(features, collection_id, query.layer_id.as_deref())?;

        info!(locations = locations.len(), "Fetched locations");
        Ok(locations)
    }

    /// Data for one location, in whichever shape the server returns.
    #[instrument(skip(self, query, cancel), fields(base = %self.base_url))]
    pub async fn get_location(
        &self,
        collection_id: &str,
        location_id: &Identifier,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<EdrResponse, ClientError> {
        let id = location_id.to_string();
        let url = self.endpoint(&["collections", collection_id, "locations", &id]);
        let response = self.fetch_all(url, query, cancel).await?;

        info!(kind = %response.kind(), items = response.item_count(), "Fetched location data");
        Ok(response)
    }

    /// Features from the `items` endpoint, across every page.
    #[instrument(skip(self, query, cancel), fields(base = %self.base_url))]
    pub async fn get_items(
        &self,
        collection_id: &str,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<ExtendedFeatureCollection, ClientError> {
        let url = self.endpoint(&["collections", collection_id, "items"]);
        let items = self.fetch_all(url, query, cancel).await?.into_feature_collection()?;

        info!(items = items.features.len(), "Fetched items");
        Ok(items)
    }

    /// Group locations by the configured default key.
    pub fn group(&self, locations: &[Location]) -> LocationGroups {
        group_locations(locations, self.config.grouping)
    }

    /// The configured default grouping key.
    pub fn grouping(&self) -> GroupingKey {
        self.config.grouping
    }

    /// Walk a paged response to its end.
    ///
    /// The first request carries the query; later pages are fetched exactly
    /// as their `next` hrefs say.
    async fn fetch_all(
        &self,
        url: Url,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<EdrResponse, ClientError> {
        let pairs = query.to_query_pairs();

        let mut visited = HashSet::new();
        visited.insert(with_query(&url, &pairs));

        let value = self.fetch(url.as_str(), &pairs, cancel).await?;
        let mut accumulated = EdrResponse::from_value(value)?;
        let mut pages = 1;

        while let Some(href) = next_link(&accumulated) {
            let next = self.resolve(href)?.to_string();
            if !visited.insert(next.clone()) {
                return Err(EdrError::PaginationCycle(next).into());
            }
            if let Some(max_pages) = self.config.max_pages {
                if pages >= max_pages {
                    return Err(EdrError::PageLimitExceeded(max_pages).into());
                }
            }

            debug!(page = pages + 1, url = %next, "Following next link");
            let value = match self.fetch(&next, &[], cancel).await {
                Ok(value) => value,
                Err(ClientError::Request(source)) => {
                    warn!(
                        pages_fetched = pages,
                        url = %next,
                        error = %source,
                        "Page failed, returning partial result"
                    );
                    counter!("edr_client_partial_failures_total").increment(1);
                    return Err(ClientError::Partial(Box::new(PartialFetch {
                        data: accumulated,
                        pages_fetched: pages,
                        failed_url: next,
                        source,
                    })));
                }
                Err(e) => return Err(e),
            };

            accumulated.absorb(EdrResponse::from_value(value)?)?;
            pages += 1;
        }

        debug!(pages, items = accumulated.item_count(), "Pagination complete");
        Ok(accumulated)
    }

    /// One request, abandoned as soon as `cancel` fires.
    async fn fetch(
        &self,
        url: &str,
        query: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url, "Request cancelled");
                return Err(ClientError::Cancelled);
            }
            result = self.transport.get_json(url, query) => result.map_err(ClientError::Request)?,
        };

        counter!("edr_client_pages_fetched_total").increment(1);
        Ok(value)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Absolute hrefs are taken as-is; relative ones resolve against the base.
    fn resolve(&self, href: &str) -> Result<Url, EdrError> {
        self.base_url
            .join(href)
            .map_err(|e| EdrError::InvalidLink(format!("{}: {}", href, e)))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let invalid = |message: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        message,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a hierarchical URL".to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `url` with `pairs` appended, as the server will see it.
fn with_query(url: &Url, pairs: &[(String, String)]) -> String {
    let mut url = url.clone();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url.to_string()
}

fn decode_document<D: DeserializeOwned>(value: Value, what: &str) -> Result<D, ClientError> {
    serde_json::from_value(value).map_err(|e| {
        ClientError::Data(EdrError::MalformedDocument {
            what: what.to_string(),
            message: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn get_json(&self, url: &str, _query: &[(String, String)]) -> Result<Value, TransportError> {
            Err(TransportError::Request {
                url: url.to_string(),
                message: "unreachable".to_string(),
            })
        }
    }

    fn client(base: &str) -> EdrClient<Unreachable> {
        EdrClient::new(ClientConfig::new(base), Unreachable).unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        assert_eq!(client("https://edr.example/api").base_url().as_str(), "https://edr.example/api/");
        assert_eq!(client("https://edr.example/api/").base_url().as_str(), "https://edr.example/api/");
        assert_eq!(client("https://edr.example").base_url().as_str(), "https://edr.example/");
        assert_eq!(client("https://edr.example/api?f=json").base_url().as_str(), "https://edr.example/api/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = EdrClient::new(ClientConfig::new("not a url"), Unreachable).err().unwrap();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

        let err = EdrClient::new(ClientConfig::new("mailto:ops@example.org"), Unreachable)
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let c = client("https://edr.example/api");
        assert_eq!(
            c.endpoint(&["collections", "river gauges", "locations"]).as_str(),
            "https://edr.example/api/collections/river%20gauges/locations"
        );
        assert_eq!(
            c.endpoint(&["collections", "a/b"]).as_str(),
            "https://edr.example/api/collections/a%2Fb"
        );
    }

    #[test]
    fn test_resolve_links() {
        let c = client("https://edr.example/api");
        assert_eq!(
            c.resolve("collections/x/locations?offset=10").unwrap().as_str(),
            "https://edr.example/api/collections/x/locations?offset=10"
        );
        assert_eq!(
            c.resolve("/other/page2").unwrap().as_str(),
            "https://edr.example/other/page2"
        );
        assert_eq!(
            c.resolve("https://mirror.example/p2").unwrap().as_str(),
            "https://mirror.example/p2"
        );
        assert!(matches!(c.resolve("http://[::1"), Err(EdrError::InvalidLink(_))));
    }

    #[test]
    fn test_with_query() {
        let url = Url::parse("https://edr.example/c/locations").unwrap();
        let pairs = vec![("parameter-name".to_string(), "a,b".to_string())];
        assert_eq!(
            with_query(&url, &pairs),
            "https://edr.example/c/locations?parameter-name=a%2Cb"
        );
        assert_eq!(with_query(&url, &[]), "https://edr.example/c/locations");
    }

    #[tokio::test]
    async fn test_first_page_failure_is_request_error() {
        let c = client("https://edr.example");
        let err = c
            .get_locations("x", &LocationQuery::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Request(TransportError::Request { .. })));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let c = client("https://edr.example");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = tokio_test::assert_err!(c.get_collections(&cancel).await);
        assert!(matches!(err, ClientError::Cancelled));
    }
}

//! Client error types.

use edr_protocol::{EdrError, EdrResponse, Feature};
use thiserror::Error;

/// Failures of the transport collaborator (network, HTTP status, body decoding).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The request could not be sent or no response arrived.
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}{}", .message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status {
        url: String,
        status: u16,
        message: Option<String>,
    },

    /// The body is not valid JSON.
    #[error("Invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Errors returned by [`crate::EdrClient`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The first request of a query failed; nothing was accumulated.
    #[error("Request failed: {0}")]
    Request(#[source] TransportError),

    /// A later page failed; the pages fetched so far are attached.
    #[error(transparent)]
    Partial(Box<PartialFetch>),

    /// The server answered with data this client cannot accept.
    #[error(transparent)]
    Data(#[from] EdrError),

    /// The caller cancelled the query before it completed.
    #[error("Query cancelled")]
    Cancelled,

    /// The client was configured with an unusable base URL.
    #[error("Invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl ClientError {
    /// True for failures that left partial data behind.
    pub fn is_partial(&self) -> bool {
        matches!(self, ClientError::Partial(_))
    }

    /// The partial accumulation, if this is a partial failure.
    pub fn partial(&self) -> Option<&PartialFetch> {
        match self {
            ClientError::Partial(partial) => Some(partial.as_ref()),
            _ => None,
        }
    }
}

/// The result of a multi-page query that failed after its first page.
///
/// Whether the data is usable is the caller's decision.
#[derive(Debug, Error)]
#[error("Page {} at {failed_url} failed after {pages_fetched} page(s): {source}", .pages_fetched + 1)]
pub struct PartialFetch {
    /// Everything accumulated from the pages that succeeded.
    pub data: EdrResponse,

    /// Number of pages successfully fetched.
    pub pages_fetched: usize,

    /// Address of the page that failed.
    pub failed_url: String,

    /// The transport failure.
    #[source]
    pub source: TransportError,
}

impl PartialFetch {
    /// Features accumulated so far, empty for coverage responses.
    pub fn features(&self) -> &[Feature] {
        match &self.data {
            EdrResponse::FeatureCollection(fc) => &fc.features,
            _ => &[],
        }
    }
}

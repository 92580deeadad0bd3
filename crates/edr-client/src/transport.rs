//! The HTTP seam between the client and the network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use edr_protocol::{media_types, ExceptionResponse};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Fetches JSON documents.
///
/// Implementations decide timeouts and connection reuse. They must not
/// retry on their own: a failed page is reported to the caller as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with `query` appended and decode the body as JSON.
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError>;
}

/// [`Transport`] over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client with the configured timeouts and user agent.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, query), fields(params = query.len()))]
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError> {
        let mut request = self.client.get(url).header(
            header::ACCEPT,
            format!(
                "{}, {}, {}",
                media_types::GEO_JSON,
                media_types::COVERAGE_JSON,
                media_types::JSON
            ),
        );
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let final_url = response.url().to_string();
        debug!(status = status.as_u16(), url = %final_url, "Response received");

        if !status.is_success() {
            // Servers usually explain errors in a problem-details body.
            let message = response
                .json::<ExceptionResponse>()
                .await
                .ok()
                .and_then(|body| body.message().map(str::to_string));
            return Err(TransportError::Status {
                url: final_url,
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| TransportError::Decode {
            url: final_url,
            message: e.to_string(),
        })
    }
}

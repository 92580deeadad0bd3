//! In-memory transport for driving the client in tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use edr_client::{ClientConfig, EdrClient, Transport, TransportError};
use serde_json::Value;
use test_utils::{ScriptedPage, BASE_URL};

/// What the transport does for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Fail(TransportError),
    /// Never completes; only cancellation ends the request.
    Hang,
}

/// Serves scripted replies by exact URL and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, url: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn json(&self, url: &str, body: Value) {
        self.reply(url, Reply::Json(body));
    }

    pub fn pages(&self, pages: &[ScriptedPage]) {
        for page in pages {
            self.json(&page.url, page.body.clone());
        }
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    /// Query pairs of the `n`th request.
    pub fn query_of(&self, n: usize) -> Vec<(String, String)> {
        self.requests.lock().unwrap()[n].1.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), query.to_vec()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
                message: Some("not scripted".to_string()),
            }),
        }
    }
}

pub fn client(transport: &Arc<ScriptedTransport>) -> EdrClient<ScriptedTransport> {
    client_with(ClientConfig::new(BASE_URL), transport)
}

pub fn client_with(config: ClientConfig, transport: &Arc<ScriptedTransport>) -> EdrClient<ScriptedTransport> {
    EdrClient::with_shared_transport(config, Arc::clone(transport)).unwrap()
}

/// `{BASE_URL}/{path}`.
pub fn url(path: &str) -> String {
    format!("{}/{}", BASE_URL, path)
}

pub fn connection_reset(url: &str) -> Reply {
    Reply::Fail(TransportError::Request {
        url: url.to_string(),
        message: "connection reset by peer".to_string(),
    })
}

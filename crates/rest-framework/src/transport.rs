//! # Transport
//!
//! The seam between the gateways and the network. A [`Transport`] turns one
//! [`HttpRequest`] into one [`RawResponse`]; it never retries, caches or batches.
//!
//! [`ReqwestTransport`] is the production implementation. Tests inject
//! [`MockTransport`](crate::mock::MockTransport) instead.

use crate::error::FrameworkError;
use crate::response::{HttpResponse, RawResponse};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// A single outbound request, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends requests to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs `request` and returns the response whatever its status.
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, FrameworkError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport resolving request paths against `base_url`.
    ///
    /// A missing trailing `/` is added so that `api/customers` joins below the base
    /// instead of replacing its last segment. `timeout` of `None` waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FrameworkError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| FrameworkError::Transport(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `request`, query string included.
    pub fn url_for(&self, request: &HttpRequest) -> Result<Url, FrameworkError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, FrameworkError> {
        let url = self.url_for(&request)?;
        debug!(%url, "Sending request");

        let mut builder = self.client.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Path of the backend's discovery resource.
pub const ENTRY_PATH: &str = "api";

/// Fetches the API entry point. It has no content, only the `controls` describing the
/// resources the backend serves.
pub async fn fetch_entry(transport: &dyn Transport) -> Result<HttpResponse<()>, FrameworkError> {
    let raw = transport
        .send(HttpRequest::get(ENTRY_PATH))
        .await?
        .error_for_status(ENTRY_PATH)?;
    debug!(status = raw.status, "Fetched API entry");
    Ok(raw.decode_empty())
}

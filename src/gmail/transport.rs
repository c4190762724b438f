//! HTTP transport
//!
//! Executes a `GmailRequest` against the Gmail REST API with the caller's
//! bearer token attached. The trait seam exists so the dispatcher can be
//! exercised against a simulated transport in tests; the real implementation
//! is a thin reqwest wrapper with a per-call timeout.

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;

use crate::config::Config;
use crate::error::Result;
use crate::gmail::request::GmailRequest;
use crate::gmail::response::RawResponse;

/// Executes Gmail requests. One call in, one response out; no retries, no
/// shared state between calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &GmailRequest, bearer_token: &str) -> Result<RawResponse>;
}

/// reqwest-backed transport for `gmail.googleapis.com`.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from configuration. The timeout applies per call
    /// and aborts the underlying network operation when exceeded.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &GmailRequest, bearer_token: &str) -> Result<RawResponse> {
        let url = format!("{}/{}", self.base_url, request.path);

        tracing::debug!(method = %request.method, %url, "executing Gmail request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .bearer_auth(bearer_token)
            .query(&request.query);

        builder = match &request.body {
            Some(body) => builder.json(body),
            // Gmail's action endpoints (trash/untrash) expect an explicit
            // empty body on POST.
            None if request.method == reqwest::Method::POST => {
                builder.header(CONTENT_LENGTH, "0")
            }
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, bytes = body.len(), "Gmail response received");

        Ok(RawResponse { status, body })
    }
}

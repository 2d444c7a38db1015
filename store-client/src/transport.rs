//! Executes `HttpRequest` values over the network.

use std::time::Duration;

use tracing::instrument;

use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Async HTTP executor backed by a pooled `reqwest::Client`.
///
/// Cloning shares the pool; connections are reused across requests.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| StoreError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Perform one round-trip. Any HTTP status is returned as data; only
    /// failures to obtain a response are errors.
    #[instrument(skip_all, fields(method = request.method.as_str(), url = %request.url))]
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, StoreError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "store request failed");
            StoreError::Transport(e.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        tracing::debug!(status, bytes = body.len(), "store responded");
        Ok(HttpResponse { status, body })
    }
}

//! HTTP transport seam.
//!
//! [`Transport`] performs exactly one HTTP exchange. Retry, status handling,
//! and decoding live above it in the executor, so tests can swap in a
//! scripted transport without a network.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use mipush_core::{PushError, PushResult, TransportError};
use reqwest::Method;
use reqwest::header::HeaderMap;

/// A fully built request, reused unchanged across attempts.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, query string included.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Url-encoded form body (POST only).
    pub body: Option<String>,
}

/// Status and body of one exchange.
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body. Best effort for non-200 responses.
    pub body: Bytes,
}

/// One HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` once.
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a per-attempt timeout.
    pub fn new(timeout: Duration) -> PushResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Use an existing client (shared connection settings, tests).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();

        let body = if status == 200 {
            response
                .bytes()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?
        } else {
            response.bytes().await.unwrap_or_default()
        };

        Ok(RawResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Build(err.to_string())
    } else if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

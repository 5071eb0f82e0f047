//! Request execution with bounded, immediate retry.
//!
//! Retry rules:
//! - Only retryable [`TransportError`]s (connect, timeout, send) are retried
//! - Cancellation is checked after each failed attempt, before the next one
//! - A non-200 status fails at once as [`PushError::Provider`]
//! - A body read failure fails at once as [`PushError::Io`]
//! - A request that cannot be built fails at once as [`PushError::Config`]
//! - There is no backoff between attempts

use std::sync::Arc;

use bytes::Bytes;
use mipush_core::{PushError, PushResult, TransportError};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::encoder::FormFields;
use crate::transport::{PreparedRequest, Transport};

/// Content type of every request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Sends prepared requests through a [`Transport`] with retry.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    headers: HeaderMap,
    max_attempts: u32,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Executor authenticating with `app_secret`.
    ///
    /// `max_attempts` counts the first attempt and must be at least 1.
    pub fn new(
        transport: Arc<dyn Transport>,
        app_secret: &str,
        max_attempts: u32,
    ) -> PushResult<Self> {
        if max_attempts == 0 {
            return Err(PushError::config("max attempts must be at least 1"));
        }
        Ok(Self {
            transport,
            headers: build_headers(app_secret)?,
            max_attempts,
        })
    }

    /// Build the request once; POST carries a form body, GET a query string.
    pub fn prepare(&self, method: Method, url: &str, fields: &FormFields) -> PreparedRequest {
        let encoded = fields.to_urlencoded();
        let mut headers = self.headers.clone();
        if method == Method::GET {
            let url = if encoded.is_empty() {
                url.to_string()
            } else {
                format!("{url}?{encoded}")
            };
            PreparedRequest {
                method,
                url,
                headers,
                body: None,
            }
        } else {
            let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            PreparedRequest {
                method,
                url: url.to_string(),
                headers,
                body: Some(encoded),
            }
        }
    }

    /// Execute a request and return the body of the 200 response.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        fields: &FormFields,
        cancel: &CancellationToken,
    ) -> PushResult<Bytes> {
        let request = self.prepare(method, url, fields);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(method = %request.method, url = %request.url, attempt, "sending push request");

            match self.transport.send(&request).await {
                Ok(response) if response.status == 200 => return Ok(response.body),
                Ok(response) => {
                    warn!(status = response.status, url = %request.url, "provider rejected request");
                    return Err(PushError::Provider {
                        status: response.status,
                        body: String::from_utf8_lossy(&response.body).into_owned(),
                    });
                }
                Err(TransportError::Build(message)) => {
                    return Err(PushError::config(message));
                }
                Err(err) if !err.is_retryable() => {
                    return Err(PushError::Io {
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    if cancel.is_cancelled() {
                        debug!(attempt, "cancelled, not retrying");
                        return Err(PushError::Cancelled { attempts: attempt });
                    }
                    if attempt >= self.max_attempts {
                        return Err(PushError::Transport {
                            attempts: attempt,
                            source: err,
                        });
                    }
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        category = err.category(),
                        error = %err,
                        "push request failed, retrying"
                    );
                }
            }
        }
    }
}

fn build_headers(app_secret: &str) -> PushResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("key={app_secret}"))
        .map_err(|e| PushError::config(format!("invalid app secret header: {e}")))?;
    auth.set_sensitive(true);
    let _ = headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

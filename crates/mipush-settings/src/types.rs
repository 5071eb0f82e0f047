//! Settings types.
//!
//! Serialized as camelCase JSON. Every field has a compiled default so a
//! partial user file only needs the keys it changes.

use mipush_core::constants::{DEFAULT_MAX_ATTEMPTS, FEEDBACK_HOST, PRODUCTION_HOST};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{Result, SettingsError};

/// Default per-attempt timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Upper bound accepted for `maxAttempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Client configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushSettings {
    /// App secret sent as `Authorization: key=<secret>`.
    pub app_secret: String,
    /// Packages allowed to receive pushes; joined with `,` on the wire.
    pub package_names: Vec<String>,
    /// API host, scheme included.
    pub host: String,
    /// Host of the invalid registration id feedback endpoint.
    pub feedback_host: String,
    /// Timeout of one HTTP attempt in milliseconds.
    pub request_timeout_ms: u64,
    /// Attempts per request (1 initial + retries).
    pub max_attempts: u32,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            app_secret: String::new(),
            package_names: Vec::new(),
            host: PRODUCTION_HOST.to_string(),
            feedback_host: FEEDBACK_HOST.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl std::fmt::Debug for PushSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushSettings")
            .field("app_secret", &mipush_core::logging::redact(&self.app_secret))
            .field("package_names", &self.package_names)
            .field("host", &self.host)
            .field("feedback_host", &self.feedback_host)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl PushSettings {
    /// Settings for one app with the production hosts.
    #[must_use]
    pub fn new(app_secret: impl Into<String>, package_names: Vec<String>) -> Self {
        Self {
            app_secret: app_secret.into(),
            package_names,
            ..Self::default()
        }
    }

    /// Point both hosts at `host` (useful for staging or mock servers).
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.feedback_host.clone_from(&host);
        self.host = host;
        self
    }

    /// Whether more than one package is configured.
    pub fn has_multiple_packages(&self) -> bool {
        self.package_names.len() > 1
    }

    /// Check values a client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.app_secret.trim().is_empty() {
            return Err(SettingsError::invalid("appSecret", "is empty"));
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(SettingsError::invalid(
                "maxAttempts",
                format!(
                    "must be between 1 and {MAX_ATTEMPTS_LIMIT}, got {}",
                    self.max_attempts
                ),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::invalid("requestTimeoutMs", "must be positive"));
        }
        check_host("host", &self.host)?;
        check_host("feedbackHost", &self.feedback_host)
    }
}

/// Hosts must be absolute http(s) URLs with a host part.
fn check_host(field: &'static str, host: &str) -> Result<()> {
    let url = Url::parse(host).map_err(|e| SettingsError::invalid(field, format!("{host:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(SettingsError::invalid(
            field,
            format!("must be an http:// or https:// URL, got {host:?}"),
        ));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

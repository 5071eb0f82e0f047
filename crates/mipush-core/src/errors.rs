//! Error types for push operations.
//!
//! [`PushError`] separates caller bugs ([`PushError::InvalidInput`], raised
//! before any I/O) from exchange failures. Only [`TransportError`]s that
//! report [`TransportError::is_retryable`] are ever retried, and only up to
//! the executor's attempt ceiling.

/// Result type alias for push operations.
pub type PushResult<T> = Result<T, PushError>;

/// Failure of a single HTTP exchange below the status-code level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not connect to the provider host.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The attempt exceeded the client timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be built (malformed URL or header).
    #[error("invalid request: {0}")]
    Build(String),

    /// Any other failure while sending the request.
    #[error("request failed: {0}")]
    Request(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Whether another attempt may succeed.
    ///
    /// Body read failures happen after the provider accepted the request,
    /// and build failures repeat on every attempt. Neither is retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Body(_) | Self::Build(_))
    }

    /// Error category string for log fields.
    pub fn category(&self) -> &str {
        match self {
            Self::Connect(_) => "connect",
            Self::Timeout(_) => "timeout",
            Self::Build(_) => "build",
            Self::Request(_) => "request",
            Self::Body(_) => "body",
        }
    }
}

/// Errors that can occur while talking to the push provider.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// A local bound or shape check failed. Raised before any network call.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The caller's cancellation token fired; no further attempts were made.
    #[error("request cancelled after {attempts} attempt(s)")]
    Cancelled {
        /// Attempts made before cancellation was observed.
        attempts: u32,
    },

    /// Every attempt failed at the transport level.
    #[error("transport failure after {attempts} attempt(s): {source}")]
    Transport {
        /// Total attempts made (1-based).
        attempts: u32,
        /// The last transport error.
        #[source]
        source: TransportError,
    },

    /// The provider answered with a non-200 status.
    #[error("provider returned HTTP {status}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Response body, if it could be read.
        body: String,
    },

    /// The response body could not be read.
    #[error("I/O error: {message}")]
    Io {
        /// Error description.
        message: String,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client was constructed with unusable configuration.
    #[error("invalid client configuration: {message}")]
    Config {
        /// Error description.
        message: String,
    },
}

impl PushError {
    /// Shorthand for [`PushError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for [`PushError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Number of attempts made, for errors raised by the retry loop.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Cancelled { attempts } | Self::Transport { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Error category string for log fields.
    pub fn category(&self) -> &str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::Cancelled { .. } => "cancelled",
            Self::Transport { .. } => "transport",
            Self::Provider { .. } => "provider",
            Self::Io { .. } => "io",
            Self::Decode(_) => "decode",
            Self::Config { .. } => "config",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

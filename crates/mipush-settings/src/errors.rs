//! Failures while reading or checking push client settings.

use std::path::PathBuf;

use thiserror::Error;

/// Why a [`PushSettings`](crate::PushSettings) could not be produced or used.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not JSON, or a key holds the wrong type.
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the client cannot run with.
    #[error("{field}: {reason}")]
    Invalid {
        /// camelCase name of the offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl SettingsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = SettingsError::Read {
            path: PathBuf::from("/etc/mipush.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot read /etc/mipush.json: denied");
    }

    #[test]
    fn parse_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(err.to_string().starts_with("malformed settings:"));
    }

    #[test]
    fn invalid_names_the_field() {
        let err = SettingsError::invalid("maxAttempts", "must be between 1 and 10, got 0");
        assert_eq!(err.to_string(), "maxAttempts: must be between 1 and 10, got 0");
    }
}

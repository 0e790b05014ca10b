//! Error type definitions for playback-proxy
//!
//! Resolution itself never fails the caller: proxy and quality operations
//! degrade to the original URL or `None`. The types here cover the fallible
//! edges around that core (configuration loading, preference persistence,
//! header encoding) and let the fail-open paths log a precise cause.

use thiserror::Error;

/// Top-level application error type
///
/// Uses `thiserror` to provide the error trait implementations and
/// conversion from the lower-level error domains.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors while reading or writing configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML configuration
    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Configuration could not be rendered back to TOML
    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON encoding or decoding failures
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Proxy URL construction errors
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Quality preference persistence errors
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferenceError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Proxy URL construction errors
///
/// These never escape the public builders; they are logged and the
/// original URL is returned instead.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// No proxy endpoint is configured
    #[error("No proxy URLs available in configuration")]
    NoEndpoints,

    /// The request header map could not be serialized to JSON
    #[error("Failed to encode request headers: {0}")]
    HeaderEncoding(#[from] serde_json::Error),
}

/// Quality preference persistence errors
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// The preference file could not be read or written
    #[error("Preference file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The preference file holds malformed JSON
    #[error("Preference file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::configuration("missing proxy section");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing proxy section"
        );

        let err = AppError::from(ProxyError::NoEndpoints);
        assert_eq!(
            err.to_string(),
            "Proxy error: No proxy URLs available in configuration"
        );

        let err = AppError::validation("unknown quality label 'hd'");
        assert_eq!(
            err.to_string(),
            "Validation error: unknown quality label 'hd'"
        );
    }

    #[test]
    fn test_preference_error_keeps_path() {
        let err = PreferenceError::Io {
            path: "/tmp/quality.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/quality.json"));
        assert!(matches!(
            AppError::from(err),
            AppError::Preferences(PreferenceError::Io { .. })
        ));
    }
}

//! Error types for the gifpick picker.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Search errors - surfaced to the picker as an inline error state.
///
/// Payloads are plain strings so the error can live inside state snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Network error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("Search API returned HTTP {status}{}", detail(.message))]
    Status { status: u16, message: Option<String> },

    /// The body was not the JSON shape the picker expects.
    #[error("Unexpected response from search API: {0}")]
    Malformed(String),

    /// No response within the configured timeout.
    #[error("Search timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The request URL could not be built from the configured endpoint.
    #[error("Invalid search URL: {0}")]
    InvalidUrl(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("Failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// No API key in the config file or the environment.
    #[error("Missing API key (set `api_key` in the config file or GIPHY_API_KEY)")]
    MissingApiKey,

    /// Endpoint is not an absolute http(s) URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let error = SearchError::Status {
            status: 403,
            message: Some("Invalid authentication credentials".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Search API returned HTTP 403: Invalid authentication credentials"
        );

        let error = SearchError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(error.to_string(), "Search API returned HTTP 500");
    }

    #[test]
    fn test_timeout_error_message() {
        let error = SearchError::Timeout {
            duration: Duration::from_secs(3),
        };
        assert!(error.to_string().contains("3s"));
    }
}

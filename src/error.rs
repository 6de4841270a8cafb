//! Error types for pagecache
//!
//! All fallible public APIs return `Result<T, Error>` where Error is defined here.
//! Per-page fetch failures are not propagated through navigation calls; they are
//! stored in the page cache as [`FetchError`] handles instead.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The main error type for pagecache
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Missing field '{path}' in response")]
    MissingField { path: String },

    // ============================================================================
    // Driver Errors
    // ============================================================================
    #[error("Completion channel closed")]
    ChannelClosed,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }
}

/// Result type alias for pagecache
pub type Result<T> = std::result::Result<T, Error>;

/// Shared handle to a fetch failure stored in the page cache.
///
/// Cache snapshots are cloned on every transition, so the error itself is kept
/// behind an `Arc`. Two handles compare equal when they render the same message.
#[derive(Debug, Clone)]
pub struct FetchError(Arc<Error>);

impl FetchError {
    /// Wrap an error for storage in the cache
    pub fn new(error: Error) -> Self {
        Self(Arc::new(error))
    }

    /// Borrow the underlying error
    pub fn inner(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for FetchError {
    fn from(error: Error) -> Self {
        Self::new(error)
    }
}

impl PartialEq for FetchError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.to_string() == other.0.to_string()
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("source missing");
        assert_eq!(err.to_string(), "Configuration error: source missing");

        let err = Error::invalid_value("per_page", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'per_page': must be at least 1"
        );

        let err = Error::http_status(404, "no such page");
        assert_eq!(err.to_string(), "HTTP 404: no such page");

        let err = Error::missing_field("meta.total");
        assert_eq!(err.to_string(), "Missing field 'meta.total' in response");
    }

    #[test]
    fn test_fetch_error_equality() {
        let a = FetchError::new(Error::http_status(503, "down"));
        let b = FetchError::new(Error::http_status(503, "down"));
        let c = FetchError::new(Error::http_status(500, "down"));

        assert_eq!(a, a.clone());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "HTTP 503: down");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::missing_field("total"));
        let err = result.context("page 3").unwrap_err();
        assert_eq!(err.to_string(), "page 3: Missing field 'total' in response");

        let result: Result<()> = Err(Error::decode("not an array"));
        let err = result.with_context(|| format!("page {}", 7)).unwrap_err();
        assert!(err.to_string().starts_with("page 7: "));
    }
}

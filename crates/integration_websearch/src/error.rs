//! Web search error types

use thiserror::Error;

/// Errors that can occur while talking to a search backend
#[derive(Debug, Error)]
pub enum WebSearchError {
    /// Connection to the search service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Failed to parse response from search service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Search query is invalid or empty
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Longest upstream error body kept in [`WebSearchError::HttpStatus`]
pub(crate) const MAX_ERROR_BODY: usize = 512;

impl WebSearchError {
    /// Upstream HTTP status, if the error carries one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the upstream could not be used at all
    ///
    /// Covers network failures, timeouts and unparseable bodies.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::ParseError(_)
        )
    }

    pub(crate) fn from_reqwest(e: &reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout { timeout_secs }
        } else if e.is_decode() {
            Self::ParseError(e.to_string())
        } else {
            Self::ConnectionFailed(e.to_string())
        }
    }

    pub(crate) fn http_status(status: u16, mut body: String) -> Self {
        if body.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Self::HttpStatus { status, body }
    }
}

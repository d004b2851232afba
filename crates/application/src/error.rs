//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Caller supplied invalid input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Upstream could not be reached, timed out or answered garbage
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamHttp { status: u16, message: String },

    /// Requested remote resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the failure originates from an upstream service
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::UpstreamHttp { .. }
        )
    }

    /// Whether the failure is the caller's fault
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(_) | Self::Validation(_) | Self::NotFound(_))
    }
}

//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Search query is empty or whitespace only
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Image URL is malformed or uses a scheme other than http/https
    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),

    /// Moderation thresholds violate `0 < strict <= moderate <= 1`
    #[error("Invalid moderation thresholds: moderate={moderate}, strict={strict}")]
    InvalidThresholds { moderate: f32, strict: f32 },

    /// Unknown filter mode name
    #[error("Invalid filter mode: {0}")]
    InvalidFilterMode(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_error_message() {
        assert_eq!(DomainError::EmptyQuery.to_string(), "Query cannot be empty");
    }

    #[test]
    fn invalid_image_url_error_message() {
        let err = DomainError::InvalidImageUrl("ftp://x".to_string());
        assert_eq!(err.to_string(), "Invalid image URL: ftp://x");
    }

    #[test]
    fn invalid_thresholds_error_message() {
        let err = DomainError::InvalidThresholds {
            moderate: 0.3,
            strict: 0.5,
        };
        assert!(err.to_string().contains("moderate=0.3"));
        assert!(err.to_string().contains("strict=0.5"));
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("field is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: field is required");
    }
}

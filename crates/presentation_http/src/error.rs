//! API error handling
//!
//! Maps application failures onto HTTP statuses with a stable
//! `{error, code, details?}` body. In production, internal and upstream
//! details are withheld.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details are included in responses
///
/// Set to `false` in production.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Replace messages that may carry hosts, paths or transport details
///
/// Development mode returns the message unchanged.
fn sanitize_error_message(msg: &str) -> String {
    if should_expose_details() {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/Users/",
        "/var/",
        "/etc/",
        "C:\\",
        "panicked at",
        ".rs:",
        "connection refused",
        "dns error",
        "tcp connect",
        "timed out",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| msg_lower.contains(&pattern.to_lowercase()))
    {
        return "An error occurred processing your request".to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An upstream service failed; `upstream_status` is set when it answered
    #[error("Bad gateway: {message}")]
    BadGateway {
        upstream_status: Option<u16>,
        message: String,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Status returned by the upstream service, when known
    #[serde(rename = "upstreamStatus", skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status this error maps to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(msg) => ErrorResponse {
                error: sanitize_error_message(&msg),
                code: "bad_request".to_string(),
                upstream_status: None,
                details: None,
            },
            Self::NotFound(msg) => ErrorResponse {
                error: sanitize_error_message(&msg),
                code: "not_found".to_string(),
                upstream_status: None,
                details: None,
            },
            Self::BadGateway {
                upstream_status,
                message,
            } => {
                let error = upstream_status.map_or_else(
                    || "Upstream service unavailable".to_string(),
                    |status| format!("Upstream service returned HTTP {status}"),
                );
                ErrorResponse {
                    error,
                    code: "bad_gateway".to_string(),
                    upstream_status,
                    details: should_expose_details().then_some(message),
                }
            },
            Self::ServiceUnavailable(msg) => ErrorResponse {
                error: if should_expose_details() {
                    msg
                } else {
                    "Service temporarily unavailable".to_string()
                },
                code: "service_unavailable".to_string(),
                upstream_status: None,
                details: None,
            },
            Self::Internal(msg) => ErrorResponse {
                error: "An internal error occurred".to_string(),
                code: "internal_error".to_string(),
                upstream_status: None,
                details: should_expose_details().then_some(msg),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Validation(msg) => Self::BadRequest(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::UpstreamUnavailable(message) => Self::BadGateway {
                upstream_status: None,
                message,
            },
            ApplicationError::UpstreamHttp { status, message } => Self::BadGateway {
                upstream_status: Some(status),
                message,
            },
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

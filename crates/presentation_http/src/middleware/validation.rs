//! Request validation
//!
//! `ValidatedJson` deserializes a JSON body and runs the `validator` rules on
//! it. Both failure kinds render as a 400 in the shared API error shape.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::JsonError(rejection) => Self::BadRequest(rejection.body_text()),
            ValidationError::ValidationFailed(msg) => Self::BadRequest(msg),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {detail}")
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// A JSON extractor that also validates the request body
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Body {
///     #[validate(range(min = 1, max = 50))]
///     limit: usize,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<Body>) {}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;
        Ok(Self(value))
    }
}

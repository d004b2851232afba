//! Request ID middleware for HTTP request correlation
//!
//! Every request runs inside an `http_request` span carrying a UUID v7
//! `request_id`. A well-formed `X-Request-Id` from the client is reused;
//! anything else is replaced. The id is echoed on every response, errors
//! included.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{body::Body, extract::Request, http::header::HeaderValue, response::Response};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// The header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Layer that adds request ID handling to HTTP services
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that extracts or generates a request ID for each request
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

/// Reuse the client's id when it parses as a UUID, otherwise mint a v7
fn resolve_request_id(request: &Request<Body>) -> Uuid {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .unwrap_or_else(Uuid::now_v7)
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = resolve_request_id(&request);
        request.extensions_mut().insert(RequestId(request_id));

        let method = request.method().to_string();
        let path = request.uri().path().to_string();
        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );

        // Take the service that was driven to readiness, leave a clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;
                if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Request ID extracted from the request headers or generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Router, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn echo_id(Extension(id): Extension<RequestId>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo_id))
            .layer(RequestIdLayer::new())
    }

    async fn call(request: Request<Body>) -> (Option<String>, String) {
        let response = app().oneshot(request).await.unwrap();
        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn generates_v7_when_absent() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (header, body) = call(request).await;

        let header = header.unwrap();
        assert_eq!(header, body);
        assert_eq!(Uuid::parse_str(&header).unwrap().get_version_num(), 7);
    }

    #[tokio::test]
    async fn reuses_client_uuid() {
        let client_id = Uuid::now_v7().to_string();
        let request = Request::builder()
            .uri("/")
            .header("X-Request-Id", &client_id)
            .body(Body::empty())
            .unwrap();
        let (header, body) = call(request).await;

        assert_eq!(header.as_deref(), Some(client_id.as_str()));
        assert_eq!(body, client_id);
    }

    #[tokio::test]
    async fn replaces_malformed_id() {
        let request = Request::builder()
            .uri("/")
            .header("X-Request-Id", "not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let (header, _) = call(request).await;

        let header = header.unwrap();
        assert_ne!(header, "not-a-uuid");
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[test]
    fn request_id_display() {
        let id = RequestId(Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
        assert_eq!(id.as_uuid(), Uuid::nil());
    }
}

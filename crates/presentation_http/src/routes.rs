//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes
///
/// Every response, including errors and unmatched paths, carries
/// `X-Request-Id`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Safe search
        .route("/search", post(handlers::search::search))
        .route("/media/proxy", get(handlers::media::proxy_image))
        .with_state(state)
        .layer(RequestIdLayer::new())
}

//! NetSentinel HTTP presentation layer
//!
//! Exposes the safe-search pipeline over HTTP:
//! - `POST /search`: filtered, classified web results
//! - `GET /media/proxy`: moderated third-party images
//! - `GET /health`, `GET /ready`: liveness and readiness

pub mod config_reload;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config_reload::{ReloadableConfig, spawn_config_reload_handler};
pub use error::ApiError;
pub use middleware::{RequestIdLayer, ValidatedJson, ValidationError};
pub use routes::create_router;
pub use state::AppState;

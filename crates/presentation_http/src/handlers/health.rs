//! Health check handlers

use std::collections::BTreeMap;

use application::{HealthReport, ServiceHealth};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Per-dependency status, keyed `search` and `detector`
    pub services: BTreeMap<String, ServiceStatus>,
}

/// Status of a dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ServiceHealth> for ServiceStatus {
    fn from(health: ServiceHealth) -> Self {
        Self {
            healthy: health.healthy,
            name: health.info,
            response_time_ms: health.response_time_ms,
            error: health.error,
        }
    }
}

impl From<HealthReport> for ReadinessResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            ready: report.ready,
            services: report
                .services
                .into_iter()
                .map(|(name, health)| (name, health.into()))
                .collect(),
        }
    }
}

/// Readiness check - can the search provider take traffic?
///
/// The detector is reported but only gates readiness when configured to;
/// moderation fails open without it.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let response = ReadinessResponse::from(state.health_service.check_all().await);
    let status_code = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

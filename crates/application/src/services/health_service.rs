//! Readiness aggregation service
//!
//! Checks the search provider and the nudity detector with a bounded
//! timeout each and reports per-dependency status.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::ports::{NudityDetectorPort, SearchProviderPort};

/// Default timeout for a single dependency check in seconds
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Configuration for health check behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Timeout per dependency check in seconds (default: 5)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Whether an unhealthy detector makes the service not ready
    ///
    /// The gate fails open, so by default a broken detector only degrades
    /// moderation and does not take the service out of rotation.
    #[serde(default)]
    pub require_detector: bool,
}

const fn default_timeout() -> u64 {
    DEFAULT_HEALTH_CHECK_TIMEOUT_SECS
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            require_detector: false,
        }
    }
}

/// Status of an individual dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy status with additional info
    #[must_use]
    pub fn healthy_with_info(info: impl Into<String>) -> Self {
        Self {
            healthy: true,
            info: Some(info.into()),
            response_time_ms: None,
            error: None,
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            info: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    /// Create an unhealthy status due to timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }

    /// Add response time to the status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Readiness report across dependencies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Whether the service should receive traffic
    pub ready: bool,
    pub services: HashMap<String, ServiceHealth>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    /// Get status of a specific dependency
    #[must_use]
    pub fn service_status(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }
}

/// Service for aggregating dependency health
pub struct HealthService {
    config: HealthConfig,
    provider: Arc<dyn SearchProviderPort>,
    detector: Arc<dyn NudityDetectorPort>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("config", &self.config)
            .field("provider", &self.provider.provider_name())
            .field("detector", &self.detector.name())
            .finish()
    }
}

impl HealthService {
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProviderPort>, detector: Arc<dyn NudityDetectorPort>) -> Self {
        Self {
            config: HealthConfig::default(),
            provider,
            detector,
        }
    }

    /// Set the health check configuration
    #[must_use]
    pub const fn with_config(mut self, config: HealthConfig) -> Self {
        self.config = config;
        self
    }

    /// Check every dependency
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let (search, detector) = tokio::join!(self.check_search(), self.check_detector());

        let ready = search.healthy && (detector.healthy || !self.config.require_detector);
        let services = HashMap::from([
            ("search".to_string(), search),
            ("detector".to_string(), detector),
        ]);

        HealthReport {
            ready,
            services,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Check the search provider
    pub async fn check_search(&self) -> ServiceHealth {
        let name = self.provider.provider_name().to_string();
        self.timed(&name, self.provider.is_healthy()).await
    }

    /// Check the nudity detector
    pub async fn check_detector(&self) -> ServiceHealth {
        let name = self.detector.name().to_string();
        self.timed(&name, self.detector.is_healthy()).await
    }

    async fn timed(&self, name: &str, check: impl Future<Output = bool>) -> ServiceHealth {
        let start = Instant::now();
        let Ok(healthy) = timeout(Duration::from_secs(self.config.timeout_secs), check).await
        else {
            warn!(dependency = %name, "Health check timed out");
            return ServiceHealth::timeout();
        };

        let response_time = start.elapsed().as_millis() as u64;
        if healthy {
            debug!(dependency = %name, response_time_ms = response_time, "Dependency healthy");
            ServiceHealth::healthy_with_info(name).with_response_time(response_time)
        } else {
            warn!(dependency = %name, response_time_ms = response_time, "Dependency unhealthy");
            ServiceHealth::unhealthy(format!("{name} reports unhealthy"))
                .with_response_time(response_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockNudityDetectorPort, MockSearchProviderPort};

    fn provider(healthy: bool) -> MockSearchProviderPort {
        let mut provider = MockSearchProviderPort::new();
        provider.expect_is_healthy().returning(move || healthy);
        provider
            .expect_provider_name()
            .return_const("wikipedia".to_string());
        provider
    }

    fn detector(healthy: bool) -> MockNudityDetectorPort {
        let mut detector = MockNudityDetectorPort::new();
        detector.expect_is_healthy().returning(move || healthy);
        detector.expect_name().return_const("nudenet-http".to_string());
        detector
    }

    fn service(search_ok: bool, detector_ok: bool) -> HealthService {
        HealthService::new(Arc::new(provider(search_ok)), Arc::new(detector(detector_ok)))
    }

    #[test]
    fn health_config_default() {
        let config = HealthConfig::default();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.require_detector);
    }

    #[test]
    fn service_health_timeout() {
        let status = ServiceHealth::timeout();
        assert!(!status.healthy);
        assert!(status.error.as_ref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn all_healthy_is_ready() {
        let report = service(true, true).check_all().await;
        assert!(report.ready);
        let search = report.service_status("search").unwrap();
        assert!(search.healthy);
        assert_eq!(search.info.as_deref(), Some("wikipedia"));
    }

    #[tokio::test]
    async fn unhealthy_search_is_not_ready() {
        let report = service(false, true).check_all().await;
        assert!(!report.ready);
        assert!(!report.service_status("search").unwrap().healthy);
    }

    #[tokio::test]
    async fn unhealthy_detector_degrades_only_by_default() {
        let report = service(true, false).check_all().await;
        assert!(report.ready);
        assert!(!report.service_status("detector").unwrap().healthy);
    }

    #[tokio::test]
    async fn required_detector_gates_readiness() {
        let svc = service(true, false).with_config(HealthConfig {
            require_detector: true,
            ..HealthConfig::default()
        });
        assert!(!svc.check_all().await.ready);
    }

    #[test]
    fn health_report_serialization() {
        let report = HealthReport {
            ready: true,
            services: HashMap::from([(
                "search".to_string(),
                ServiceHealth::healthy_with_info("searxng"),
            )]),
            checked_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ready"], true);
        assert_eq!(json["services"]["search"]["info"], "searxng");
        assert!(json["services"]["search"].get("error").is_none());
    }
}

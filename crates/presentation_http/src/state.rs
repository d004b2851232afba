//! Application state shared across handlers

use std::sync::Arc;

use application::{HealthService, MediaProxyService, SearchService};

use crate::config_reload::ReloadableConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Search pipeline: provider, policy filter, classification, history
    pub search_service: Arc<SearchService>,
    /// Image proxy: fetch, moderation gate, re-encoding
    pub media_proxy: Arc<MediaProxyService>,
    /// Dependency health for readiness probes
    pub health_service: Arc<HealthService>,
    /// Application configuration
    pub config: ReloadableConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("search_service", &self.search_service)
            .field("media_proxy", &"<MediaProxyService>")
            .field("health_service", &self.health_service)
            .field("config", &self.config)
            .finish()
    }
}

//! Settings adapter - Implements SettingsPort over a swappable snapshot
//!
//! Reads are lock-free. A configuration reload publishes a new snapshot with
//! [`ConfigSettingsStore::replace`]; in-flight requests keep the one they read.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::SettingsPort;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use domain::SafeSearchSettings;
use tracing::info;

use crate::config::SafeSearchAppConfig;

/// Global safe-search settings backed by configuration
#[derive(Debug)]
pub struct ConfigSettingsStore {
    current: ArcSwap<SafeSearchSettings>,
}

impl ConfigSettingsStore {
    #[must_use]
    pub fn new(settings: SafeSearchSettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    #[must_use]
    pub fn from_config(config: &SafeSearchAppConfig) -> Self {
        Self::new(config.to_settings())
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<SafeSearchSettings> {
        self.current.load_full()
    }

    /// Publish a new snapshot
    pub fn replace(&self, settings: SafeSearchSettings) {
        info!(
            default_mode = %settings.default_mode,
            blocked_keywords = settings.policy.blocked_keywords().len(),
            allowed_domains = settings.policy.allowed_domains().len(),
            save_search_history = settings.save_search_history,
            "Safe-search settings updated"
        );
        self.current.store(Arc::new(settings));
    }
}

impl Default for ConfigSettingsStore {
    fn default() -> Self {
        Self::new(SafeSearchSettings::default())
    }
}

#[async_trait]
impl SettingsPort for ConfigSettingsStore {
    async fn current(&self) -> Result<SafeSearchSettings, ApplicationError> {
        Ok(self.current.load().as_ref().clone())
    }
}

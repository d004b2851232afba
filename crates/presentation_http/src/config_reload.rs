//! Hot-reloadable configuration support
//!
//! SIGHUP re-reads the configuration file and environment. The safe-search
//! section (default mode, keyword and domain lists, history toggle) takes
//! effect immediately through the settings store. Server, search backend,
//! moderation and media sections are only picked up on restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use infrastructure::{AppConfig, ConfigSettingsStore};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// A wrapper around `AppConfig` that supports atomic reload via SIGHUP
#[derive(Debug, Clone)]
pub struct ReloadableConfig {
    inner: Arc<ArcSwap<AppConfig>>,
    /// File the configuration was loaded from, if given explicitly
    path: Option<PathBuf>,
    /// Store that receives the refreshed safe-search snapshot
    settings: Arc<ConfigSettingsStore>,
    /// Notifier for config change events
    notify: watch::Sender<u64>,
    /// Receiver for config change events
    receiver: watch::Receiver<u64>,
}

impl ReloadableConfig {
    /// Create a new reloadable configuration
    #[must_use]
    pub fn new(config: AppConfig, settings: Arc<ConfigSettingsStore>) -> Self {
        let (notify, receiver) = watch::channel(0);
        Self {
            inner: Arc::new(ArcSwap::new(Arc::new(config))),
            path: None,
            settings,
            notify,
            receiver,
        }
    }

    /// Reload from `path` instead of the default `config.*`
    #[must_use]
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.path = path;
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn load(&self) -> Arc<AppConfig> {
        self.inner.load_full()
    }

    /// Configuration file used for reloads
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reload configuration from disk and environment
    ///
    /// Returns `true` if the new configuration was valid and applied. An
    /// invalid configuration leaves everything untouched.
    pub fn reload(&self) -> bool {
        match AppConfig::load_validated(self.path.as_deref()) {
            Ok(new_config) => {
                self.apply(new_config);
                true
            },
            Err(e) => {
                error!(error = %e, "Failed to reload configuration");
                false
            },
        }
    }

    /// Swap in an already-validated configuration
    pub fn apply(&self, new_config: AppConfig) {
        self.settings.replace(new_config.safe_search.to_settings());
        let old_config = self.inner.swap(Arc::new(new_config));
        info!(
            old_default_mode = %old_config.safe_search.default_mode,
            "Configuration reloaded successfully"
        );

        let version = *self.notify.borrow() + 1;
        if self.notify.send(version).is_err() {
            warn!("No config change receivers active");
        }
    }

    /// Subscribe to configuration change notifications
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.receiver.clone()
    }
}

/// Spawn a background task that listens for SIGHUP and reloads configuration
#[cfg(unix)]
pub fn spawn_config_reload_handler(config: ReloadableConfig) -> ReloadableConfig {
    use tokio::signal::unix::{SignalKind, signal};

    let config_clone = config.clone();
    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Failed to install SIGHUP handler");
                return;
            },
        };

        loop {
            sighup.recv().await;
            info!("Received SIGHUP, reloading configuration");
            if !config_clone.reload() {
                warn!("Configuration reload failed, keeping previous config");
            }
        }
    });

    config
}

/// No-op on non-Unix systems
#[cfg(not(unix))]
pub fn spawn_config_reload_handler(config: ReloadableConfig) -> ReloadableConfig {
    warn!("SIGHUP config reload not supported on this platform");
    config
}

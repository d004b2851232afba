//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `safe_search`: default filter mode, keyword and domain lists, history toggle
//! - `moderation`: censoring thresholds and the vision backend
//! - `media`: remote image fetch limits
//!
//! The search backend section reuses [`WebSearchConfig`] directly.

mod media;
mod moderation;
mod safe_search;
mod server;

use std::fmt;
use std::path::Path;

use integration_websearch::WebSearchConfig;
use serde::{Deserialize, Serialize};

pub use media::MediaConfig;
pub use moderation::ModerationAppConfig;
pub use safe_search::SafeSearchAppConfig;
pub use server::ServerConfig;

use crate::telemetry::{LogFormat, TelemetryConfig};

/// Prefix for environment overrides, e.g. `NETSENTINEL_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "NETSENTINEL";

/// Default configuration file stem (`config.toml`, `config.yaml`, ...)
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Controls how much detail error responses expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - internal error details are returned
    #[default]
    Development,
    /// Production environment - internal error details are hidden
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream search backend
    #[serde(default)]
    pub search: WebSearchConfig,

    /// Global safe-search settings
    #[serde(default)]
    pub safe_search: SafeSearchAppConfig,

    /// Image moderation
    #[serde(default)]
    pub moderation: ModerationAppConfig,

    /// Remote media fetching
    #[serde(default)]
    pub media: MediaConfig,
}

impl AppConfig {
    /// Load configuration from `config.*` in the working directory and
    /// `NETSENTINEL_*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or the default `config.*`)
    /// with environment overrides on top
    ///
    /// Environment keys use `__` between nested sections:
    /// `NETSENTINEL_SAFE_SEARCH__DEFAULT_MODE=strict`. List values are
    /// comma-separated.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .with_list_parse_key("safe_search.blocked_keywords")
                    .with_list_parse_key("safe_search.allowed_domains")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load and validate, the way the server does at startup
    ///
    /// # Errors
    ///
    /// Returns `config::ConfigError::Message` if any section is invalid.
    pub fn load_validated(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let config = Self::load_from(path)?;
        config.validate().map_err(config::ConfigError::Message)?;
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.search
            .validate()
            .map_err(|e| format!("search: {e}"))?;
        self.moderation.validate()?;
        self.media.validate()?;
        Ok(())
    }

    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    /// Logging settings derived from the server section
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            format: LogFormat::parse(&self.server.log_format),
            ..TelemetryConfig::default()
        }
    }
}

//! Web search configuration

use std::fmt;

use domain::DEFAULT_PROXY_PATH;
use serde::{Deserialize, Serialize};

/// Which upstream backend serves searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Encyclopedia search, text-only results
    #[default]
    Wikipedia,
    /// Self-hosted metasearch with thumbnails
    Searxng,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wikipedia => f.write_str("wikipedia"),
            Self::Searxng => f.write_str("searxng"),
        }
    }
}

/// Configuration for search backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Active backend
    #[serde(default)]
    pub provider: ProviderKind,

    /// Wikipedia API base URL (the `/w/api.php` path is appended)
    #[serde(default = "default_wikipedia_base_url")]
    pub wikipedia_base_url: String,

    /// Prefix for article links built from result titles
    #[serde(default = "default_wikipedia_article_base")]
    pub wikipedia_article_base: String,

    /// SearXNG instance base URL
    #[serde(default = "default_searxng_base_url")]
    pub searxng_base_url: String,

    /// SearXNG `safesearch` parameter: 0 (off), 1 (moderate), 2 (strict)
    #[serde(default = "default_searxng_safesearch")]
    pub searxng_safesearch: u8,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path thumbnails are rewritten to
    #[serde(default = "default_proxy_path")]
    pub proxy_path: String,

    /// Outbound User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_wikipedia_base_url() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_wikipedia_article_base() -> String {
    "https://en.wikipedia.org/wiki/".to_string()
}

fn default_searxng_base_url() -> String {
    "http://localhost:8888".to_string()
}

const fn default_searxng_safesearch() -> u8 {
    1
}

const fn default_timeout_secs() -> u64 {
    5
}

fn default_proxy_path() -> String {
    DEFAULT_PROXY_PATH.to_string()
}

fn default_user_agent() -> String {
    format!("NetSentinelSafeSearch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            wikipedia_base_url: default_wikipedia_base_url(),
            wikipedia_article_base: default_wikipedia_article_base(),
            searxng_base_url: default_searxng_base_url(),
            searxng_safesearch: default_searxng_safesearch(),
            timeout_secs: default_timeout_secs(),
            proxy_path: default_proxy_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl WebSearchConfig {
    /// Create a configuration for testing against a mock server
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            wikipedia_base_url: base_url.to_string(),
            searxng_base_url: base_url.to_string(),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.searxng_safesearch > 2 {
            return Err("searxng_safesearch must be 0, 1 or 2".to_string());
        }

        if !self.proxy_path.starts_with('/') {
            return Err("proxy_path must be an absolute path".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        let base = match self.provider {
            ProviderKind::Wikipedia => &self.wikipedia_base_url,
            ProviderKind::Searxng => &self.searxng_base_url,
        };
        url::Url::parse(base).map_err(|e| format!("invalid {} base URL: {e}", self.provider))?;

        Ok(())
    }
}

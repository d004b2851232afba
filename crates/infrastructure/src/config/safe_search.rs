//! Global safe-search settings.

use domain::{FilterMode, PolicyConfig, SafeSearchSettings};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Safe-search defaults applied when a request carries no override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeSearchAppConfig {
    /// Mode used when the request does not name one
    #[serde(default = "default_mode")]
    pub default_mode: FilterMode,

    /// Case-insensitive substrings that block a result
    #[serde(default)]
    pub blocked_keywords: Vec<String>,

    /// Domains results must belong to (empty = any domain)
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Record completed searches in the history store
    #[serde(default = "default_true")]
    pub save_search_history: bool,
}

const fn default_mode() -> FilterMode {
    FilterMode::Moderate
}

impl Default for SafeSearchAppConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            blocked_keywords: Vec::new(),
            allowed_domains: Vec::new(),
            save_search_history: true,
        }
    }
}

impl SafeSearchAppConfig {
    /// Build the domain settings snapshot
    ///
    /// Keywords and domains are normalized by the policy; blank entries
    /// disappear.
    #[must_use]
    pub fn to_settings(&self) -> SafeSearchSettings {
        SafeSearchSettings {
            default_mode: self.default_mode,
            policy: PolicyConfig::new(&self.blocked_keywords, &self.allowed_domains),
            save_search_history: self.save_search_history,
        }
    }
}

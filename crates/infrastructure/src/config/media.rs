//! Remote media fetch settings.

use serde::{Deserialize, Serialize};

/// Limits for fetching third-party images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest accepted image body in bytes (default: 10MB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// User-Agent sent to image hosts
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_user_agent() -> String {
    format!("NetSentinelSafeSearch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl MediaConfig {
    /// Validate media settings
    ///
    /// # Errors
    ///
    /// Returns a message for a zero timeout or size limit.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("media.timeout_secs must be greater than zero".to_string());
        }
        if self.max_bytes == 0 {
            return Err("media.max_bytes must be greater than zero".to_string());
        }
        Ok(())
    }
}

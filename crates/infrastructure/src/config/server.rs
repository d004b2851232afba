//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = allow all in dev, none in production)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Graceful shutdown timeout in seconds
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,

    /// Log format: "json" for structured JSON logs, "text" for human-readable
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Maximum body size for JSON requests in bytes (default: 64KB)
    #[serde(default = "default_max_body_json")]
    pub max_body_size_json_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_max_body_json() -> usize {
    64 * 1024 // 64KB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
            shutdown_timeout_secs: Some(30),
            log_format: default_log_format(),
            max_body_size_json_bytes: default_max_body_json(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate server settings
    ///
    /// # Errors
    ///
    /// Returns a message for an empty host, port 0, an unknown log format
    /// or a zero body limit.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be greater than zero".to_string());
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "server.log_format must be 'text' or 'json', got '{}'",
                self.log_format
            ));
        }
        if self.max_body_size_json_bytes == 0 {
            return Err("server.max_body_size_json_bytes must be greater than zero".to_string());
        }
        Ok(())
    }
}

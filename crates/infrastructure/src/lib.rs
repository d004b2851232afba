//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the upstream search
//! backend, remote media fetching, the nudity detector, image censoring,
//! the settings snapshot and the history store. Also owns configuration
//! loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, Environment, MediaConfig, ModerationAppConfig, SafeSearchAppConfig, ServerConfig,
};
pub use persistence::{InMemoryHistoryStore, StoredSearch};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};

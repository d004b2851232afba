//! Logging and tracing setup
//!
//! Console logging through `tracing-subscriber`, human-readable or JSON.

mod logging;

pub use logging::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};

//! Application services - Use case implementations

mod health_service;
mod media_proxy_service;
mod moderation_gate;
mod search_service;

pub use health_service::{HealthConfig, HealthReport, HealthService, ServiceHealth};
pub use media_proxy_service::{MediaProxyService, ProxiedImage};
pub use moderation_gate::ModerationGate;
pub use search_service::{SearchOutcome, SearchRequest, SearchService};

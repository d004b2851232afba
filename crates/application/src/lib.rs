//! Application layer - Use cases and orchestration
//!
//! Defines the ports the safe-search pipeline talks through and the services
//! that orchestrate searching, filtering and image moderation on top of them.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

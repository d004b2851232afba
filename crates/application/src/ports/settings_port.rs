//! Settings port
//!
//! Read-only view of the global safe-search settings. Writes happen through
//! whatever store backs the adapter, never through the pipeline.

use async_trait::async_trait;
use domain::entities::SafeSearchSettings;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading the current safe-search settings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettingsPort: Send + Sync {
    /// Current settings snapshot
    async fn current(&self) -> Result<SafeSearchSettings, ApplicationError>;
}

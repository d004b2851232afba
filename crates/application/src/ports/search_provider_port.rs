//! Search provider port
//!
//! Defines the interface to one upstream search backend. Implementations
//! return normalized results; thumbnails are already rewritten into proxy
//! references by the time they cross this boundary.

use async_trait::async_trait;
use domain::entities::RawResult;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for upstream search backends
///
/// Failure contract: a non-2xx upstream answer maps to
/// [`ApplicationError::UpstreamHttp`], a network failure, timeout or
/// unparseable body maps to [`ApplicationError::UpstreamUnavailable`].
/// Zero hits is a success with an empty list.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchProviderPort: Send + Sync {
    /// Search for `query`, returning at most `limit` results
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawResult>, ApplicationError>;

    /// Check if the backend answers
    async fn is_healthy(&self) -> bool;

    /// Name of the backend (e.g. "wikipedia", "searxng")
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn SearchProviderPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SearchProviderPort>();
    }
}

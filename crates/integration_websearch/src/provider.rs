//! Search provider trait

use async_trait::async_trait;
use domain::RawResult;

use crate::WebSearchError;

/// Trait for search backends
///
/// Implemented by every upstream client (Wikipedia, SearXNG).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a search
    ///
    /// Returns at most `limit` normalized results. Zero hits is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream cannot be reached, answers with a
    /// non-success status or sends an unparseable body.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawResult>, WebSearchError>;

    /// Check if the backend is reachable by running a one-result search
    async fn is_healthy(&self) -> bool {
        self.search("health", 1).await.is_ok()
    }

    /// Get the provider name (e.g., "wikipedia", "searxng")
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock search provider for testing
    pub struct MockSearchProvider {
        pub results: Vec<RawResult>,
        pub should_fail: bool,
    }

    impl MockSearchProvider {
        #[must_use]
        pub const fn new(results: Vec<RawResult>) -> Self {
            Self {
                results,
                should_fail: false,
            }
        }

        #[must_use]
        pub const fn failing(mut self) -> Self {
            self.should_fail = true;
            self
        }
    }

    #[async_trait]
    impl SearchProvider for MockSearchProvider {
        async fn search(
            &self,
            _query: &str,
            limit: usize,
        ) -> Result<Vec<RawResult>, WebSearchError> {
            if self.should_fail {
                return Err(WebSearchError::ConnectionFailed("mock down".to_string()));
            }
            Ok(self.results.iter().take(limit).cloned().collect())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_default_health_check_uses_search() {
        let healthy = MockSearchProvider::new(vec![]);
        assert!(healthy.is_healthy().await);

        let broken = MockSearchProvider::new(vec![]).failing();
        assert!(!broken.is_healthy().await);
    }

    #[tokio::test]
    async fn test_mock_provider_respects_limit() {
        let results = (1..=3)
            .map(|i| RawResult::new(i.to_string(), format!("https://{i}.com"), String::new()))
            .collect();
        let provider = MockSearchProvider::new(results);
        assert_eq!(provider.search("q", 2).await.unwrap().len(), 2);
    }
}

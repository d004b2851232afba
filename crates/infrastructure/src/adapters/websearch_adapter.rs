//! Web search adapter - Implements SearchProviderPort using integration_websearch

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::SearchProviderPort;
use async_trait::async_trait;
use domain::RawResult;
use integration_websearch::{SearchProvider, WebSearchClient, WebSearchConfig, WebSearchError};
use tracing::{debug, instrument};

/// Adapter for the configured upstream search backend
pub struct WebSearchAdapter {
    client: Arc<WebSearchClient>,
}

impl std::fmt::Debug for WebSearchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchAdapter")
            .field("provider", &self.client.provider_name())
            .finish()
    }
}

impl WebSearchAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: WebSearchConfig) -> Result<Self, ApplicationError> {
        let client = WebSearchClient::new(config).map_err(Self::map_error)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create with default configuration (Wikipedia)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_defaults() -> Result<Self, ApplicationError> {
        Self::new(WebSearchConfig::default())
    }

    /// Map integration web search error to application error
    fn map_error(err: WebSearchError) -> ApplicationError {
        match err {
            WebSearchError::HttpStatus { status, body } => ApplicationError::UpstreamHttp {
                status,
                message: body,
            },
            WebSearchError::ConnectionFailed(e) | WebSearchError::ParseError(e) => {
                ApplicationError::UpstreamUnavailable(e)
            },
            WebSearchError::Timeout { timeout_secs } => ApplicationError::UpstreamUnavailable(
                format!("Request timed out after {timeout_secs}s"),
            ),
            WebSearchError::InvalidQuery(e) => ApplicationError::Validation(e),
            WebSearchError::ConfigurationError(e) => ApplicationError::Configuration(e),
        }
    }
}

#[async_trait]
impl SearchProviderPort for WebSearchAdapter {
    #[instrument(skip(self, query), fields(query_len = query.len(), provider = self.client.provider_name()))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawResult>, ApplicationError> {
        let result = self.client.search(query, limit).await;

        match &result {
            Ok(results) => debug!(results = results.len(), "Retrieved search results"),
            Err(e) => debug!(error = %e, "Search failed"),
        }

        result.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }

    fn provider_name(&self) -> &str {
        self.client.provider_name()
    }
}

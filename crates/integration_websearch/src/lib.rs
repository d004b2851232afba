#![forbid(unsafe_code)]
//! Upstream search backends for NetSentinel
//!
//! Provides search via the Wikipedia API (text-only) or a SearXNG instance
//! (results with thumbnails). Whatever the backend, results come back as
//! domain [`RawResult`](domain::RawResult)s with thumbnails already rewritten
//! into same-origin proxy references.
//!
//! # Architecture
//!
//! The crate follows a provider pattern with a common trait [`SearchProvider`]
//! implemented by [`WikipediaClient`] and [`SearxngClient`]. The
//! [`WebSearchClient`] selects one of them from configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_websearch::{SearchProvider, WebSearchClient, WebSearchConfig};
//!
//! let client = WebSearchClient::new(WebSearchConfig::default())?;
//! for result in client.search("Rust programming language", 5).await? {
//!     println!("{} - {}", result.title, result.url);
//! }
//! ```

mod config;
mod error;
mod models;
mod provider;
mod searxng;
mod wikipedia;

pub use config::{ProviderKind, WebSearchConfig};
pub use error::WebSearchError;
pub use models::{NormalizeContext, ProviderHit, SearxngHit, WikipediaHit, clean_snippet};
pub use provider::SearchProvider;
pub use searxng::SearxngClient;
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;
use domain::RawResult;

/// Search client backed by the configured provider
#[derive(Debug)]
pub enum WebSearchClient {
    Wikipedia(WikipediaClient),
    Searxng(SearxngClient),
}

impl WebSearchClient {
    /// Create the client selected by `config.provider`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: WebSearchConfig) -> Result<Self, WebSearchError> {
        config
            .validate()
            .map_err(WebSearchError::ConfigurationError)?;

        Ok(match config.provider {
            ProviderKind::Wikipedia => Self::Wikipedia(WikipediaClient::new(&config)?),
            ProviderKind::Searxng => Self::Searxng(SearxngClient::new(&config)?),
        })
    }

    fn inner(&self) -> &dyn SearchProvider {
        match self {
            Self::Wikipedia(client) => client,
            Self::Searxng(client) => client,
        }
    }
}

#[async_trait]
impl SearchProvider for WebSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawResult>, WebSearchError> {
        self.inner().search(query, limit).await
    }

    async fn is_healthy(&self) -> bool {
        self.inner().is_healthy().await
    }

    fn provider_name(&self) -> &'static str {
        self.inner().provider_name()
    }
}

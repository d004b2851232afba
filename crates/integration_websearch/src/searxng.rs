//! SearXNG metasearch client
//!
//! Queries a SearXNG instance through its JSON output format. Results may
//! carry thumbnails, which are rewritten into proxy references during
//! normalization.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::RawResult;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::WebSearchConfig,
    error::WebSearchError,
    models::{NormalizeContext, ProviderHit, SearxngHit},
    provider::SearchProvider,
};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<SearxngHit>,
}

/// SearXNG JSON API client
#[derive(Debug)]
pub struct SearxngClient {
    client: Client,
    base_url: String,
    safesearch: u8,
    timeout_secs: u64,
    ctx: NormalizeContext,
}

impl SearxngClient {
    /// Create a new SearXNG client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &WebSearchConfig) -> Result<Self, WebSearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| WebSearchError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.searxng_base_url.trim_end_matches('/').to_string(),
            safesearch: config.searxng_safesearch.min(2),
            timeout_secs: config.timeout_secs,
            ctx: NormalizeContext {
                proxy_path: config.proxy_path.clone(),
                wikipedia_article_base: config.wikipedia_article_base.clone(),
            },
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl SearchProvider for SearxngClient {
    #[instrument(skip(self, query), fields(provider = "searxng", query_len = query.len()))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawResult>, WebSearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WebSearchError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        let safesearch = self.safesearch.to_string();
        let start = Instant::now();

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("q", query),
                ("format", "json"),
                ("safesearch", safesearch.as_str()),
                ("pageno", "1"),
            ])
            .send()
            .await
            .map_err(|e| WebSearchError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        debug!(status = %status, "Received SearXNG response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebSearchError::http_status(status.as_u16(), body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| WebSearchError::from_reqwest(&e, self.timeout_secs))?;
        let api: ApiResponse = serde_json::from_slice(&body)
            .map_err(|e| WebSearchError::ParseError(e.to_string()))?;

        let results: Vec<RawResult> = api
            .results
            .into_iter()
            .take(limit)
            .map(|hit| ProviderHit::Searxng(hit).normalize(&self.ctx))
            .collect();

        debug!(
            results = results.len(),
            with_preview = results.iter().filter(|r| r.preview_url.is_some()).count(),
            time_ms = start.elapsed().as_millis(),
            "SearXNG search completed"
        );

        Ok(results)
    }

    fn provider_name(&self) -> &'static str {
        "searxng"
    }
}

//! Wikipedia search API client
//!
//! Uses the MediaWiki `list=search` API. Results are text-only: no
//! thumbnails are requested, so no preview is ever produced.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::RawResult;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::WebSearchConfig,
    error::WebSearchError,
    models::{NormalizeContext, ProviderHit, WikipediaHit},
    provider::SearchProvider,
};

/// Upper bound the MediaWiki API accepts for `srlimit`
const MAX_SRLIMIT: usize = 500;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBlock>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    search: Vec<WikipediaHit>,
}

/// Wikipedia API client
#[derive(Debug)]
pub struct WikipediaClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
    ctx: NormalizeContext,
}

impl WikipediaClient {
    /// Create a new Wikipedia client
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
            base_url: config.wikipedia_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            ctx: NormalizeContext {
                proxy_path: config.proxy_path.clone(),
                wikipedia_article_base: config.wikipedia_article_base.clone(),
            },
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }
}

#[async_trait]
impl SearchProvider for WikipediaClient {
    #[instrument(skip(self, query), fields(provider = "wikipedia", query_len = query.len()))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawResult>, WebSearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WebSearchError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        let srlimit = limit.clamp(1, MAX_SRLIMIT).to_string();
        let start = Instant::now();

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
                ("utf8", "1"),
                ("srlimit", srlimit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WebSearchError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        debug!(status = %status, "Received Wikipedia response");

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
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(|hit| ProviderHit::Wikipedia(hit).normalize(&self.ctx))
            .collect();

        debug!(
            results = results.len(),
            time_ms = start.elapsed().as_millis(),
            "Wikipedia search completed"
        );

        Ok(results)
    }

    fn provider_name(&self) -> &'static str {
        "wikipedia"
    }
}

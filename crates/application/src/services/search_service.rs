//! Search orchestration
//!
//! Resolves the effective filter mode, queries the provider, applies the
//! keyword/domain policy, classifies what passed and decides whether the
//! batch is recorded in history.

use std::sync::Arc;

use chrono::Utc;
use domain::{
    ClassifiedResult, DomainError, FilterMode, RawResult, SearchResponse, infer_has_more,
};
use tracing::{debug, info, instrument};

use crate::error::ApplicationError;
use crate::ports::{
    HistoryEntry, HistoryPort, HistoryResult, RecordedIdentity, SearchProviderPort, SettingsPort,
};

/// A search request as received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    /// Per-request override of the stored default mode
    pub filter_mode: Option<FilterMode>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into(),
            limit,
            filter_mode: None,
        }
    }

    #[must_use]
    pub const fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = Some(mode);
        self
    }
}

/// Result of a completed search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Response shaped for the client
    pub response: SearchResponse,

    /// Number of results the provider returned before filtering
    pub total_results: usize,

    /// Whether the batch was recorded in history
    pub recorded: bool,
}

/// Use case: run a filtered search
pub struct SearchService {
    provider: Arc<dyn SearchProviderPort>,
    settings: Arc<dyn SettingsPort>,
    history: Arc<dyn HistoryPort>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("provider", &self.provider.provider_name())
            .field("settings", &"<SettingsPort>")
            .field("history", &"<HistoryPort>")
            .finish()
    }
}

impl SearchService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn SearchProviderPort>,
        settings: Arc<dyn SettingsPort>,
        history: Arc<dyn HistoryPort>,
    ) -> Self {
        Self {
            provider,
            settings,
            history,
        }
    }

    /// Name of the backing provider
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Run a search end to end
    ///
    /// An empty or whitespace-only query is rejected before the provider is
    /// contacted. Provider failures are surfaced unchanged and never retried.
    #[instrument(
        skip(self, request),
        fields(
            query_len = request.query.len(),
            limit = request.limit,
            provider = %self.provider.provider_name()
        )
    )]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchOutcome, ApplicationError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(DomainError::EmptyQuery.into());
        }
        if request.limit == 0 {
            return Err(ApplicationError::Validation(
                "limit must be at least 1".to_string(),
            ));
        }

        let settings = self.settings.current().await?;
        let mode = FilterMode::resolve(request.filter_mode, settings.default_mode);

        let raw = self.provider.search(query, request.limit).await?;
        let total_results = raw.len();
        let has_more = infer_has_more(total_results, request.limit);

        let outcome = settings.policy.apply(raw, mode);
        let blocked_count = outcome.blocked_count;
        let classified: Vec<ClassifiedResult> = outcome
            .passed
            .into_iter()
            .map(RawResult::into_classified)
            .collect();

        debug!(
            total_results,
            blocked_count,
            filter_mode = %mode,
            "Policy applied"
        );

        let identities = if settings.save_search_history {
            self.record(query, mode, total_results, blocked_count, &classified)
                .await?
        } else {
            RecordedIdentity::synthesize(classified.len(), Utc::now())
        };

        let results = classified
            .into_iter()
            .zip(identities)
            .map(|(result, identity)| result.into_record(identity.id, identity.timestamp))
            .collect::<Vec<_>>();

        info!(
            returned = results.len(),
            blocked_count,
            has_more,
            filter_mode = %mode,
            "Search completed"
        );

        Ok(SearchOutcome {
            response: SearchResponse {
                results,
                has_more,
                blocked_count,
                filter_mode: mode,
            },
            total_results,
            recorded: settings.save_search_history,
        })
    }

    async fn record(
        &self,
        query: &str,
        mode: FilterMode,
        total_results: usize,
        blocked_results: usize,
        classified: &[ClassifiedResult],
    ) -> Result<Vec<RecordedIdentity>, ApplicationError> {
        let entry = HistoryEntry {
            query: query.to_string(),
            filter_mode: mode,
            total_results,
            safe_results: classified.len(),
            blocked_results,
            results: classified.iter().map(HistoryResult::from).collect(),
        };

        let identities = self.history.record(entry).await?;
        if identities.len() != classified.len() {
            return Err(ApplicationError::Internal(format!(
                "history returned {} identities for {} results",
                identities.len(),
                classified.len()
            )));
        }
        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockHistoryPort, MockSearchProviderPort, MockSettingsPort};
    use chrono::TimeZone;
    use domain::{PolicyConfig, ResultType, SafeSearchSettings};

    fn raw(title: &str, url: &str) -> RawResult {
        RawResult::new(title.to_string(), url.to_string(), format!("About {title}"))
    }

    fn three_results() -> Vec<RawResult> {
        vec![
            raw("Cats", "https://en.wikipedia.org/wiki/Cat"),
            raw("Casino", "https://casino.example.com"),
            raw("Dogs", "https://en.wikipedia.org/wiki/Dog").with_preview("/media/proxy?url=d"),
        ]
    }

    fn settings_with(
        default_mode: FilterMode,
        policy: PolicyConfig,
        save_search_history: bool,
    ) -> MockSettingsPort {
        let mut settings = MockSettingsPort::new();
        settings.expect_current().returning(move || {
            Ok(SafeSearchSettings {
                default_mode,
                policy: policy.clone(),
                save_search_history,
            })
        });
        settings
    }

    fn provider_returning(results: Vec<RawResult>) -> MockSearchProviderPort {
        let mut provider = MockSearchProviderPort::new();
        provider
            .expect_search()
            .returning(move |_, _| Ok(results.clone()));
        provider.expect_provider_name().return_const("mock".to_string());
        provider
    }

    fn no_history() -> MockHistoryPort {
        let mut history = MockHistoryPort::new();
        history.expect_record().never();
        history
    }

    fn service(
        provider: MockSearchProviderPort,
        settings: MockSettingsPort,
        history: MockHistoryPort,
    ) -> SearchService {
        SearchService::new(Arc::new(provider), Arc::new(settings), Arc::new(history))
    }

    #[tokio::test]
    async fn empty_query_rejected_before_provider_call() {
        let mut provider = MockSearchProviderPort::new();
        provider.expect_search().never();
        provider.expect_provider_name().return_const("mock".to_string());
        let mut settings = MockSettingsPort::new();
        settings.expect_current().never();

        let svc = service(provider, settings, no_history());
        for query in ["", "   ", "\t\n"] {
            let err = svc.search(SearchRequest::new(query, 10)).await.unwrap_err();
            assert!(matches!(err, ApplicationError::Domain(DomainError::EmptyQuery)));
        }
    }

    #[tokio::test]
    async fn keyword_hit_is_removed_and_counted() {
        let svc = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Moderate, PolicyConfig::new(["casino"], [""; 0]), false),
            no_history(),
        );

        let outcome = svc.search(SearchRequest::new("pets", 10)).await.unwrap();
        assert_eq!(outcome.response.results.len(), 2);
        assert_eq!(outcome.response.blocked_count, 1);
        assert_eq!(outcome.total_results, 3);
        assert!(!outcome.recorded);
    }

    #[tokio::test]
    async fn override_beats_stored_default() {
        let svc = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Strict, PolicyConfig::new(["casino"], [""; 0]), false),
            no_history(),
        );

        let request = SearchRequest::new("pets", 10).with_filter_mode(FilterMode::Relaxed);
        let outcome = svc.search(request).await.unwrap();
        assert_eq!(outcome.response.filter_mode, FilterMode::Relaxed);
        assert_eq!(outcome.response.results.len(), 3);
        assert_eq!(outcome.response.blocked_count, 0);
    }

    #[tokio::test]
    async fn has_more_follows_page_fill() {
        let full = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), false),
            no_history(),
        );
        assert!(full.search(SearchRequest::new("x", 3)).await.unwrap().response.has_more);

        let short = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), false),
            no_history(),
        );
        assert!(!short.search(SearchRequest::new("x", 5)).await.unwrap().response.has_more);
    }

    #[tokio::test]
    async fn history_off_synthesizes_sequential_ids() {
        let svc = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), false),
            no_history(),
        );

        let response = svc.search(SearchRequest::new("x", 10)).await.unwrap().response;
        let ids: Vec<u64> = response.results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(response.results.iter().all(|r| r.timestamp == response.results[0].timestamp));
    }

    #[tokio::test]
    async fn history_on_uses_recorded_identities_and_live_previews() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut history = MockHistoryPort::new();
        history
            .expect_record()
            .withf(|entry| {
                entry.query == "pets"
                    && entry.total_results == 3
                    && entry.safe_results == 2
                    && entry.blocked_results == 1
                    && entry.results.len() == 2
            })
            .times(1)
            .returning(move |_| {
                Ok(vec![
                    RecordedIdentity::new(41, ts),
                    RecordedIdentity::new(42, ts),
                ])
            });

        let svc = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Strict, PolicyConfig::new(["casino"], [""; 0]), true),
            history,
        );

        let outcome = svc.search(SearchRequest::new(" pets ", 10)).await.unwrap();
        assert!(outcome.recorded);
        let results = outcome.response.results;
        assert_eq!(results[0].id, 41);
        assert_eq!(results[1].id, 42);
        assert_eq!(results[1].timestamp, ts);
        assert_eq!(results[1].preview_url.as_deref(), Some("/media/proxy?url=d"));
        assert_eq!(results[1].result_type, ResultType::Image);
    }

    #[tokio::test]
    async fn history_identity_mismatch_is_internal_error() {
        let mut history = MockHistoryPort::new();
        history
            .expect_record()
            .returning(|_| Ok(vec![RecordedIdentity::new(1, Utc::now())]));

        let svc = service(
            provider_returning(three_results()),
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), true),
            history,
        );

        let err = svc.search(SearchRequest::new("x", 10)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }

    #[tokio::test]
    async fn provider_errors_propagate_without_retry() {
        let mut provider = MockSearchProviderPort::new();
        provider.expect_search().times(1).returning(|_, _| {
            Err(ApplicationError::UpstreamHttp {
                status: 503,
                message: "down".to_string(),
            })
        });
        provider.expect_provider_name().return_const("mock".to_string());

        let svc = service(
            provider,
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), false),
            no_history(),
        );

        let err = svc.search(SearchRequest::new("x", 10)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamHttp { status: 503, .. }));
    }

    #[tokio::test]
    async fn zero_results_is_success() {
        let svc = service(
            provider_returning(vec![]),
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), false),
            no_history(),
        );

        let outcome = svc.search(SearchRequest::new("nothing", 10)).await.unwrap();
        assert!(outcome.response.results.is_empty());
        assert!(!outcome.response.has_more);
    }

    #[tokio::test]
    async fn zero_limit_is_validation_error() {
        let mut provider = MockSearchProviderPort::new();
        provider.expect_search().never();
        provider.expect_provider_name().return_const("mock".to_string());
        let svc = service(
            provider,
            settings_with(FilterMode::Moderate, PolicyConfig::unrestricted(), false),
            no_history(),
        );

        let err = svc.search(SearchRequest::new("x", 0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }
}

//! Search result entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{FilterMode, ResultType};

/// A single normalized result as returned by a search provider
///
/// Immutable once produced. `preview_url` is always a same-origin proxy
/// reference, never a raw third-party image URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    /// Title of the result
    pub title: String,

    /// Target URL (may be empty for pure text results)
    pub url: String,

    /// Plain-text snippet
    pub snippet: String,

    /// Proxy reference to a thumbnail, if the upstream provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl RawResult {
    /// Create a result without a preview
    #[must_use]
    pub const fn new(title: String, url: String, snippet: String) -> Self {
        Self {
            title,
            url,
            snippet,
            preview_url: None,
        }
    }

    /// Attach a preview proxy reference
    #[must_use]
    pub fn with_preview(mut self, preview_url: impl Into<String>) -> Self {
        self.preview_url = Some(preview_url.into());
        self
    }

    /// Derive the semantic type of this result
    #[must_use]
    pub fn classify(&self) -> ResultType {
        ResultType::classify(&self.url, self.preview_url.as_deref())
    }

    /// Consume into a classified result
    #[must_use]
    pub fn into_classified(self) -> ClassifiedResult {
        let result_type = self.classify();
        ClassifiedResult {
            raw: self,
            result_type,
        }
    }
}

/// A raw result together with its derived type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResult {
    pub raw: RawResult,
    pub result_type: ResultType,
}

impl ClassifiedResult {
    /// Attach an identity, producing the record shape sent to clients
    #[must_use]
    pub fn into_record(self, id: u64, timestamp: DateTime<Utc>) -> SearchResultRecord {
        SearchResultRecord {
            id,
            title: self.raw.title,
            url: self.raw.url,
            snippet: self.raw.snippet,
            result_type: self.result_type,
            timestamp,
            preview_url: self.raw.preview_url,
        }
    }
}

/// A classified result with an assigned identity and timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRecord {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Response shape of a completed search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Results that passed the policy, in provider order
    pub results: Vec<SearchResultRecord>,

    /// Best-effort: true when the provider filled the requested page
    pub has_more: bool,

    /// How many provider results the policy removed
    pub blocked_count: usize,

    /// The effective mode the request was filtered under
    pub filter_mode: FilterMode,
}

impl SearchResponse {
    /// Check if the response has any results
    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Best-effort "more pages" heuristic: a full page suggests more exist
#[must_use]
pub const fn infer_has_more(returned: usize, limit: usize) -> bool {
    limit > 0 && returned == limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_result() -> RawResult {
        RawResult::new(
            "Rust (programming language)".to_string(),
            "https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string(),
            "Rust is a general-purpose programming language".to_string(),
        )
    }

    #[test]
    fn test_classify_without_preview() {
        assert_eq!(sample_result().classify(), ResultType::Link);
    }

    #[test]
    fn test_classify_with_preview() {
        let result = sample_result().with_preview("/media/proxy?url=x");
        assert_eq!(result.into_classified().result_type, ResultType::Image);
    }

    #[test]
    fn test_into_record_keeps_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = sample_result()
            .with_preview("/media/proxy?url=y")
            .into_classified()
            .into_record(7, ts);

        assert_eq!(record.id, 7);
        assert_eq!(record.timestamp, ts);
        assert_eq!(record.title, "Rust (programming language)");
        assert_eq!(record.preview_url.as_deref(), Some("/media/proxy?url=y"));
        assert_eq!(record.result_type, ResultType::Image);
    }

    #[test]
    fn test_record_serialization_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = sample_result().into_classified().into_record(1, ts);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "link");
        assert_eq!(json["id"], 1);
        assert!(json.get("previewUrl").is_none());
        assert!(json.get("result_type").is_none());
    }

    #[test]
    fn test_response_serialization_shape() {
        let response = SearchResponse {
            results: vec![],
            has_more: false,
            blocked_count: 2,
            filter_mode: FilterMode::Strict,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["hasMore"], false);
        assert_eq!(json["blockedCount"], 2);
        assert_eq!(json["filterMode"], "strict");
        assert!(!response.has_results());
    }

    #[test]
    fn test_has_more_heuristic() {
        assert!(infer_has_more(10, 10));
        assert!(!infer_has_more(9, 10));
        assert!(!infer_has_more(0, 0));
    }
}

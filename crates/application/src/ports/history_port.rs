//! Search history port
//!
//! The history collaborator records a completed search and hands back the
//! durable identity it assigned to each result.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ClassifiedResult, FilterMode, ResultType};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A stored result row
///
/// Deliberately has no preview field: stored rows never cache the external
/// preview target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub result_type: ResultType,
}

impl From<&ClassifiedResult> for HistoryResult {
    fn from(result: &ClassifiedResult) -> Self {
        Self {
            title: result.raw.title.clone(),
            url: result.raw.url.clone(),
            snippet: result.raw.snippet.clone(),
            result_type: result.result_type,
        }
    }
}

/// A completed search batch handed to the history writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub filter_mode: FilterMode,
    pub total_results: usize,
    pub safe_results: usize,
    pub blocked_results: usize,
    pub results: Vec<HistoryResult>,
}

/// Identity assigned to one stored result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedIdentity {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
}

impl RecordedIdentity {
    #[must_use]
    pub const fn new(id: u64, timestamp: DateTime<Utc>) -> Self {
        Self { id, timestamp }
    }

    /// Sequential identities `1..=count` sharing one timestamp
    ///
    /// Used when history is off, purely to give the response its shape.
    #[must_use]
    pub fn synthesize(count: usize, now: DateTime<Utc>) -> Vec<Self> {
        (1..=count as u64).map(|id| Self::new(id, now)).collect()
    }
}

/// Port for recording search history
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HistoryPort: Send + Sync {
    /// Record the batch atomically
    ///
    /// Either the query and all of its results are stored, or nothing is.
    /// On success returns exactly one identity per result, in order.
    async fn record(&self, entry: HistoryEntry) -> Result<Vec<RecordedIdentity>, ApplicationError>;
}

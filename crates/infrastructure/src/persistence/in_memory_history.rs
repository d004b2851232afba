//! In-memory search history store
//!
//! Implements the `HistoryPort`. Each recorded search keeps its summary and
//! result rows; result ids are assigned sequentially across all searches.

use std::collections::VecDeque;

use application::{
    error::ApplicationError,
    ports::{HistoryEntry, HistoryPort, RecordedIdentity},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// Default number of searches retained
pub const DEFAULT_CAPACITY: usize = 1_000;

/// One recorded search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSearch {
    pub entry: HistoryEntry,
    pub identities: Vec<RecordedIdentity>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct HistoryState {
    next_id: u64,
    searches: VecDeque<StoredSearch>,
}

/// Bounded in-memory history
///
/// The oldest search is evicted once `capacity` searches are stored.
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    state: Mutex<HistoryState>,
    capacity: usize,
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store retaining at most `capacity` searches (minimum 1)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                next_id: 1,
                searches: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Number of searches currently stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().searches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored searches, newest first
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<StoredSearch> {
        self.state
            .lock()
            .searches
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HistoryPort for InMemoryHistoryStore {
    #[instrument(skip(self, entry), fields(results = entry.results.len(), mode = %entry.filter_mode))]
    async fn record(&self, entry: HistoryEntry) -> Result<Vec<RecordedIdentity>, ApplicationError> {
        let now = Utc::now();
        let count = entry.results.len() as u64;

        // Single critical section: either the whole batch lands or nothing does
        let mut state = self.state.lock();
        let first_id = state.next_id;
        let next_id = first_id
            .checked_add(count)
            .ok_or_else(|| ApplicationError::Internal("History id space exhausted".to_string()))?;

        let identities: Vec<RecordedIdentity> = (first_id..next_id)
            .map(|id| RecordedIdentity::new(id, now))
            .collect();

        state.next_id = next_id;
        if state.searches.len() >= self.capacity {
            state.searches.pop_front();
        }
        state.searches.push_back(StoredSearch {
            entry,
            identities: identities.clone(),
            recorded_at: now,
        });
        drop(state);

        debug!(first_id, count, "Recorded search history");
        Ok(identities)
    }
}

//! Persistence module
//!
//! In-memory search history.

pub mod in_memory_history;

pub use in_memory_history::{InMemoryHistoryStore, StoredSearch};

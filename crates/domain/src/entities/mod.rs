//! Domain entities - per-request values produced and consumed by the pipeline

mod moderation;
mod policy;
mod search_result;

pub use moderation::{Detection, ModerationDecision, ModerationThresholds};
pub use policy::{FilterOutcome, PolicyConfig, SafeSearchSettings};
pub use search_result::{
    ClassifiedResult, RawResult, SearchResponse, SearchResultRecord, infer_has_more,
};

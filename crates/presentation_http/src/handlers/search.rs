//! Search handler

use application::SearchRequest;
use axum::{Json, extract::State};
use domain::{FilterMode, SearchResponse};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Largest page a client may request
pub const MAX_LIMIT: usize = 50;

const fn default_limit() -> usize {
    10
}

/// Search request body
///
/// Emptiness of `query` is checked by the search service, after trimming.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub query: String,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
    pub limit: usize,

    /// Per-request override of the global default mode
    #[serde(default)]
    pub filter_mode: Option<FilterMode>,
}

/// `POST /search`
#[instrument(skip(state, body), fields(limit = body.limit, filter_mode = ?body.filter_mode))]
pub async fn search(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SearchBody>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mut request = SearchRequest::new(body.query, body.limit);
    if let Some(mode) = body.filter_mode {
        request = request.with_filter_mode(mode);
    }

    let outcome = state.search_service.search(request).await?;
    Ok(Json(outcome.response))
}

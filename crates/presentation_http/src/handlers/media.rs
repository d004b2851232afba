//! Image proxy handler
//!
//! Third-party images only reach clients through this endpoint, after the
//! moderation gate has seen them.

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::{HeaderName, header},
    response::IntoResponse,
};
use domain::FilterMode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Response header telling clients whether the image was censored
pub const CONTENT_MODERATED_HEADER: HeaderName = HeaderName::from_static("x-content-moderated");

/// Proxied images may be cached by the client, never by shared caches
pub const PROXY_CACHE_CONTROL: &str = "private, max-age=300";

/// Browsers must honour the declared image type instead of sniffing
pub const NOSNIFF: &str = "nosniff";

/// Query parameters of `GET /media/proxy`
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
    pub mode: Option<String>,
}

/// `GET /media/proxy?url=...&mode=...`
#[instrument(skip(state, query), fields(mode = ?query.mode))]
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let target = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'url' parameter".to_string()))?;

    let mode = query
        .mode
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(FilterMode::from_str)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let proxied = state.media_proxy.proxy(target, mode).await?;
    debug!(
        bytes = proxied.bytes.len(),
        was_censored = proxied.was_censored,
        effective_mode = %proxied.mode,
        "Image proxied"
    );

    Ok((
        [
            (header::CONTENT_TYPE, proxied.content_type),
            (header::X_CONTENT_TYPE_OPTIONS, NOSNIFF.to_string()),
            (CONTENT_MODERATED_HEADER, proxied.was_censored.to_string()),
            (header::CACHE_CONTROL, PROXY_CACHE_CONTROL.to_string()),
        ],
        proxied.bytes,
    ))
}

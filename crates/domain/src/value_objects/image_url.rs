//! Validated remote image URL
//!
//! The media proxy only ever fetches absolute `http`/`https` URLs. Anything
//! else (relative paths, `file:`, `data:`, `javascript:`) is rejected before
//! a network call is made.

use std::fmt;

use url::Url;

use crate::errors::DomainError;

/// An absolute http(s) URL pointing at remote media
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageUrl(Url);

impl ImageUrl {
    /// Parse and validate a URL
    ///
    /// Clients are told to `encodeURIComponent` the target, and some do it
    /// twice. If the value still looks percent-encoded after the query
    /// extractor decoded it, one more decoding pass is applied.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidImageUrl`] if the value is not an
    /// absolute http or https URL with a host.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let candidate = if has_http_scheme(trimmed) {
            trimmed.to_string()
        } else {
            decode_once(trimmed)
        };

        if !has_http_scheme(&candidate) {
            return Err(DomainError::InvalidImageUrl(trimmed.to_string()));
        }

        let url =
            Url::parse(&candidate).map_err(|_| DomainError::InvalidImageUrl(trimmed.to_string()))?;

        if url.host_str().is_none_or(str::is_empty) {
            return Err(DomainError::InvalidImageUrl(trimmed.to_string()));
        }

        Ok(Self(url))
    }

    /// The URL as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host component
    #[must_use]
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Borrow the parsed URL
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

fn has_http_scheme(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn decode_once(value: &str) -> String {
    url::form_urlencoded::parse(format!("v={value}").as_bytes())
        .find(|(key, _)| key == "v")
        .map(|(_, decoded)| decoded.into_owned())
        .unwrap_or_default()
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

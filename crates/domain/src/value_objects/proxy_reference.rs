//! Same-origin proxy references for third-party images
//!
//! A client must never receive a raw third-party thumbnail URL: loading it
//! directly would skip the moderation gate. Provider adapters therefore
//! rewrite every thumbnail into a proxy reference such as
//! `/media/proxy?url=https%3A%2F%2Fexample.com%2Fa.jpg`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Path the HTTP layer mounts the media proxy on
pub const DEFAULT_PROXY_PATH: &str = "/media/proxy";

/// A proxy URL carrying the original image URL as an encoded parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyReference(String);

impl ProxyReference {
    /// Build a proxy reference for `original` under `proxy_path`
    #[must_use]
    pub fn new(proxy_path: &str, original: &str) -> Self {
        let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
        let separator = if proxy_path.contains('?') { '&' } else { '?' };
        Self(format!("{proxy_path}{separator}url={encoded}"))
    }

    /// Build a proxy reference under [`DEFAULT_PROXY_PATH`]
    #[must_use]
    pub fn for_image(original: &str) -> Self {
        Self::new(DEFAULT_PROXY_PATH, original)
    }

    /// Recover the original URL from a reference string
    ///
    /// Returns `None` if the value carries no `url` parameter.
    #[must_use]
    pub fn original_url(reference: &str) -> Option<String> {
        let (_, query) = reference.split_once('?')?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
    }

    /// The reference as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProxyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProxyReference> for String {
    fn from(reference: ProxyReference) -> Self {
        reference.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_original_in_proxy_path() {
        let reference = ProxyReference::for_image("https://example.com/a b.jpg?w=10&h=20");
        assert!(reference.as_str().starts_with("/media/proxy?url="));
        assert!(!reference.as_str().contains("https://"));
        assert!(!reference.as_str().contains("&h="));
    }

    #[test]
    fn original_is_recoverable() {
        let original = "https://example.com/thumb.png?size=small&x=1";
        let reference = ProxyReference::for_image(original);
        assert_eq!(
            ProxyReference::original_url(reference.as_str()).as_deref(),
            Some(original)
        );
    }

    #[test]
    fn honours_custom_proxy_path() {
        let reference = ProxyReference::new("/api/media/proxy", "https://example.com/a.jpg");
        assert!(reference.as_str().starts_with("/api/media/proxy?url=https%3A%2F%2F"));
    }

    #[test]
    fn appends_to_existing_query() {
        let reference = ProxyReference::new("/media/proxy?v=2", "https://example.com/a.jpg");
        assert!(reference.as_str().starts_with("/media/proxy?v=2&url="));
    }

    #[test]
    fn original_url_missing_param() {
        assert!(ProxyReference::original_url("/media/proxy").is_none());
        assert!(ProxyReference::original_url("/media/proxy?mode=strict").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let reference = ProxyReference::for_image("https://example.com/a.jpg");
        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.starts_with("\"/media/proxy?url="));
    }
}

//! Provider hit models and their normalization
//!
//! Every backend deserializes into its own hit type. [`ProviderHit`] tags
//! them and [`ProviderHit::normalize`] is the one place that turns any hit
//! into a domain [`RawResult`].

use domain::{ProxyReference, RawResult};
use serde::Deserialize;

/// One Wikipedia `list=search` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WikipediaHit {
    pub title: String,
    /// HTML fragment with `<span class="searchmatch">` highlights
    #[serde(default)]
    pub snippet: String,
}

/// One SearXNG JSON result
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearxngHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail_src: Option<String>,
    #[serde(default)]
    pub img_src: Option<String>,
}

impl SearxngHit {
    /// First usable thumbnail source, made absolute
    ///
    /// Protocol-relative sources get `https:`; anything that is not then an
    /// http(s) URL is dropped.
    #[must_use]
    pub fn preview_source(&self) -> Option<String> {
        [&self.thumbnail, &self.thumbnail_src, &self.img_src]
            .into_iter()
            .filter_map(|field| field.as_deref().map(str::trim))
            .find(|value| !value.is_empty())
            .map(|value| {
                if value.starts_with("//") {
                    format!("https:{value}")
                } else {
                    value.to_string()
                }
            })
            .filter(|value| {
                let lower = value.to_ascii_lowercase();
                lower.starts_with("https://") || lower.starts_with("http://")
            })
    }
}

/// A hit from any backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderHit {
    Wikipedia(WikipediaHit),
    Searxng(SearxngHit),
}

/// Settings normalization needs from the client configuration
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    pub proxy_path: String,
    pub wikipedia_article_base: String,
}

impl ProviderHit {
    /// Convert into the uniform result shape
    ///
    /// Thumbnails are rewritten into proxy references; a raw third-party
    /// image URL never leaves this function.
    #[must_use]
    pub fn normalize(self, ctx: &NormalizeContext) -> RawResult {
        match self {
            Self::Wikipedia(hit) => {
                let url = format!(
                    "{}{}",
                    ctx.wikipedia_article_base,
                    hit.title.replace(' ', "_")
                );
                RawResult::new(hit.title, url, clean_snippet(&hit.snippet))
            },
            Self::Searxng(hit) => {
                let preview = hit
                    .preview_source()
                    .map(|source| ProxyReference::new(&ctx.proxy_path, &source).into_string());
                RawResult {
                    title: hit.title.trim().to_string(),
                    url: hit.url.trim().to_string(),
                    snippet: clean_snippet(&hit.content),
                    preview_url: preview,
                }
            },
        }
    }
}

/// Strip HTML tags and unescape the entities upstreams commonly emit
#[must_use]
pub fn clean_snippet(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {},
        }
    }

    text.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> NormalizeContext {
        NormalizeContext {
            proxy_path: "/media/proxy".to_string(),
            wikipedia_article_base: "https://en.wikipedia.org/wiki/".to_string(),
        }
    }

    #[test]
    fn test_clean_snippet_strips_searchmatch() {
        let html = r#"The <span class="searchmatch">cat</span> is a &quot;small&quot; mammal"#;
        assert_eq!(clean_snippet(html), r#"The cat is a "small" mammal"#);
    }

    #[test]
    fn test_clean_snippet_unescapes_once() {
        assert_eq!(clean_snippet("Tom &amp; Jerry &amp;lt;3"), "Tom & Jerry &lt;3");
        assert_eq!(clean_snippet("it&#039;s"), "it's");
    }

    #[test]
    fn test_wikipedia_normalization() {
        let hit = ProviderHit::Wikipedia(WikipediaHit {
            title: "Rust (programming language)".to_string(),
            snippet: "<span class=\"searchmatch\">Rust</span> is fast".to_string(),
        });
        let result = hit.normalize(&ctx());
        assert_eq!(
            result.url,
            "https://en.wikipedia.org/wiki/Rust_(programming_language)"
        );
        assert_eq!(result.snippet, "Rust is fast");
        assert!(result.preview_url.is_none());
    }

    #[test]
    fn test_searxng_thumbnail_becomes_proxy_reference() {
        let hit = ProviderHit::Searxng(SearxngHit {
            title: "Kitten".to_string(),
            url: "https://example.com/kitten".to_string(),
            content: "cute".to_string(),
            thumbnail: Some("https://img.example.com/k.jpg".to_string()),
            ..SearxngHit::default()
        });
        let result = hit.normalize(&ctx());
        let preview = result.preview_url.unwrap();
        assert!(preview.starts_with("/media/proxy?url="));
        assert!(!preview.contains("https://img.example.com"));
        assert_eq!(
            ProxyReference::original_url(&preview).as_deref(),
            Some("https://img.example.com/k.jpg")
        );
    }

    #[test]
    fn test_preview_source_priority_and_protocol_relative() {
        let hit = SearxngHit {
            thumbnail: Some("  ".to_string()),
            thumbnail_src: Some("//cdn.example.com/t.png".to_string()),
            img_src: Some("https://cdn.example.com/full.png".to_string()),
            ..SearxngHit::default()
        };
        assert_eq!(
            hit.preview_source().as_deref(),
            Some("https://cdn.example.com/t.png")
        );
    }

    #[test]
    fn test_non_http_preview_dropped() {
        let hit = SearxngHit {
            thumbnail: Some("data:image/png;base64,AAAA".to_string()),
            ..SearxngHit::default()
        };
        assert!(hit.preview_source().is_none());
    }

    #[test]
    fn test_searxng_without_thumbnail() {
        let hit = ProviderHit::Searxng(SearxngHit {
            title: "Page".to_string(),
            url: "https://example.com".to_string(),
            ..SearxngHit::default()
        });
        assert!(hit.normalize(&ctx()).preview_url.is_none());
    }
}

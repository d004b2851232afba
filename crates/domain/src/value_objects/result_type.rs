//! Semantic result type and the classifier that derives it

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "avif", "tif", "tiff", "ico",
];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv", "m4v", "ogv", "flv"];

const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "dailymotion.com",
    "twitch.tv",
    "tiktok.com",
];

/// What kind of content a search result points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Image,
    Video,
    Link,
    Text,
}

impl ResultType {
    /// Classify a result from its target URL and optional preview
    ///
    /// A non-empty preview always wins: a result that carries a thumbnail is
    /// image content regardless of where it links to. Otherwise the URL path
    /// extension and host decide. The function is total.
    #[must_use]
    pub fn classify(url: &str, preview_url: Option<&str>) -> Self {
        if preview_url.is_some_and(|p| !p.trim().is_empty()) {
            return Self::Image;
        }

        let url = url.trim();
        if url.is_empty() {
            return Self::Text;
        }

        let Ok(parsed) = Url::parse(url) else {
            return Self::Link;
        };

        match extension_of(parsed.path()) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => return Self::Image,
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => return Self::Video,
            _ => {},
        }

        if parsed.host_str().is_some_and(is_video_host) {
            return Self::Video;
        }

        Self::Link
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Link => "link",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn extension_of(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn is_video_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    VIDEO_HOSTS
        .iter()
        .any(|v| host == *v || host.ends_with(&format!(".{v}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_forces_image() {
        assert_eq!(
            ResultType::classify(
                "https://en.wikipedia.org/wiki/Cat",
                Some("/media/proxy?url=x")
            ),
            ResultType::Image
        );
    }

    #[test]
    fn blank_preview_is_ignored() {
        assert_eq!(
            ResultType::classify("https://example.com/page", Some("  ")),
            ResultType::Link
        );
    }

    #[test]
    fn image_extension() {
        assert_eq!(
            ResultType::classify("https://example.com/photos/cat.JPG", None),
            ResultType::Image
        );
        assert_eq!(
            ResultType::classify("https://example.com/a.webp?size=large", None),
            ResultType::Image
        );
    }

    #[test]
    fn video_extension_and_host() {
        assert_eq!(
            ResultType::classify("https://cdn.example.com/clip.mp4", None),
            ResultType::Video
        );
        assert_eq!(
            ResultType::classify("https://www.youtube.com/watch?v=abc", None),
            ResultType::Video
        );
        assert_eq!(
            ResultType::classify("https://youtu.be/abc", None),
            ResultType::Video
        );
    }

    #[test]
    fn lookalike_host_is_not_video() {
        assert_eq!(
            ResultType::classify("https://notyoutube.com/watch", None),
            ResultType::Link
        );
    }

    #[test]
    fn plain_page_is_link() {
        assert_eq!(
            ResultType::classify("https://en.wikipedia.org/wiki/Rust_(programming_language)", None),
            ResultType::Link
        );
    }

    #[test]
    fn empty_url_is_text() {
        assert_eq!(ResultType::classify("", None), ResultType::Text);
        assert_eq!(ResultType::classify("   ", None), ResultType::Text);
    }

    #[test]
    fn unparseable_url_is_link() {
        assert_eq!(ResultType::classify("not a url", None), ResultType::Link);
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(
            ResultType::classify("https://example.com/.png", None),
            ResultType::Link
        );
    }

    #[test]
    fn serialization() {
        assert_eq!(serde_json::to_string(&ResultType::Video).unwrap(), "\"video\"");
    }
}

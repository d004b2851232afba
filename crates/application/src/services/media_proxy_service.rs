//! Media proxy orchestration
//!
//! Fetches a remote image, runs it through the moderation gate under the
//! effective filter mode and hands back JPEG bytes.

use std::sync::Arc;

use bytes::Bytes;
use domain::{FilterMode, ImageUrl};
use tracing::{debug, instrument, warn};

use super::moderation_gate::ModerationGate;
use crate::error::ApplicationError;
use crate::ports::{
    ImageProcessingPort, MediaFetchPort, OUTPUT_CONTENT_TYPE, RemoteMedia, SettingsPort,
};

/// An image ready to be sent to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedImage {
    pub bytes: Bytes,
    pub content_type: String,
    pub was_censored: bool,
    pub mode: FilterMode,
}

/// Use case: proxy a third-party image through the moderation gate
pub struct MediaProxyService {
    fetcher: Arc<dyn MediaFetchPort>,
    settings: Arc<dyn SettingsPort>,
    processor: Arc<dyn ImageProcessingPort>,
    gate: Arc<ModerationGate>,
}

impl std::fmt::Debug for MediaProxyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaProxyService")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl MediaProxyService {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn MediaFetchPort>,
        settings: Arc<dyn SettingsPort>,
        processor: Arc<dyn ImageProcessingPort>,
        gate: Arc<ModerationGate>,
    ) -> Self {
        Self {
            fetcher,
            settings,
            processor,
            gate,
        }
    }

    #[must_use]
    pub fn gate(&self) -> &ModerationGate {
        &self.gate
    }

    /// Fetch, moderate and re-encode the image at `raw_url`
    ///
    /// # Errors
    ///
    /// - invalid URL, non-image content type or undecodable image: validation
    ///   error
    /// - non-success upstream status: [`ApplicationError::NotFound`]
    /// - network failure: [`ApplicationError::UpstreamUnavailable`]
    #[instrument(skip(self, raw_url), fields(requested_mode = ?requested))]
    pub async fn proxy(
        &self,
        raw_url: &str,
        requested: Option<FilterMode>,
    ) -> Result<ProxiedImage, ApplicationError> {
        let url = ImageUrl::parse(raw_url)?;
        debug!(host = %url.host(), "Fetching remote image");

        let (content_type, bytes) = match self.fetcher.fetch(&url).await? {
            RemoteMedia::Image {
                content_type,
                bytes,
            } => (content_type, bytes),
            RemoteMedia::NotAnImage { content_type } => {
                return Err(ApplicationError::Validation(format!(
                    "remote content is not an image: {content_type}"
                )));
            },
            RemoteMedia::Missing { status } => {
                return Err(ApplicationError::NotFound(format!(
                    "remote image returned HTTP {status}"
                )));
            },
        };

        let settings = self.settings.current().await?;
        let mode = FilterMode::resolve(requested, settings.default_mode);

        let decision = self.gate.decide(bytes, mode).await?;
        if decision.was_censored || is_jpeg(&content_type) {
            return Ok(ProxiedImage {
                bytes: decision.output,
                content_type: OUTPUT_CONTENT_TYPE.to_string(),
                was_censored: decision.was_censored,
                mode,
            });
        }

        // Bytes the codec cannot read never leave in their original format
        let jpeg = self
            .processor
            .to_jpeg(decision.output)
            .await
            .map_err(|e| {
                warn!(
                    error = %e,
                    content_type = %content_type,
                    "Transcode failed, rejecting image"
                );
                ApplicationError::Validation(format!("unsupported image format: {content_type}"))
            })?;

        Ok(ProxiedImage {
            bytes: jpeg,
            content_type: OUTPUT_CONTENT_TYPE.to_string(),
            was_censored: false,
            mode,
        })
    }
}

fn is_jpeg(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "image/jpeg" || essence == "image/jpg" || essence == "image/pjpeg"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        DetectorError, MockImageProcessingPort, MockMediaFetchPort, MockNudityDetectorPort,
        MockSettingsPort,
    };
    use domain::{Detection, DomainError, ModerationThresholds, NudityLabel, SafeSearchSettings};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";
    const JPEG: &[u8] = b"\xff\xd8\xffjpeg";

    fn settings(default_mode: FilterMode) -> MockSettingsPort {
        let mut settings = MockSettingsPort::new();
        settings.expect_current().returning(move || {
            Ok(SafeSearchSettings {
                default_mode,
                ..SafeSearchSettings::default()
            })
        });
        settings
    }

    fn fetcher_returning(media: RemoteMedia) -> MockMediaFetchPort {
        let mut fetcher = MockMediaFetchPort::new();
        fetcher.expect_fetch().returning(move |_| Ok(media.clone()));
        fetcher
    }

    fn image(content_type: &str, bytes: &'static [u8]) -> RemoteMedia {
        RemoteMedia::Image {
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    fn detector(result: Result<Vec<Detection>, DetectorError>) -> MockNudityDetectorPort {
        let mut detector = MockNudityDetectorPort::new();
        detector.expect_detect().returning(move |_| result.clone());
        detector.expect_name().return_const("mock".to_string());
        detector
    }

    fn processor() -> MockImageProcessingPort {
        let mut processor = MockImageProcessingPort::new();
        processor
            .expect_blur()
            .returning(|_| Ok(Bytes::from_static(b"\xff\xd8\xffblurred")));
        processor
            .expect_to_jpeg()
            .returning(|_| Ok(Bytes::from_static(JPEG)));
        processor
    }

    fn service_with(
        fetcher: MockMediaFetchPort,
        detector: MockNudityDetectorPort,
        processor: MockImageProcessingPort,
        default_mode: FilterMode,
    ) -> MediaProxyService {
        let processor: Arc<dyn ImageProcessingPort> = Arc::new(processor);
        let gate = ModerationGate::new(
            Arc::new(detector),
            Arc::clone(&processor),
            ModerationThresholds::default(),
        );
        MediaProxyService::new(
            Arc::new(fetcher),
            Arc::new(settings(default_mode)),
            processor,
            Arc::new(gate),
        )
    }

    #[tokio::test]
    async fn invalid_scheme_rejected_before_fetch() {
        let mut fetcher = MockMediaFetchPort::new();
        fetcher.expect_fetch().never();

        let svc = service_with(fetcher, detector(Ok(vec![])), processor(), FilterMode::Moderate);
        let err = svc.proxy("file:///etc/passwd", None).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidImageUrl(_))
        ));
    }

    #[tokio::test]
    async fn html_content_is_validation_error() {
        let svc = service_with(
            fetcher_returning(RemoteMedia::NotAnImage {
                content_type: "text/html".to_string(),
            }),
            detector(Ok(vec![])),
            processor(),
            FilterMode::Moderate,
        );
        let err = svc
            .proxy("https://example.com/page", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_remote_is_not_found() {
        let svc = service_with(
            fetcher_returning(RemoteMedia::Missing { status: 404 }),
            detector(Ok(vec![])),
            processor(),
            FilterMode::Moderate,
        );
        let err = svc
            .proxy("https://example.com/gone.png", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let mut fetcher = MockMediaFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(ApplicationError::UpstreamUnavailable("refused".to_string())));

        let svc = service_with(fetcher, detector(Ok(vec![])), processor(), FilterMode::Moderate);
        let err = svc
            .proxy("https://example.com/a.png", None)
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn clean_png_is_transcoded_to_jpeg() {
        let svc = service_with(
            fetcher_returning(image("image/png", PNG)),
            detector(Ok(vec![])),
            processor(),
            FilterMode::Moderate,
        );
        let proxied = svc.proxy("https://example.com/a.png", None).await.unwrap();
        assert_eq!(proxied.content_type, "image/jpeg");
        assert_eq!(proxied.bytes.as_ref(), JPEG);
        assert!(!proxied.was_censored);
        assert_eq!(proxied.mode, FilterMode::Moderate);
    }

    #[tokio::test]
    async fn clean_jpeg_passes_byte_identical() {
        let mut processor = MockImageProcessingPort::new();
        processor.expect_to_jpeg().never();
        processor.expect_blur().never();

        let original: &'static [u8] = b"\xff\xd8\xfforiginal";
        let svc = service_with(
            fetcher_returning(image("image/jpeg; charset=binary", original)),
            detector(Ok(vec![])),
            processor,
            FilterMode::Strict,
        );
        let proxied = svc.proxy("https://example.com/a.jpg", None).await.unwrap();
        assert_eq!(proxied.bytes.as_ref(), original);
        assert_eq!(proxied.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn explicit_image_is_blurred_under_override() {
        let detections = vec![Detection::new(NudityLabel::AnusExposed, 0.5)];
        let svc = service_with(
            fetcher_returning(image("image/png", PNG)),
            detector(Ok(detections)),
            processor(),
            FilterMode::Relaxed,
        );

        let relaxed = svc.proxy("https://example.com/a.png", None).await.unwrap();
        assert!(!relaxed.was_censored);

        let strict = svc
            .proxy("https://example.com/a.png", Some(FilterMode::Strict))
            .await
            .unwrap();
        assert!(strict.was_censored);
        assert_eq!(strict.mode, FilterMode::Strict);
        assert_eq!(strict.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn undecodable_svg_is_rejected_not_echoed() {
        let mut processor = MockImageProcessingPort::new();
        processor
            .expect_to_jpeg()
            .returning(|_| Err(ApplicationError::Internal("unsupported".to_string())));

        let svg: &'static [u8] =
            b"<svg xmlns=\"http://www.w3.org/2000/svg\"><script>alert(1)</script></svg>";
        let svc = service_with(
            fetcher_returning(image("image/svg+xml", svg)),
            detector(Err(DetectorError::InvalidImage("svg".to_string()))),
            processor,
            FilterMode::Strict,
        );
        let err = svc
            .proxy("https://example.com/a.svg", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(ref m) if m.contains("image/svg+xml")));
    }

    #[test]
    fn jpeg_detection() {
        assert!(is_jpeg("image/jpeg"));
        assert!(is_jpeg("IMAGE/JPEG; q=1"));
        assert!(!is_jpeg("image/png"));
    }
}

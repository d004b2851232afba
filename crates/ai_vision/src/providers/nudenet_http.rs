//! NudeNet HTTP detector
//!
//! Talks to a NudeNet inference server. The image is posted as multipart
//! field `f1` to `{endpoint}/infer`; the server answers with one prediction
//! list per uploaded file:
//!
//! ```json
//! {"prediction": [[{"class": "FACE_FEMALE", "score": 0.81, "box": [10, 20, 64, 64]}]], "success": true}
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use domain::{Detection, NudityLabel};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::best_per_label;
use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::ports::ExplicitContentDetector;

/// Longest error body kept in `VisionError::HttpStatus`
const MAX_ERROR_BODY: usize = 256;

#[derive(Debug, Deserialize)]
struct InferResponse {
    #[serde(default)]
    prediction: Vec<Vec<Prediction>>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    class: String,
    score: f32,
    #[serde(rename = "box", default)]
    #[allow(dead_code)] // Part of the service contract; censoring is whole-image
    bbox: Vec<f32>,
}

/// Detector backed by a remote NudeNet service
#[derive(Debug, Clone)]
pub struct NudeNetHttpDetector {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
    min_score: f32,
}

impl NudeNetHttpDetector {
    /// Create a new HTTP detector
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                VisionError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            min_score: config.min_score,
        })
    }

    fn infer_url(&self) -> String {
        format!("{}/infer", self.endpoint)
    }
}

#[async_trait]
impl ExplicitContentDetector for NudeNetHttpDetector {
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, VisionError> {
        if image.is_empty() {
            return Err(VisionError::Decode("Empty image".to_string()));
        }

        let start = Instant::now();
        let form = Form::new().part("f1", Part::bytes(image.to_vec()).file_name("image"));

        let response = self
            .client
            .post(self.infer_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| VisionError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::HttpStatus {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| VisionError::from_reqwest(&e, self.timeout_secs))?;
        let parsed: InferResponse =
            serde_json::from_slice(&body).map_err(|e| VisionError::ParseError(e.to_string()))?;

        let detections = best_per_label(
            parsed
                .prediction
                .into_iter()
                .next()
                .unwrap_or_default()
                .into_iter()
                .map(|p| (NudityLabel::parse(&p.class), p.score)),
            self.min_score,
        );

        debug!(
            detections = detections.len(),
            time_ms = start.elapsed().as_millis(),
            "NudeNet inference completed"
        );

        Ok(detections)
    }

    async fn is_available(&self) -> bool {
        // Any HTTP answer means the service is listening
        self.client.get(&self.endpoint).send().await.is_ok()
    }

    fn name(&self) -> &str {
        "nudenet-http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_url() {
        let detector =
            NudeNetHttpDetector::new(&VisionConfig::for_testing("http://nudenet:8080/")).unwrap();
        assert_eq!(detector.infer_url(), "http://nudenet:8080/infer");
    }

    #[test]
    fn test_parse_infer_response() {
        let json = r#"{"prediction":[[
            {"class":"FACE_FEMALE","score":0.81,"box":[10,20,64,64]},
            {"class":"FEMALE_BREAST_EXPOSED","score":0.55,"box":[30,90,40,40]}
        ]],"success":true}"#;
        let parsed: InferResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.prediction.len(), 1);
        assert_eq!(parsed.prediction[0][1].class, "FEMALE_BREAST_EXPOSED");
        assert_eq!(parsed.prediction[0][0].bbox.len(), 4);
    }

    #[test]
    fn test_parse_response_without_predictions() {
        let parsed: InferResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(parsed.prediction.is_empty());
    }

    #[tokio::test]
    async fn test_empty_image_rejected_without_request() {
        let detector =
            NudeNetHttpDetector::new(&VisionConfig::for_testing("http://127.0.0.1:1")).unwrap();
        let err = detector.detect(Bytes::new()).await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}

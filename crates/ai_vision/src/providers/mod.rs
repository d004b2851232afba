//! Detector backend implementations
//!
//! - [`NudeNetHttpDetector`]: remote NudeNet service (default)
//! - `OnnxNudeDetector`: in-process NudeNet model, behind the `onnx` feature

mod nudenet_http;
#[cfg(feature = "onnx")]
mod onnx;

use std::sync::Arc;

use domain::{Detection, NudityLabel};

pub use nudenet_http::NudeNetHttpDetector;
#[cfg(feature = "onnx")]
pub use onnx::OnnxNudeDetector;

use crate::config::{VisionBackend, VisionConfig};
use crate::error::VisionError;
use crate::ports::ExplicitContentDetector;

/// Build the detector selected by `config.backend`
///
/// Loading an ONNX model blocks; call this from a blocking context when the
/// ONNX backend is configured.
///
/// # Errors
///
/// Returns `VisionError::Configuration` for invalid settings or a backend this
/// build does not include, and `VisionError::ModelLoad` if the model cannot
/// be loaded.
pub fn build_detector(
    config: &VisionConfig,
) -> Result<Arc<dyn ExplicitContentDetector>, VisionError> {
    config.validate().map_err(VisionError::Configuration)?;

    match config.backend {
        VisionBackend::Http => Ok(Arc::new(NudeNetHttpDetector::new(config)?)),
        #[cfg(feature = "onnx")]
        VisionBackend::Onnx => Ok(Arc::new(OnnxNudeDetector::new(config)?)),
        #[cfg(not(feature = "onnx"))]
        VisionBackend::Onnx => Err(VisionError::Configuration(
            "ONNX backend requested but ai_vision was built without the `onnx` feature"
                .to_string(),
        )),
    }
}

/// Collapse raw candidates into one detection per label
///
/// Candidates below `min_score` are dropped; for each remaining label the
/// highest score wins. Output keeps first-seen label order.
#[must_use]
pub fn best_per_label<I>(candidates: I, min_score: f32) -> Vec<Detection>
where
    I: IntoIterator<Item = (NudityLabel, f32)>,
{
    let mut best: Vec<Detection> = Vec::new();
    for (label, score) in candidates {
        if score.is_nan() || score < min_score {
            continue;
        }
        match best.iter_mut().find(|d| d.label == label) {
            Some(existing) if existing.score < score => existing.score = score,
            Some(_) => {},
            None => best.push(Detection::new(label, score)),
        }
    }
    best
}

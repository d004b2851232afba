//! In-process NudeNet detector using ONNX Runtime
//!
//! Runs the NudeNet v3 YOLOv8 export (`320n.onnx`). The model takes a
//! `[1, 3, S, S]` RGB tensor scaled to `[0, 1]` and returns `[1, 4 + C, N]`:
//! four box rows followed by one score row per class, for `N` anchors.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use domain::{Detection, NudityLabel};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::{Array4, ArrayViewD, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Value;
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use super::best_per_label;
use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::ports::ExplicitContentDetector;

/// Box rows preceding the class scores in the model output
const BOX_ROWS: usize = 4;

/// Detector running the NudeNet model in-process
pub struct OnnxNudeDetector {
    model: Arc<Model>,
}

struct Model {
    session: Mutex<Session>,
    input_name: String,
    input_size: u32,
    min_score: f32,
}

impl std::fmt::Debug for OnnxNudeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxNudeDetector")
            .field("session", &"<Session>")
            .field("input_name", &self.model.input_name)
            .field("input_size", &self.model.input_size)
            .field("min_score", &self.model.min_score)
            .finish()
    }
}

impl OnnxNudeDetector {
    /// Load the model named by `config.model_path`
    ///
    /// Blocks while ONNX Runtime loads and optimizes the graph.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::ModelLoad` if the file is missing or the session
    /// cannot be created.
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let model_path = Path::new(&config.model_path);
        if !model_path.exists() {
            return Err(VisionError::ModelLoad(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        info!(path = %model_path.display(), "Loading NudeNet ONNX model");

        let load_err = |e: ort::Error| VisionError::ModelLoad(e.to_string());
        let session = Session::builder()
            .map_err(load_err)?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(load_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_err)?
            .with_intra_threads(config.intra_threads)
            .map_err(load_err)?
            .commit_from_file(model_path)
            .map_err(load_err)?;

        let input_name = session
            .inputs
            .first()
            .map_or_else(|| "images".to_string(), |input| input.name.clone());

        debug!(input = %input_name, "NudeNet model loaded");

        Ok(Self {
            model: Arc::new(Model {
                session: Mutex::new(session),
                input_name,
                input_size: config.input_size,
                min_score: config.min_score,
            }),
        })
    }
}

impl Model {
    fn run(&self, image: &[u8]) -> Result<Vec<Detection>, VisionError> {
        let decoded = image::load_from_memory(image)?;
        let tensor = preprocess(&decoded, self.input_size);

        let input = Value::from_array(tensor).map_err(|e| VisionError::Inference(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![&self.input_name => input])
            .map_err(|e| VisionError::Inference(e.to_string()))?;
        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        decode_output(output.view(), self.min_score)
    }
}

#[async_trait]
impl ExplicitContentDetector for OnnxNudeDetector {
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, VisionError> {
        let start = Instant::now();
        let model = Arc::clone(&self.model);

        let detections = tokio::task::spawn_blocking(move || model.run(&image))
            .await
            .map_err(|e| VisionError::Inference(format!("Inference task failed: {e}")))??;

        debug!(
            detections = detections.len(),
            time_ms = start.elapsed().as_millis(),
            "ONNX inference completed"
        );

        Ok(detections)
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "nudenet-onnx"
    }
}

/// Pad to a square with black on the right/bottom, then resize
#[must_use]
pub(crate) fn pad_to_square(image: &DynamicImage, target_size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let side = width.max(height).max(1);

    let mut canvas = RgbImage::from_pixel(side, side, Rgb([0, 0, 0]));
    image::imageops::replace(&mut canvas, &image.to_rgb8(), 0, 0);

    image::imageops::resize(&canvas, target_size, target_size, FilterType::Triangle)
}

/// Build the `[1, 3, S, S]` input tensor with values in `[0, 1]`
#[must_use]
pub(crate) fn preprocess(image: &DynamicImage, target_size: u32) -> Array4<f32> {
    let rgb = pad_to_square(image, target_size);
    let size = target_size as usize;

    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = f32::from(pixel[c]) / 255.0;
        }
    }
    tensor
}

/// Reduce the raw `[1, 4 + C, N]` output to one detection per label
pub(crate) fn decode_output(
    output: ArrayViewD<'_, f32>,
    min_score: f32,
) -> Result<Vec<Detection>, VisionError> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 || shape[1] <= BOX_ROWS {
        return Err(VisionError::Inference(format!(
            "Unexpected output shape {shape:?}, expected [1, {}, N]",
            BOX_ROWS + NudityLabel::CLASS_COUNT
        )));
    }

    let classes = shape[1] - BOX_ROWS;
    let anchors = shape[2];
    let output = output
        .into_dimensionality::<Ix3>()
        .map_err(|e| VisionError::Inference(e.to_string()))?;

    let candidates = (0..anchors).filter_map(|anchor| {
        (0..classes)
            .map(|class| (class, output[[0, BOX_ROWS + class, anchor]]))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .and_then(|(class, score)| {
                NudityLabel::from_index(class).map(|label| (label, score))
            })
    });

    Ok(best_per_label(candidates, min_score))
}

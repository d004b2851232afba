//! Explicit-content detection and image censoring for NetSentinel
//!
//! This crate provides the detector backends the moderation gate consults
//! and the blur/re-encode step it applies to flagged images.
//!
//! # Architecture
//!
//! Following the ports and adapters pattern:
//!
//! - **Ports** (`ports` module): [`ExplicitContentDetector`] trait
//! - **Providers** (`providers` module): concrete backends
//!   - [`NudeNetHttpDetector`]: posts images to a NudeNet inference server
//!   - `OnnxNudeDetector`: runs the NudeNet model in-process (`onnx` feature)
//! - **Censor** ([`ImageCensor`]): whole-image Gaussian blur and JPEG encoding
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_vision::{ImageCensor, VisionConfig, build_detector};
//!
//! let config = VisionConfig::default();
//! let detector = build_detector(&config)?;
//! let detections = detector.detect(image_bytes.clone()).await?;
//!
//! if detections.iter().any(|d| d.label.is_explicit_exposure()) {
//!     let censored = ImageCensor::from_config(&config).blur(&image_bytes)?;
//! }
//! ```

pub mod censor;
pub mod config;
pub mod error;
pub mod ports;
pub mod providers;

pub use censor::{ImageCensor, is_jpeg, sniff_format};
pub use config::{VisionBackend, VisionConfig};
pub use error::VisionError;
pub use ports::ExplicitContentDetector;
#[cfg(feature = "onnx")]
pub use providers::OnnxNudeDetector;
pub use providers::{NudeNetHttpDetector, best_per_label, build_detector};

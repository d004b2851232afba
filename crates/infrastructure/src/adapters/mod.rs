//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod image_processing_adapter;
mod media_fetch_adapter;
mod nudity_detector_adapter;
mod settings_adapter;
mod websearch_adapter;

pub use image_processing_adapter::CensorImageProcessor;
pub use media_fetch_adapter::HttpMediaFetcher;
pub use nudity_detector_adapter::{DetectorFactory, LazyNudityDetector};
pub use settings_adapter::ConfigSettingsStore;
pub use websearch_adapter::WebSearchAdapter;

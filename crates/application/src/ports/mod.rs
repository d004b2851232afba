//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod history_port;
mod image_processing_port;
mod media_fetch_port;
mod nudity_detector_port;
mod search_provider_port;
mod settings_port;

#[cfg(test)]
pub use history_port::MockHistoryPort;
pub use history_port::{HistoryEntry, HistoryPort, HistoryResult, RecordedIdentity};
#[cfg(test)]
pub use image_processing_port::MockImageProcessingPort;
pub use image_processing_port::{ImageProcessingPort, OUTPUT_CONTENT_TYPE};
#[cfg(test)]
pub use media_fetch_port::MockMediaFetchPort;
pub use media_fetch_port::{MediaFetchPort, RemoteMedia};
#[cfg(test)]
pub use nudity_detector_port::MockNudityDetectorPort;
pub use nudity_detector_port::{DetectorError, NudityDetectorPort};
#[cfg(test)]
pub use search_provider_port::MockSearchProviderPort;
pub use search_provider_port::SearchProviderPort;
#[cfg(test)]
pub use settings_port::MockSettingsPort;
pub use settings_port::SettingsPort;

//! Value Objects - Immutable, identity-less domain primitives

mod filter_mode;
mod image_url;
mod nudity_label;
mod proxy_reference;
mod result_type;

pub use filter_mode::FilterMode;
pub use image_url::ImageUrl;
pub use nudity_label::NudityLabel;
pub use proxy_reference::{DEFAULT_PROXY_PATH, ProxyReference};
pub use result_type::ResultType;

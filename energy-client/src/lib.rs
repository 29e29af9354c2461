pub mod api;
pub mod domain;
pub mod error;

pub use api::UpstreamClient;
pub use error::{UpstreamError, UpstreamResult};

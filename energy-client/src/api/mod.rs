pub mod client;
pub mod queries;

pub use client::{UpstreamClient, DEFAULT_TIMEOUT};

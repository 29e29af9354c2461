pub mod api;
pub mod config;
pub mod dashboard;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod transform;
pub mod views;

pub use dashboard::{Dashboard, DashboardSettings};
pub use pipeline::{CycleOutcome, PipelineError, SeriesAggregator, View};

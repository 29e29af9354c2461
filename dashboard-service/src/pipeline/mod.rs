use std::fmt::Debug;

use energy_client::UpstreamError;
use serde::Serialize;

pub mod aggregator;

pub use aggregator::{RefreshOutcome, SeriesAggregator};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Upstream unreachable, timed out, or answered with a non-2xx status.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// Upstream answered but the body lacks the expected fields or shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<UpstreamError> for PipelineError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Network { .. } | UpstreamError::Status { .. } => {
                PipelineError::NetworkFailure(e.to_string())
            }
            UpstreamError::Malformed { .. } => PipelineError::MalformedPayload(e.to_string()),
            UpstreamError::InvalidRequest(msg) => PipelineError::InvalidRequest(msg),
            UpstreamError::Config(msg) => PipelineError::Config(msg),
        }
    }
}

/// Pure, synchronous step between an upstream payload and a display value.
pub trait Transform<I: ?Sized, O> {
    fn apply(&self, input: &I) -> O;
}

/// Result of one fetch cycle of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome<T> {
    /// Every upstream call succeeded.
    Complete(T),
    /// A value could be built, but part of it was substituted or is unavailable.
    Degraded { value: T, errors: Vec<PipelineError> },
    /// Nothing displayable.
    Failed(PipelineError),
}

impl<T> CycleOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Complete(v) | Self::Degraded { value: v, .. } => Some(v),
            Self::Failed(_) => None,
        }
    }
}

/// One kind of dashboard panel: how to turn an identity key into a display value.
#[async_trait::async_trait]
pub trait View: Send + Sync + 'static {
    type Key: Clone + Debug + Send + Sync + Serialize + 'static;
    type Output: Clone + Debug + Send + Sync + Serialize + 'static;

    /// Short label used in logs and metrics.
    fn kind(&self) -> &'static str;

    async fn cycle(&self, key: &Self::Key) -> CycleOutcome<Self::Output>;
}

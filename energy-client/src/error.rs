/// Failures talking to the upstream prediction/analytics services.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Transport failure, including timeouts.
    #[error("network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The body was received but does not have the expected shape.
    #[error("malformed payload from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("client configuration error: {0}")]
    Config(String),
}

impl UpstreamError {
    pub fn malformed(endpoint: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// Transport failures and non-2xx responses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

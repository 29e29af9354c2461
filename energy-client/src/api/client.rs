use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{UpstreamError, UpstreamResult};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON client for the prediction/analytics services.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    base_url: Url,
    client: Client,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> UpstreamResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamError::Config(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::Config(format!(
                "base url '{base_url}' cannot carry path segments"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> UpstreamResult<T> {
        let url = self.endpoint(segments);
        tracing::debug!(url = %url, "GET upstream");
        metrics::counter!("upstream_requests_total").increment(1);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        self.handle_response(&url, response).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> UpstreamResult<T> {
        let url = self.endpoint(segments);
        tracing::debug!(url = %url, "POST upstream");
        metrics::counter!("upstream_requests_total").increment(1);

        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        self.handle_response(&url, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &Url,
        response: Response,
    ) -> UpstreamResult<T> {
        let status = response.status();
        let endpoint = url.path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            metrics::counter!("upstream_failures_total").increment(1);
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| network_error(url, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            metrics::counter!("upstream_failures_total").increment(1);
            UpstreamError::Malformed {
                endpoint,
                message: e.to_string(),
            }
        })
    }
}

fn network_error(url: &Url, err: reqwest::Error) -> UpstreamError {
    metrics::counter!("upstream_failures_total").increment(1);
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    tracing::warn!(endpoint = %url.path(), error = %message, "upstream request failed");
    UpstreamError::Network {
        endpoint: url.path().to_string(),
        message,
    }
}

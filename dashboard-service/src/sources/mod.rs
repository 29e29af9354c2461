use energy_client::domain::{City, CitySnapshot, Horizon, RawDeltaRecord, TariffEstimate};
use serde_json::{Map, Value};

use crate::pipeline::PipelineError;

pub mod fixture_dir;
pub mod http;

pub use fixture_dir::FixtureUpstream;
pub use http::HttpUpstream;

/// The reads the dashboard makes against its prediction/analytics services.
///
/// Implementations return payloads already checked for shape; anything that
/// does not fit is a [`PipelineError::MalformedPayload`].
#[async_trait::async_trait]
pub trait Upstream: Send + Sync + 'static {
    async fn historical_deltas(&self, meter_id: &str) -> Result<Vec<RawDeltaRecord>, PipelineError>;

    /// Exactly `horizon.hours()` values.
    async fn meter_predictions(
        &self,
        meter_id: &str,
        horizon: Horizon,
    ) -> Result<Vec<f64>, PipelineError>;

    /// Exactly `horizon.hours()` values.
    async fn city_predictions(&self, city: City, horizon: Horizon) -> Result<Vec<f64>, PipelineError>;

    /// Region name → timestamp map, for every region.
    async fn region_snapshot(&self) -> Result<Map<String, Value>, PipelineError>;

    async fn city_snapshots(&self, time: &str) -> Result<Vec<CitySnapshot>, PipelineError>;

    async fn tariff_estimate(&self, hour: u8, previous_cost: u32) -> Result<TariffEstimate, PipelineError>;

    /// Region name → current consumption total.
    async fn regional_totals(&self) -> Result<Map<String, Value>, PipelineError>;

    /// Location names the prediction service knows.
    async fn locations(&self) -> Result<Vec<String>, PipelineError>;
}

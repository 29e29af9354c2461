use energy_client::{
    api::queries,
    domain::{City, CitySnapshot, Horizon, RawDeltaRecord, TariffEstimate},
    UpstreamClient,
};
use serde_json::{Map, Value};

use crate::pipeline::PipelineError;
use crate::sources::Upstream;

/// Live upstream over HTTP.
#[derive(Clone, Debug)]
pub struct HttpUpstream {
    client: UpstreamClient,
}

impl HttpUpstream {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Upstream for HttpUpstream {
    async fn historical_deltas(&self, meter_id: &str) -> Result<Vec<RawDeltaRecord>, PipelineError> {
        Ok(queries::historical_deltas(&self.client, meter_id).await?)
    }

    async fn meter_predictions(
        &self,
        meter_id: &str,
        horizon: Horizon,
    ) -> Result<Vec<f64>, PipelineError> {
        Ok(queries::meter_predictions(&self.client, meter_id, horizon).await?)
    }

    async fn city_predictions(&self, city: City, horizon: Horizon) -> Result<Vec<f64>, PipelineError> {
        Ok(queries::city_predictions(&self.client, city, horizon).await?)
    }

    async fn region_snapshot(&self) -> Result<Map<String, Value>, PipelineError> {
        Ok(queries::region_snapshot(&self.client).await?)
    }

    async fn city_snapshots(&self, time: &str) -> Result<Vec<CitySnapshot>, PipelineError> {
        Ok(queries::city_snapshots(&self.client, time).await?)
    }

    async fn tariff_estimate(&self, hour: u8, previous_cost: u32) -> Result<TariffEstimate, PipelineError> {
        Ok(queries::tariff_estimate(&self.client, hour, previous_cost).await?)
    }

    async fn regional_totals(&self) -> Result<Map<String, Value>, PipelineError> {
        Ok(queries::regional_totals(&self.client).await?)
    }

    async fn locations(&self) -> Result<Vec<String>, PipelineError> {
        Ok(queries::locations(&self.client).await?)
    }
}

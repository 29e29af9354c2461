use std::path::PathBuf;

use energy_client::{
    api::queries::{check_horizon, parse_city_snapshots, region_object},
    domain::{
        City, CitySnapshot, Horizon, RawDeltaRecord, TariffEstimate, TariffQuote, MAX_TARIFF_HOUR,
    },
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::pipeline::PipelineError;
use crate::sources::Upstream;

/// Offline upstream replaying JSON files laid out like the service's paths:
///
/// ```text
/// diff/{meter}.json            pred/{meter}.json      pred/week/{meter}.json
/// pred/location/{city}.json    pred/location/{city}/week.json
/// region/all.json              color.json             tariff/{hour}/{cost}.json
/// consumptions.json           locations.json
/// ```
///
/// A missing file behaves like an unreachable service.
#[derive(Clone, Debug)]
pub struct FixtureUpstream {
    root: PathBuf,
}

impl FixtureUpstream {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, segments: &[&str]) -> Result<PathBuf, PipelineError> {
        let mut path = self.root.clone();
        let Some((last, dirs)) = segments.split_last() else {
            return Err(PipelineError::InvalidRequest("empty fixture path".to_string()));
        };
        for segment in dirs {
            path.push(safe_segment(segment)?);
        }
        path.push(format!("{}.json", safe_segment(last)?));
        Ok(path)
    }

    async fn read<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, PipelineError> {
        let path = self.path(segments)?;
        tracing::debug!(path = %path.display(), "reading fixture");

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            PipelineError::NetworkFailure(format!("fixture {} unavailable: {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PipelineError::MalformedPayload(format!("fixture {}: {e}", path.display()))
        })
    }
}

fn safe_segment(segment: &str) -> Result<&str, PipelineError> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(['/', '\\']) {
        return Err(PipelineError::InvalidRequest(format!(
            "'{segment}' is not a valid identifier"
        )));
    }
    Ok(segment)
}

#[async_trait::async_trait]
impl Upstream for FixtureUpstream {
    async fn historical_deltas(&self, meter_id: &str) -> Result<Vec<RawDeltaRecord>, PipelineError> {
        self.read(&["diff", meter_id]).await
    }

    async fn meter_predictions(
        &self,
        meter_id: &str,
        horizon: Horizon,
    ) -> Result<Vec<f64>, PipelineError> {
        let values = match horizon {
            Horizon::Day => self.read(&["pred", meter_id]).await?,
            Horizon::Week => self.read(&["pred", "week", meter_id]).await?,
        };
        Ok(check_horizon("/pred", values, horizon)?)
    }

    async fn city_predictions(&self, city: City, horizon: Horizon) -> Result<Vec<f64>, PipelineError> {
        let values = match horizon {
            Horizon::Day => self.read(&["pred", "location", city.key()]).await?,
            Horizon::Week => self.read(&["pred", "location", city.key(), "week"]).await?,
        };
        Ok(check_horizon("/pred/location", values, horizon)?)
    }

    async fn region_snapshot(&self) -> Result<Map<String, Value>, PipelineError> {
        let body: Value = self.read(&["region", "all"]).await?;
        Ok(region_object(body)?)
    }

    async fn city_snapshots(&self, _time: &str) -> Result<Vec<CitySnapshot>, PipelineError> {
        let body: Map<String, Value> = self.read(&["color"]).await?;
        Ok(parse_city_snapshots(body)?)
    }

    async fn tariff_estimate(&self, hour: u8, previous_cost: u32) -> Result<TariffEstimate, PipelineError> {
        if hour > MAX_TARIFF_HOUR {
            return Err(PipelineError::InvalidRequest(format!(
                "hour must be between 0 and {MAX_TARIFF_HOUR}, got {hour}"
            )));
        }
        let quote: TariffQuote = self
            .read(&["tariff", &hour.to_string(), &previous_cost.to_string()])
            .await?;
        Ok(TariffEstimate {
            hour,
            previous_cost,
            price: quote.price,
        })
    }

    async fn regional_totals(&self) -> Result<Map<String, Value>, PipelineError> {
        self.read(&["consumptions"]).await
    }

    async fn locations(&self) -> Result<Vec<String>, PipelineError> {
        self.read(&["locations"]).await
    }
}

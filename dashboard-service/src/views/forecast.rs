use std::sync::Arc;

use energy_client::domain::{City, Horizon, PredictionSeries, Provenance};
use serde::Serialize;

use crate::pipeline::{CycleOutcome, View};
use crate::sources::Upstream;
use crate::transform::{FallbackRange, FallbackSynthesizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForecastKey {
    pub city: City,
    pub horizon: Horizon,
}

/// A city's prediction with the figures shown next to its chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityForecast {
    pub city: City,
    pub display_name: &'static str,
    pub series: PredictionSeries,
    pub peak: Option<f64>,
    /// One mean per day; a single entry for a daily horizon.
    pub daily_means: Vec<f64>,
}

impl CityForecast {
    pub fn new(city: City, series: PredictionSeries) -> Self {
        Self {
            city,
            display_name: city.display_name(),
            peak: series.peak(),
            daily_means: series.daily_means(),
            series,
        }
    }
}

/// Daily or weekly prediction of a city, with fallback when the service is down.
pub struct CityForecasts {
    upstream: Arc<dyn Upstream>,
    fallback: Arc<FallbackSynthesizer>,
    range: FallbackRange,
}

impl CityForecasts {
    pub fn new(upstream: Arc<dyn Upstream>, fallback: Arc<FallbackSynthesizer>, range: FallbackRange) -> Self {
        Self {
            upstream,
            fallback,
            range,
        }
    }
}

#[async_trait::async_trait]
impl View for CityForecasts {
    type Key = ForecastKey;
    type Output = CityForecast;

    fn kind(&self) -> &'static str {
        "forecast"
    }

    async fn cycle(&self, key: &ForecastKey) -> CycleOutcome<CityForecast> {
        match self.upstream.city_predictions(key.city, key.horizon).await {
            Ok(values) => CycleOutcome::Complete(CityForecast::new(
                key.city,
                PredictionSeries {
                    horizon: key.horizon,
                    values,
                    provenance: Provenance::Live,
                },
            )),
            Err(e) => {
                let series = self.fallback.substitute("city", key.horizon, self.range, &e);
                CycleOutcome::Degraded {
                    value: CityForecast::new(key.city, series),
                    errors: vec![e],
                }
            }
        }
    }
}

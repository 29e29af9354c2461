use std::{path::Path, sync::Arc, time::Duration};

use energy_client::{
    domain::{rank_consumers, Location, RegionalConsumption},
    UpstreamClient,
};

use crate::config::{AppConfig, UpstreamKind};
use crate::pipeline::{PipelineError, SeriesAggregator};
use crate::sources::{FixtureUpstream, HttpUpstream, Upstream};
use crate::transform::{FallbackRange, FallbackSynthesizer};
use crate::views::{Calendar, CityForecasts, CityMap, MeterConsumption, RegionFlow, TariffLookup};

/// Knobs of the views that are not upstream-specific.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub calendar: Calendar,
    pub meter_range: FallbackRange,
    pub city_range: FallbackRange,
    pub previous_cost: u32,
    pub fallback_seed: Option<u64>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            calendar: Calendar::system(),
            meter_range: FallbackRange::METER,
            city_range: FallbackRange::CITY,
            previous_cost: 1200,
            fallback_seed: None,
        }
    }
}

impl From<&AppConfig> for DashboardSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            calendar: cfg
                .calendar
                .today
                .map(Calendar::fixed)
                .unwrap_or_else(Calendar::system),
            meter_range: cfg.fallback.meter_range(),
            city_range: cfg.fallback.city_range(),
            previous_cost: cfg.tariff.previous_cost,
            fallback_seed: cfg.fallback.seed,
        }
    }
}

/// One aggregator per panel, all reading from the same upstream.
pub struct Dashboard {
    pub consumption: Arc<SeriesAggregator<MeterConsumption>>,
    pub region: Arc<SeriesAggregator<RegionFlow>>,
    pub forecast: Arc<SeriesAggregator<CityForecasts>>,
    pub tariff: Arc<SeriesAggregator<TariffLookup>>,
    pub city_map: Arc<SeriesAggregator<CityMap>>,
    upstream: Arc<dyn Upstream>,
}

impl Dashboard {
    pub fn new(upstream: Arc<dyn Upstream>, settings: DashboardSettings) -> Self {
        let fallback = Arc::new(match settings.fallback_seed {
            Some(seed) => FallbackSynthesizer::seeded(seed),
            None => FallbackSynthesizer::new(),
        });

        Self {
            consumption: Arc::new(SeriesAggregator::new(MeterConsumption::new(
                Arc::clone(&upstream),
                settings.calendar,
                Arc::clone(&fallback),
                settings.meter_range,
            ))),
            region: Arc::new(SeriesAggregator::new(RegionFlow::new(Arc::clone(&upstream)))),
            forecast: Arc::new(SeriesAggregator::new(CityForecasts::new(
                Arc::clone(&upstream),
                fallback,
                settings.city_range,
            ))),
            tariff: Arc::new(SeriesAggregator::new(TariffLookup::new(
                Arc::clone(&upstream),
                settings.previous_cost,
            ))),
            city_map: Arc::new(SeriesAggregator::new(CityMap::new(Arc::clone(&upstream)))),
            upstream,
        }
    }

    /// Build the upstream named by the configuration and wire every panel to it.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, PipelineError> {
        let upstream: Arc<dyn Upstream> = match cfg.upstream.kind {
            UpstreamKind::Http => {
                let client = UpstreamClient::new(
                    &cfg.upstream.base_url,
                    Duration::from_millis(cfg.upstream.timeout_ms),
                )?;
                tracing::info!(base_url = %client.base_url(), "using HTTP upstream");
                Arc::new(HttpUpstream::new(client))
            }
            UpstreamKind::Fixtures => {
                let root = Path::new(&cfg.upstream.fixtures_dir);
                if !root.is_dir() {
                    return Err(PipelineError::Config(format!(
                        "fixtures_dir '{}' is not a directory",
                        root.display()
                    )));
                }
                tracing::info!(fixtures_dir = %root.display(), "using fixture upstream");
                Arc::new(FixtureUpstream::new(root))
            }
        };
        Ok(Self::new(upstream, DashboardSettings::from(cfg)))
    }

    /// Regional totals, largest consumer first.
    pub async fn top_consumers(&self) -> Result<Vec<RegionalConsumption>, PipelineError> {
        let totals = self.upstream.regional_totals().await?;
        Ok(rank_consumers(&totals))
    }

    /// Locations of the prediction service, known cities resolved to their keys.
    pub async fn locations(&self) -> Result<Vec<Location>, PipelineError> {
        let names = self.upstream.locations().await?;
        Ok(names.iter().map(|name| Location::resolve(name)).collect())
    }
}

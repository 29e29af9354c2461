use std::sync::Arc;

use energy_client::domain::CitySnapshot;

use crate::pipeline::{CycleOutcome, View};
use crate::sources::Upstream;

/// Consumption of every city at one instant, for the map.
pub struct CityMap {
    upstream: Arc<dyn Upstream>,
}

impl CityMap {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }
}

#[async_trait::async_trait]
impl View for CityMap {
    /// `DD.MM.YYYY HH:MM:SS`
    type Key = String;
    type Output = Vec<CitySnapshot>;

    fn kind(&self) -> &'static str {
        "map"
    }

    async fn cycle(&self, time: &String) -> CycleOutcome<Vec<CitySnapshot>> {
        match self.upstream.city_snapshots(time).await {
            Ok(snapshots) => CycleOutcome::Complete(snapshots),
            Err(e) => CycleOutcome::Failed(e),
        }
    }
}

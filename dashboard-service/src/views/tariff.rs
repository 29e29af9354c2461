use std::sync::Arc;

use energy_client::domain::{HourlySeries, TariffEstimate};
use serde::Serialize;

use crate::pipeline::{CycleOutcome, View};
use crate::sources::Upstream;
use crate::transform::demand_curve;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffPanel {
    pub estimate: TariffEstimate,
    pub demand: HourlySeries,
}

/// Tariff estimate for a peak hour against the configured previous bill.
pub struct TariffLookup {
    upstream: Arc<dyn Upstream>,
    previous_cost: u32,
}

impl TariffLookup {
    pub fn new(upstream: Arc<dyn Upstream>, previous_cost: u32) -> Self {
        Self {
            upstream,
            previous_cost,
        }
    }
}

#[async_trait::async_trait]
impl View for TariffLookup {
    type Key = u8;
    type Output = TariffPanel;

    fn kind(&self) -> &'static str {
        "tariff"
    }

    async fn cycle(&self, hour: &u8) -> CycleOutcome<TariffPanel> {
        match self.upstream.tariff_estimate(*hour, self.previous_cost).await {
            Ok(estimate) => CycleOutcome::Complete(TariffPanel {
                estimate,
                demand: demand_curve(),
            }),
            Err(e) => CycleOutcome::Failed(e),
        }
    }
}

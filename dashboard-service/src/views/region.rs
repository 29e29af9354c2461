use std::sync::Arc;

use energy_client::{api::queries::region_time_map, domain::RegionSeries};

use crate::pipeline::{CycleOutcome, PipelineError, Transform, View};
use crate::sources::Upstream;
use crate::transform::RegionFlatten;

/// Whole-hour import/export of one region. No fallback: failures publish
/// without a value.
pub struct RegionFlow {
    upstream: Arc<dyn Upstream>,
}

impl RegionFlow {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }
}

#[async_trait::async_trait]
impl View for RegionFlow {
    type Key = String;
    type Output = RegionSeries;

    fn kind(&self) -> &'static str {
        "region"
    }

    async fn cycle(&self, region: &String) -> CycleOutcome<RegionSeries> {
        let snapshot = match self.upstream.region_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => return CycleOutcome::Failed(e),
        };

        let map = match region_time_map(&snapshot, region) {
            Ok(map) => map,
            Err(e) => return CycleOutcome::Failed(PipelineError::from(e)),
        };
        if map.is_empty() {
            tracing::info!(region = %region, "region has no samples");
        }

        CycleOutcome::Complete(RegionSeries {
            region: region.clone(),
            points: RegionFlatten.apply(&map),
        })
    }
}

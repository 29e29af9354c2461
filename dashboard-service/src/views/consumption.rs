use std::sync::Arc;

use energy_client::domain::{
    ConsumptionView, HistoricalDay, Horizon, PredictionSeries, Provenance, RawDeltaRecord,
    SessionContext,
};
use time::Date;

use crate::pipeline::{CycleOutcome, PipelineError, Transform, View};
use crate::sources::Upstream;
use crate::transform::{DayCurve, FallbackRange, FallbackSynthesizer};
use crate::views::Calendar;

/// Yesterday/Today/Tomorrow consumption of the signed-in meter.
pub struct MeterConsumption {
    upstream: Arc<dyn Upstream>,
    calendar: Calendar,
    fallback: Arc<FallbackSynthesizer>,
    range: FallbackRange,
}

impl MeterConsumption {
    pub fn new(
        upstream: Arc<dyn Upstream>,
        calendar: Calendar,
        fallback: Arc<FallbackSynthesizer>,
        range: FallbackRange,
    ) -> Self {
        Self {
            upstream,
            calendar,
            fallback,
            range,
        }
    }

    fn historical_day(records: &[RawDeltaRecord], date: Option<Date>) -> HistoricalDay {
        match date {
            Some(date) => {
                let series = DayCurve::import_on(date).apply(records);
                tracing::debug!(
                    %date,
                    padded = series.padded(),
                    masked = series.masked(),
                    "historical day built"
                );
                HistoricalDay::Available { series }
            }
            None => HistoricalDay::Unavailable {
                reason: "date out of range".to_string(),
            },
        }
    }
}

#[async_trait::async_trait]
impl View for MeterConsumption {
    type Key = SessionContext;
    type Output = ConsumptionView;

    fn kind(&self) -> &'static str {
        "consumption"
    }

    async fn cycle(&self, session: &SessionContext) -> CycleOutcome<ConsumptionView> {
        let meter_id = session.meter_id.as_str();
        let (history, prediction) = tokio::join!(
            self.upstream.historical_deltas(meter_id),
            self.upstream.meter_predictions(meter_id, Horizon::Day),
        );

        let mut errors: Vec<PipelineError> = Vec::new();

        let (yesterday, today) = match history {
            Ok(records) => {
                tracing::debug!(meter_id, records = records.len(), "historical deltas fetched");
                (
                    Self::historical_day(&records, self.calendar.yesterday()),
                    Self::historical_day(&records, Some(self.calendar.today())),
                )
            }
            Err(e) => {
                tracing::warn!(meter_id, error = %e, "historical deltas unavailable");
                let reason = e.to_string();
                errors.push(e);
                (
                    HistoricalDay::Unavailable {
                        reason: reason.clone(),
                    },
                    HistoricalDay::Unavailable { reason },
                )
            }
        };

        let tomorrow = match prediction {
            Ok(values) => PredictionSeries {
                horizon: Horizon::Day,
                values,
                provenance: Provenance::Live,
            },
            Err(e) => {
                let series = self
                    .fallback
                    .substitute("meter", Horizon::Day, self.range, &e);
                errors.push(e);
                series
            }
        };

        let view = ConsumptionView {
            meter_id: session.meter_id.clone(),
            yesterday,
            today,
            tomorrow,
        };

        if errors.is_empty() {
            CycleOutcome::Complete(view)
        } else {
            CycleOutcome::Degraded {
                value: view,
                errors,
            }
        }
    }
}

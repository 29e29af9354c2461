#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use dashboard_service::{sources::Upstream, PipelineError};
use energy_client::domain::{City, CitySnapshot, Horizon, RawDeltaRecord, TariffEstimate};
use serde_json::{json, Map, Value};
use tokio::sync::oneshot;

pub fn down() -> PipelineError {
    PipelineError::NetworkFailure("connection refused".to_string())
}

pub fn object(v: Value) -> Map<String, Value> {
    v.as_object().cloned().expect("test value must be an object")
}

pub fn deltas(v: Value) -> Vec<RawDeltaRecord> {
    serde_json::from_value(v).expect("test records must parse")
}

/// Hourly import deltas for 2025-06-07 (yesterday) and 2025-06-08 (today).
pub fn two_days_of_deltas() -> Vec<RawDeltaRecord> {
    deltas(json!([
        {"Date of Second Val": "2025-06-07 00:00:00", "Import Delta": 1.0},
        {"Date of Second Val": "2025-06-07 01:00:00", "Import Delta": 2.0},
        {"Date of Second Val": "2025-06-08 00:00:00", "Import Delta": 10.0},
        {"Date of Second Val": "2025-06-08 00:15:00", "Import Delta": 99.0},
        {"Date of Second Val": "2025-06-08 01:00:00", "Import Delta": 12.0}
    ]))
}

/// Upstream answering every read with a canned result.
pub struct FakeUpstream {
    pub deltas: Result<Vec<RawDeltaRecord>, PipelineError>,
    pub predictions: Result<Vec<f64>, PipelineError>,
    pub city_predictions: Result<Vec<f64>, PipelineError>,
    pub regions: Result<Map<String, Value>, PipelineError>,
    pub snapshots: Result<Vec<CitySnapshot>, PipelineError>,
    pub tariff_price: Result<f64, PipelineError>,
    pub totals: Result<Map<String, Value>, PipelineError>,
    pub locations: Result<Vec<String>, PipelineError>,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            deltas: Err(down()),
            predictions: Err(down()),
            city_predictions: Err(down()),
            regions: Err(down()),
            snapshots: Err(down()),
            tariff_price: Err(down()),
            totals: Err(down()),
            locations: Err(down()),
        }
    }
}

#[async_trait::async_trait]
impl Upstream for FakeUpstream {
    async fn historical_deltas(&self, _meter_id: &str) -> Result<Vec<RawDeltaRecord>, PipelineError> {
        self.deltas.clone()
    }

    async fn meter_predictions(&self, _meter_id: &str, _horizon: Horizon) -> Result<Vec<f64>, PipelineError> {
        self.predictions.clone()
    }

    async fn city_predictions(&self, _city: City, _horizon: Horizon) -> Result<Vec<f64>, PipelineError> {
        self.city_predictions.clone()
    }

    async fn region_snapshot(&self) -> Result<Map<String, Value>, PipelineError> {
        self.regions.clone()
    }

    async fn city_snapshots(&self, _time: &str) -> Result<Vec<CitySnapshot>, PipelineError> {
        self.snapshots.clone()
    }

    async fn tariff_estimate(&self, hour: u8, previous_cost: u32) -> Result<TariffEstimate, PipelineError> {
        self.tariff_price.clone().map(|price| TariffEstimate {
            hour,
            previous_cost,
            price,
        })
    }

    async fn regional_totals(&self) -> Result<Map<String, Value>, PipelineError> {
        self.totals.clone()
    }

    async fn locations(&self) -> Result<Vec<String>, PipelineError> {
        self.locations.clone()
    }
}

pub type Gate = oneshot::Sender<Result<Vec<RawDeltaRecord>, PipelineError>>;

/// Upstream whose historical reads resolve when the test releases them, per
/// meter id. Predictions always succeed.
pub struct GatedUpstream {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<Vec<RawDeltaRecord>, PipelineError>>>>,
}

impl GatedUpstream {
    pub fn new(meter_ids: &[&str]) -> (Self, HashMap<String, Gate>) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        for id in meter_ids {
            let (tx, rx) = oneshot::channel();
            gates.insert(id.to_string(), rx);
            senders.insert(id.to_string(), tx);
        }
        (
            Self {
                gates: Mutex::new(gates),
            },
            senders,
        )
    }
}

#[async_trait::async_trait]
impl Upstream for GatedUpstream {
    async fn historical_deltas(&self, meter_id: &str) -> Result<Vec<RawDeltaRecord>, PipelineError> {
        let gate = self.gates.lock().unwrap().remove(meter_id);
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(down())),
            None => Err(down()),
        }
    }

    async fn meter_predictions(&self, meter_id: &str, horizon: Horizon) -> Result<Vec<f64>, PipelineError> {
        let marker: f64 = meter_id.parse().unwrap_or(0.0);
        Ok(vec![marker; horizon.hours()])
    }

    async fn city_predictions(&self, _city: City, _horizon: Horizon) -> Result<Vec<f64>, PipelineError> {
        Err(down())
    }

    async fn region_snapshot(&self) -> Result<Map<String, Value>, PipelineError> {
        Err(down())
    }

    async fn city_snapshots(&self, _time: &str) -> Result<Vec<CitySnapshot>, PipelineError> {
        Err(down())
    }

    async fn tariff_estimate(&self, _hour: u8, _previous_cost: u32) -> Result<TariffEstimate, PipelineError> {
        Err(down())
    }

    async fn regional_totals(&self) -> Result<Map<String, Value>, PipelineError> {
        Err(down())
    }

    async fn locations(&self) -> Result<Vec<String>, PipelineError> {
        Err(down())
    }
}

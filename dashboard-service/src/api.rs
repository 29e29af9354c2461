use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use energy_client::domain::{
    canonical_location, parse_snapshot_time, snapshot_time, City, CitySnapshot, ConsumptionView,
    Horizon, Location, RegionSeries, RegionalConsumption, SessionContext, MAX_TARIFF_HOUR,
};
use serde::{Deserialize, Serialize};

use crate::dashboard::Dashboard;
use crate::pipeline::PipelineError;
use crate::sinks::PanelState;
use crate::views::{CityForecast, ForecastKey, TariffPanel};

/// Errors answered to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Upstream(#[from] PipelineError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(PipelineError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Answer to a refresh: the cycle runs in the background.
#[derive(Debug, Serialize, Deserialize)]
pub struct Accepted {
    pub request_id: u64,
}

fn accepted(request_id: u64) -> (StatusCode, Json<Accepted>) {
    (StatusCode::ACCEPTED, Json(Accepted { request_id }))
}

#[derive(Debug, Default, Deserialize)]
struct ForecastParams {
    #[serde(default)]
    horizon: Horizon,
}

#[derive(Debug, Deserialize)]
struct MapRequest {
    time: String,
}

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/views/consumption", get(consumption_state))
        .route("/views/consumption/:meter_id", post(refresh_consumption))
        .route("/views/region", get(region_state))
        .route("/views/region/:region", post(refresh_region))
        .route("/views/forecast", get(forecast_state))
        .route("/views/forecast/:city", post(refresh_forecast))
        .route("/views/tariff", get(tariff_state))
        .route("/views/tariff/:hour", post(refresh_tariff))
        .route("/views/map", get(map_state).post(refresh_map))
        .route("/views/consumers", get(top_consumers))
        .route("/views/locations", get(locations))
        .with_state(dashboard)
}

/// Serve the panel API until the listener fails.
pub async fn serve(bind_addr: &str, dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid api.bind_addr '{bind_addr}': {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "panel API listening");
    axum::serve(listener, router(dashboard).into_make_service()).await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn refresh_consumption(
    State(dashboard): State<Arc<Dashboard>>,
    Path(meter_id): Path<String>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    let meter_id = meter_id.trim();
    if meter_id.is_empty() {
        return Err(ApiError::BadRequest("meter id must not be empty".to_string()));
    }
    let request_id = dashboard.consumption.spawn_refresh(SessionContext::new(meter_id));
    Ok(accepted(request_id))
}

async fn consumption_state(
    State(dashboard): State<Arc<Dashboard>>,
) -> Json<PanelState<SessionContext, ConsumptionView>> {
    Json(dashboard.consumption.current())
}

async fn refresh_region(
    State(dashboard): State<Arc<Dashboard>>,
    Path(region): Path<String>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    let region = canonical_location(&region);
    if region.is_empty() {
        return Err(ApiError::BadRequest("region must not be empty".to_string()));
    }
    Ok(accepted(dashboard.region.spawn_refresh(region)))
}

async fn region_state(State(dashboard): State<Arc<Dashboard>>) -> Json<PanelState<String, RegionSeries>> {
    Json(dashboard.region.current())
}

async fn refresh_forecast(
    State(dashboard): State<Arc<Dashboard>>,
    Path(city): Path<String>,
    Query(params): Query<ForecastParams>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    let city = City::parse(&city).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let key = ForecastKey {
        city,
        horizon: params.horizon,
    };
    Ok(accepted(dashboard.forecast.spawn_refresh(key)))
}

async fn forecast_state(
    State(dashboard): State<Arc<Dashboard>>,
) -> Json<PanelState<ForecastKey, CityForecast>> {
    Json(dashboard.forecast.current())
}

async fn refresh_tariff(
    State(dashboard): State<Arc<Dashboard>>,
    Path(hour): Path<u8>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    if hour > MAX_TARIFF_HOUR {
        return Err(ApiError::BadRequest(format!(
            "hour must be between 0 and {MAX_TARIFF_HOUR}, got {hour}"
        )));
    }
    Ok(accepted(dashboard.tariff.spawn_refresh(hour)))
}

async fn tariff_state(State(dashboard): State<Arc<Dashboard>>) -> Json<PanelState<u8, TariffPanel>> {
    Json(dashboard.tariff.current())
}

async fn refresh_map(
    State(dashboard): State<Arc<Dashboard>>,
    Json(body): Json<MapRequest>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    let Some(at) = parse_snapshot_time(&body.time) else {
        return Err(ApiError::BadRequest(format!(
            "time '{}' is not DD.MM.YYYY HH:MM:SS",
            body.time
        )));
    };
    Ok(accepted(dashboard.city_map.spawn_refresh(snapshot_time(at))))
}

async fn map_state(
    State(dashboard): State<Arc<Dashboard>>,
) -> Json<PanelState<String, Vec<CitySnapshot>>> {
    Json(dashboard.city_map.current())
}

async fn top_consumers(
    State(dashboard): State<Arc<Dashboard>>,
) -> Result<Json<Vec<RegionalConsumption>>, ApiError> {
    Ok(Json(dashboard.top_consumers().await?))
}

async fn locations(State(dashboard): State<Arc<Dashboard>>) -> Result<Json<Vec<Location>>, ApiError> {
    Ok(Json(dashboard.locations().await?))
}

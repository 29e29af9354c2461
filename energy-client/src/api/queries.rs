use serde_json::{Map, Value};

use crate::api::client::UpstreamClient;
use crate::domain::{
    City, CitySnapshot, Horizon, RawCitySnapshot, RawDeltaRecord, RegionTimeMap, TariffEstimate,
    TariffQuote, MAX_TARIFF_HOUR,
};
use crate::error::{UpstreamError, UpstreamResult};

/// Historical consumption deltas of a meter, in upstream order.
pub async fn historical_deltas(
    client: &UpstreamClient,
    meter_id: &str,
) -> UpstreamResult<Vec<RawDeltaRecord>> {
    client.get_json(&["diff", meter_id]).await
}

/// Hourly consumption predictions of a meter.
///
/// The response must hold exactly one value per hour of the horizon.
pub async fn meter_predictions(
    client: &UpstreamClient,
    meter_id: &str,
    horizon: Horizon,
) -> UpstreamResult<Vec<f64>> {
    let values: Vec<f64> = match horizon {
        Horizon::Day => client.get_json(&["pred", meter_id]).await?,
        Horizon::Week => client.get_json(&["pred", "week", meter_id]).await?,
    };
    check_horizon("/pred", values, horizon)
}

/// Hourly consumption predictions of a city.
pub async fn city_predictions(
    client: &UpstreamClient,
    city: City,
    horizon: Horizon,
) -> UpstreamResult<Vec<f64>> {
    let values: Vec<f64> = match horizon {
        Horizon::Day => client.get_json(&["pred", "location", city.key()]).await?,
        Horizon::Week => {
            client
                .get_json(&["pred", "location", city.key(), "week"])
                .await?
        }
    };
    check_horizon("/pred/location", values, horizon)
}

pub fn check_horizon(endpoint: &str, values: Vec<f64>, horizon: Horizon) -> UpstreamResult<Vec<f64>> {
    if values.len() != horizon.hours() {
        return Err(UpstreamError::malformed(
            endpoint,
            format!(
                "expected {} predictions for a {} horizon, got {}",
                horizon.hours(),
                horizon.as_str(),
                values.len()
            ),
        ));
    }
    Ok(values)
}

/// Every region's timestamp map from `GET /region/all`.
///
/// The service wraps the region object in a one-element array.
pub async fn region_snapshot(client: &UpstreamClient) -> UpstreamResult<Map<String, Value>> {
    let body: Value = client.get_json(&["region", "all"]).await?;
    region_object(body)
}

pub fn region_object(body: Value) -> UpstreamResult<Map<String, Value>> {
    match body {
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(regions)) => Ok(regions),
            Some(_) => Err(UpstreamError::malformed(
                "/region/all",
                "first element is not an object",
            )),
            None => Err(UpstreamError::malformed("/region/all", "empty array")),
        },
        Value::Object(regions) => Ok(regions),
        _ => Err(UpstreamError::malformed(
            "/region/all",
            "expected an array holding the region object",
        )),
    }
}

/// Timestamp map of a single region; a region the service does not know yields
/// an empty map, a region whose value is not an object is malformed.
pub fn region_time_map(regions: &Map<String, Value>, region: &str) -> UpstreamResult<RegionTimeMap> {
    match regions.get(region) {
        None => Ok(RegionTimeMap::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(UpstreamError::malformed(
            "/region/all",
            format!("region '{region}' is not a timestamp map"),
        )),
    }
}

/// Consumption, color and position of every city at `time` (`DD.MM.YYYY HH:MM:SS`).
pub async fn city_snapshots(client: &UpstreamClient, time: &str) -> UpstreamResult<Vec<CitySnapshot>> {
    let body: Map<String, Value> = client
        .post_json(&["color"], &serde_json::json!({ "time": time }))
        .await?;
    parse_city_snapshots(body)
}

/// Per-city entries of a `/color` body, keyed by city name.
pub fn parse_city_snapshots(body: Map<String, Value>) -> UpstreamResult<Vec<CitySnapshot>> {
    body.into_iter()
        .map(|(city, raw)| {
            serde_json::from_value::<RawCitySnapshot>(raw)
                .map(|raw| CitySnapshot::from_raw(city.clone(), raw))
                .map_err(|e| UpstreamError::malformed("/color", format!("city '{city}': {e}")))
        })
        .collect()
}

/// Estimated cost for a peak hour given the previous bill.
pub async fn tariff_estimate(
    client: &UpstreamClient,
    hour: u8,
    previous_cost: u32,
) -> UpstreamResult<TariffEstimate> {
    if hour > MAX_TARIFF_HOUR {
        return Err(UpstreamError::InvalidRequest(format!(
            "hour must be between 0 and {MAX_TARIFF_HOUR}, got {hour}"
        )));
    }

    let hour_segment = hour.to_string();
    let cost_segment = previous_cost.to_string();
    let quote: TariffQuote = client
        .get_json(&["tariff", &hour_segment, &cost_segment])
        .await?;

    Ok(TariffEstimate {
        hour,
        previous_cost,
        price: quote.price,
    })
}

/// Current consumption totals per region.
pub async fn regional_totals(client: &UpstreamClient) -> UpstreamResult<Map<String, Value>> {
    client.get_json(&["consumptions"]).await
}

/// Location names the prediction service knows.
pub async fn locations(client: &UpstreamClient) -> UpstreamResult<Vec<String>> {
    client.get_json(&["locations"]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::DEFAULT_TIMEOUT;
    use mockito::{Matcher, Server};
    use serde_json::json;

    async fn client_for(server: &Server) -> UpstreamClient {
        UpstreamClient::new(&server.url(), DEFAULT_TIMEOUT).unwrap()
    }

    #[tokio::test]
    async fn historical_deltas_parses_records_in_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/diff/42")
            .with_status(200)
            .with_body(
                json!([
                    {"Date of Second Val": "2025-06-08 01:00:00", "Import Delta": 2.0, "Export Delta": 0.0},
                    {"Date of Second Val": "2025-06-08 00:00:00", "Import Delta": 1.0, "Export Delta": 0.0}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let records = historical_deltas(&client_for(&server).await, "42").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, "2025-06-08 01:00:00");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn prediction_with_wrong_length_is_malformed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pred/location/Balti")
            .with_status(200)
            .with_body(json!([1.0, 2.0, 3.0]).to_string())
            .create_async()
            .await;

        let err = city_predictions(&client_for(&server).await, City::Balti, Horizon::Day)
            .await
            .unwrap_err();
        assert!(err.is_malformed());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn weekly_meter_predictions_use_week_route() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pred/week/42")
            .with_status(200)
            .with_body(serde_json::to_string(&vec![1.5_f64; 168]).unwrap())
            .create_async()
            .await;

        let values = meter_predictions(&client_for(&server).await, "42", Horizon::Week)
            .await
            .unwrap();
        assert_eq!(values.len(), 168);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn city_snapshots_posts_time_and_reads_misspelled_coordinates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/color")
            .match_body(Matcher::Json(json!({"time": "08.06.2025 12:00:00"})))
            .with_status(200)
            .with_body(
                json!({
                    "Balti": {"consumption": 10.0, "color": [0, 255, 0], "coordonates": [47.76, 27.93]},
                    "Cahul": {"consumption": 30.0, "color": [255, 0, 0], "coordonates": [45.9, 28.19]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let snaps = city_snapshots(&client_for(&server).await, "08.06.2025 12:00:00")
            .await
            .unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].city, "Balti");
        assert_eq!(snaps[1].color, [255, 0, 0]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn locations_lists_service_names() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/locations")
            .with_status(200)
            .with_body(json!(["Balti", "Cahul", "Nord"]).to_string())
            .create_async()
            .await;

        let names = locations(&client_for(&server).await).await.unwrap();
        assert_eq!(names, vec!["Balti", "Cahul", "Nord"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn tariff_rejects_out_of_range_hour_without_calling() {
        let server = Server::new_async().await;
        let err = tariff_estimate(&client_for(&server).await, 25, 1200)
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn tariff_without_numeric_price_is_malformed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/tariff/18/1200")
            .with_status(200)
            .with_body(json!({"price": "cheap"}).to_string())
            .create_async()
            .await;

        let err = tariff_estimate(&client_for(&server).await, 18, 1200)
            .await
            .unwrap_err();
        assert!(err.is_malformed());
        mock.assert_async().await;
    }

    #[test]
    fn city_snapshot_with_bad_entry_is_malformed() {
        let body = json!({
            "Balti": {"consumption": 10.0, "color": [0, 255, 0], "coordonates": [47.76, 27.93]},
            "Cahul": {"consumption": "lots"}
        });
        let err = parse_city_snapshots(body.as_object().cloned().unwrap()).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("Cahul"), "{err}");
    }

    #[test]
    fn region_object_unwraps_single_element_array() {
        let regions = region_object(json!([{"Balti": {"2025-06-08 05:00:00": {"Import": 5, "Export": 2}}}])).unwrap();
        assert!(regions.contains_key("Balti"));

        assert!(region_object(json!([])).unwrap_err().is_malformed());
        assert!(region_object(json!("nope")).unwrap_err().is_malformed());
    }

    #[test]
    fn unknown_region_is_empty_not_an_error() {
        let regions = json!({"Balti": {}}).as_object().cloned().unwrap();
        assert!(region_time_map(&regions, "Cahul").unwrap().is_empty());

        let bad = json!({"Balti": 3}).as_object().cloned().unwrap();
        assert!(region_time_map(&bad, "Balti").unwrap_err().is_malformed());
    }
}

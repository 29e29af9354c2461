use serde::{Deserialize, Serialize};
use time::{macros::format_description, PrimitiveDateTime};

/// Per-city entry of the `POST /color` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCitySnapshot {
    pub consumption: f64,
    pub color: [u8; 3],
    #[serde(rename = "coordonates")]
    pub coordinates: [f64; 2],
}

/// A city's consumption at one instant, ready for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySnapshot {
    pub city: String,
    pub consumption: f64,
    pub color: [u8; 3],
    pub coordinates: [f64; 2],
}

impl CitySnapshot {
    pub fn from_raw(city: String, raw: RawCitySnapshot) -> Self {
        Self {
            city,
            consumption: raw.consumption,
            color: raw.color,
            coordinates: raw.coordinates,
        }
    }
}

/// Format an instant the way the snapshot service expects (`DD.MM.YYYY HH:MM:SS`).
pub fn snapshot_time(at: PrimitiveDateTime) -> String {
    let fmt = format_description!("[day].[month].[year] [hour]:[minute]:[second]");
    // Formatting a PrimitiveDateTime with date and time components cannot fail.
    at.format(&fmt).unwrap_or_default()
}

/// Parse a `DD.MM.YYYY HH:MM:SS` snapshot time.
pub fn parse_snapshot_time(s: &str) -> Option<PrimitiveDateTime> {
    let fmt = format_description!("[day].[month].[year] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(s.trim(), &fmt).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn raw_snapshot_reads_upstream_field_names() {
        let raw: RawCitySnapshot = serde_json::from_str(
            r#"{"consumption": 12.5, "color": [255, 128, 0], "coordonates": [47.76, 27.93]}"#,
        )
        .unwrap();
        let snap = CitySnapshot::from_raw("Balti".to_string(), raw);
        assert_eq!(snap.color, [255, 128, 0]);
        assert_eq!(snap.coordinates, [47.76, 27.93]);
    }

    #[test]
    fn snapshot_time_round_trips_service_format() {
        let at = datetime!(2025-06-08 12:00:00);
        assert_eq!(snapshot_time(at), "08.06.2025 12:00:00");
        assert_eq!(parse_snapshot_time("08.06.2025 12:00:00"), Some(at));
        assert_eq!(parse_snapshot_time("2025-06-08 12:00:00"), None);
    }
}

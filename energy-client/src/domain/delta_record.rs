use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name carrying the imported energy between two meter readings.
pub const IMPORT_DELTA: &str = "Import Delta";
/// Field name carrying the exported energy between two meter readings.
pub const EXPORT_DELTA: &str = "Export Delta";

/// One historical consumption delta as returned by `GET /diff/{meterId}`.
///
/// The timestamp is the reading that closes the interval, formatted
/// `YYYY-MM-DD HH:MM:SS`. Every other upstream field is kept verbatim in
/// `fields` and read through [`RawDeltaRecord::field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDeltaRecord {
    #[serde(rename = "Date of Second Val")]
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawDeltaRecord {
    /// Numeric value of a named field; `None` when absent or not a number.
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }
}

/// Split `YYYY-MM-DD HH:MM:SS` into its date and time-of-day halves.
///
/// A timestamp without a space has an empty time part.
pub fn split_timestamp(ts: &str) -> (&str, &str) {
    match ts.split_once(' ') {
        Some((date, time)) => (date, time),
        None => (ts, ""),
    }
}

/// True when the minute and second fields of `YYYY-MM-DD HH:MM:SS` are zero.
pub fn is_whole_hour(ts: &str) -> bool {
    ts.get(14..19) == Some("00:00")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_extra_fields_and_reads_numbers() {
        let rec: RawDeltaRecord = serde_json::from_str(
            r#"{"Date of Second Val":"2025-06-08 03:00:00","Import Delta":1.5,"Export Delta":0,"Time Delta":"1:00:00"}"#,
        )
        .unwrap();

        assert_eq!(rec.timestamp, "2025-06-08 03:00:00");
        assert_eq!(rec.field(IMPORT_DELTA), Some(1.5));
        assert_eq!(rec.field(EXPORT_DELTA), Some(0.0));
        assert_eq!(rec.field("Time Delta"), None);
        assert_eq!(rec.field("missing"), None);
        assert_eq!(split_timestamp(&rec.timestamp).0, "2025-06-08");
        assert!(is_whole_hour(&rec.timestamp));
    }

    #[test]
    fn record_without_timestamp_is_rejected() {
        let res = serde_json::from_str::<RawDeltaRecord>(r#"{"Import Delta":1.0}"#);
        assert!(res.is_err());
    }

    #[test]
    fn whole_hour_checks_minute_and_second() {
        assert!(is_whole_hour("2025-06-08 05:00:00"));
        assert!(!is_whole_hour("2025-06-08 05:15:00"));
        assert!(!is_whole_hour("2025-06-08 05:00:30"));
        assert!(!is_whole_hour("2025-06-08"));
        assert!(!is_whole_hour(""));
    }

    #[test]
    fn split_without_time_part() {
        assert_eq!(split_timestamp("2025-06-08"), ("2025-06-08", ""));
        assert_eq!(split_timestamp("2025-06-08 00:00:00"), ("2025-06-08", "00:00:00"));
    }
}

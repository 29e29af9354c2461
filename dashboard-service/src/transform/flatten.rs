use energy_client::domain::{is_whole_hour, RegionTimeMap, RegionTimePoint};
use serde_json::Value;

/// Whole-hour `{timestamp, import, export}` points of a region's timestamp map,
/// in the map's iteration order. Missing or non-numeric `Import`/`Export`
/// stay `None`.
pub fn flatten_region(map: &RegionTimeMap) -> Vec<RegionTimePoint> {
    map.iter()
        .filter(|(timestamp, _)| is_whole_hour(timestamp))
        .map(|(timestamp, sample)| RegionTimePoint {
            timestamp: timestamp.clone(),
            import: number_field(sample, "Import"),
            export: number_field(sample, "Export"),
        })
        .collect()
}

fn number_field(sample: &Value, name: &str) -> Option<f64> {
    sample.get(name).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> RegionTimeMap {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn keeps_only_whole_hour_entries() {
        let points = flatten_region(&map(json!({
            "2025-06-08 05:00:00": {"Import": 5, "Export": 2},
            "2025-06-08 05:15:00": {"Import": 9, "Export": 1}
        })));

        assert_eq!(
            points,
            vec![RegionTimePoint {
                timestamp: "2025-06-08 05:00:00".to_string(),
                import: Some(5.0),
                export: Some(2.0),
            }]
        );
    }

    #[test]
    fn excluded_entries_flatten_to_nothing() {
        let source = map(json!({
            "2025-06-08 05:00:00": {"Import": 5, "Export": 2},
            "2025-06-08 05:15:00": {"Import": 9, "Export": 1},
            "2025-06-08 05:30:30": {"Import": 1, "Export": 1},
            "2025-06-08 06:00:00": {"Import": 3, "Export": 0}
        }));
        let excluded: RegionTimeMap = source
            .iter()
            .filter(|(ts, _)| !is_whole_hour(ts))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        assert_eq!(excluded.len(), 2);
        assert!(flatten_region(&excluded).is_empty());
    }

    #[test]
    fn keeps_upstream_order() {
        let points = flatten_region(&map(json!({
            "2025-06-08 07:00:00": {"Import": 1, "Export": 0},
            "2025-06-08 03:00:00": {"Import": 2, "Export": 0},
            "2025-06-08 05:00:00": {"Import": 3, "Export": 0}
        })));
        let stamps: Vec<&str> = points.iter().map(|p| p.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            vec!["2025-06-08 07:00:00", "2025-06-08 03:00:00", "2025-06-08 05:00:00"]
        );
    }

    #[test]
    fn missing_fields_surface_as_none() {
        let points = flatten_region(&map(json!({
            "2025-06-08 05:00:00": {"Import": 5},
            "2025-06-08 06:00:00": "garbage"
        })));
        assert_eq!(points[0].export, None);
        assert_eq!(points[0].import, Some(5.0));
        assert_eq!(points[1].import, None);
        assert_eq!(points[1].export, None);
    }
}

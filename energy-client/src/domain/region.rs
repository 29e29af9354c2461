use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One whole-hour import/export sample of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTimePoint {
    pub timestamp: String,
    pub import: Option<f64>,
    pub export: Option<f64>,
}

/// A region's timestamp map as sent by `GET /region/all`, in upstream order.
pub type RegionTimeMap = Map<String, Value>;

/// Ordered whole-hour samples of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeries {
    pub region: String,
    pub points: Vec<RegionTimePoint>,
}

impl RegionSeries {
    /// Most recent sample in upstream order ("current import/export").
    pub fn latest(&self) -> Option<&RegionTimePoint> {
        self.points.last()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One region's total from `GET /consumptions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalConsumption {
    pub region: String,
    pub total_kw: f64,
}

/// Sort regional totals, largest consumer first.
///
/// Entries whose value is not a number are dropped.
pub fn rank_consumers(totals: &Map<String, Value>) -> Vec<RegionalConsumption> {
    let mut ranked: Vec<RegionalConsumption> = totals
        .iter()
        .filter_map(|(region, v)| {
            v.as_f64().map(|total_kw| RegionalConsumption {
                region: region.clone(),
                total_kw,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.total_kw.total_cmp(&a.total_kw));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rank_consumers_orders_descending_and_skips_non_numbers() {
        let totals = json!({"Cahul": 12.5, "Balti": 40, "Orhei": "n/a", "Soroca": 3})
            .as_object()
            .cloned()
            .unwrap();

        let ranked = rank_consumers(&totals);
        let names: Vec<&str> = ranked.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["Balti", "Cahul", "Soroca"]);
        assert_eq!(ranked[0].total_kw, 40.0);
    }

    #[test]
    fn latest_is_last_in_upstream_order() {
        let series = RegionSeries {
            region: "Balti".to_string(),
            points: vec![
                RegionTimePoint {
                    timestamp: "2025-06-08 05:00:00".to_string(),
                    import: Some(5.0),
                    export: Some(2.0),
                },
                RegionTimePoint {
                    timestamp: "2025-06-08 04:00:00".to_string(),
                    import: None,
                    export: Some(1.0),
                },
            ],
        };
        assert_eq!(series.latest().map(|p| p.timestamp.as_str()), Some("2025-06-08 04:00:00"));
    }
}

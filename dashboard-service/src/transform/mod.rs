use energy_client::domain::{HourlySeries, RawDeltaRecord, RegionTimeMap, RegionTimePoint, IMPORT_DELTA};
use time::Date;

use crate::pipeline::Transform;

pub mod demand;
pub mod extract;
pub mod fallback;
pub mod filter;
pub mod flatten;
pub mod gap_fill;

pub use demand::demand_curve;
pub use extract::extract_field;
pub use fallback::{FallbackRange, FallbackSynthesizer};
pub use filter::{filter_records, on_hour_boundary, whole_hours_on};
pub use flatten::flatten_region;
pub use gap_fill::{gap_fill, GAP_SENTINEL};

/// Filter → extract → gap-fill: one calendar day of deltas as a 25-point curve.
#[derive(Debug, Clone)]
pub struct DayCurve {
    pub date: Date,
    pub field: &'static str,
}

impl DayCurve {
    /// Import deltas of `date`.
    pub fn import_on(date: Date) -> Self {
        Self {
            date,
            field: IMPORT_DELTA,
        }
    }
}

impl Transform<[RawDeltaRecord], HourlySeries> for DayCurve {
    fn apply(&self, records: &[RawDeltaRecord]) -> HourlySeries {
        let day = whole_hours_on(records, self.date);
        gap_fill(&extract_field(&day, self.field))
    }
}

/// Whole-hour points of a region's timestamp map.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionFlatten;

impl Transform<RegionTimeMap, Vec<RegionTimePoint>> for RegionFlatten {
    fn apply(&self, map: &RegionTimeMap) -> Vec<RegionTimePoint> {
        flatten_region(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn records(v: serde_json::Value) -> Vec<RawDeltaRecord> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn day_curve_composes_filter_extract_and_gap_fill() {
        let input = records(json!([
            {"Date of Second Val": "2025-06-07 00:00:00", "Import Delta": 99},
            {"Date of Second Val": "2025-06-08 00:00:00", "Import Delta": 10},
            {"Date of Second Val": "2025-06-08 00:30:00", "Import Delta": 50},
            {"Date of Second Val": "2025-06-08 01:00:00", "Import Delta": 12}
        ]));

        let curve = DayCurve::import_on(date!(2025 - 06 - 08)).apply(&input);
        assert_eq!(curve.values().len(), 25);
        assert_eq!(&curve.values()[..3], &[10.0, 12.0, 13.0]);
        assert!(curve.values()[2..].iter().all(|v| *v == 13.0));
        assert_eq!(curve.padded(), 23);
    }

    #[test]
    fn day_without_records_is_all_sentinel() {
        let input = records(json!([
            {"Date of Second Val": "2025-06-07 00:00:00", "Import Delta": 99}
        ]));
        let curve = DayCurve::import_on(date!(2025 - 06 - 08)).apply(&input);
        assert!(curve.values().iter().all(|v| *v == GAP_SENTINEL));
    }

    #[test]
    fn region_flatten_is_the_flattener() {
        let map = json!({"2025-06-08 05:00:00": {"Import": 5, "Export": 2}})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(RegionFlatten.apply(&map), flatten_region(&map));
    }
}

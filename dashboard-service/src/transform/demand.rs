use energy_client::domain::{HourlySeries, HOURLY_SERIES_LEN};

const MORNING_PEAK: (f64, f64) = (9.0, 2.0);
const EVENING_PEAK: (f64, f64) = (19.0, 2.5);

fn gaussian(x: f64, mean: f64, sigma: f64) -> f64 {
    (-0.5 * ((x - mean) / sigma).powi(2)).exp()
}

/// Typical daily demand shape shown beside the tariff estimate: a morning and
/// an evening bell curve, scaled so the highest hour is 100.
pub fn demand_curve() -> HourlySeries {
    let raw: Vec<f64> = (0..HOURLY_SERIES_LEN)
        .map(|h| {
            let x = h as f64;
            gaussian(x, MORNING_PEAK.0, MORNING_PEAK.1) + gaussian(x, EVENING_PEAK.0, EVENING_PEAK.1)
        })
        .collect();
    let max = raw.iter().copied().fold(f64::MIN, f64::max);
    let scaled = raw.into_iter().map(|v| v / max * 100.0).collect();

    match HourlySeries::try_new(scaled, 0, 0) {
        Some(series) => series,
        None => unreachable!("demand curve has one point per hour 00..=24"),
    }
}

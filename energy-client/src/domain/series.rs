use serde::{Deserialize, Serialize};

/// Points in a daily consumption curve: hours 00 through 24 inclusive.
pub const HOURLY_SERIES_LEN: usize = 25;

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Fallback,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
        }
    }
}

/// Number of hourly buckets requested from a prediction source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    #[default]
    Day,
    Week,
}

impl Horizon {
    pub fn hours(self) -> usize {
        match self {
            Self::Day => 24,
            Self::Week => 168,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// A 25-point, hour-aligned daily curve.
///
/// Only constructible with exactly [`HOURLY_SERIES_LEN`] values. `padded`
/// counts trailing synthetic values, `masked` counts holes replaced in the
/// measured prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySeries {
    values: Vec<f64>,
    padded: usize,
    masked: usize,
}

impl HourlySeries {
    pub fn try_new(values: Vec<f64>, padded: usize, masked: usize) -> Option<Self> {
        if values.len() != HOURLY_SERIES_LEN || padded > HOURLY_SERIES_LEN {
            return None;
        }
        Some(Self {
            values,
            padded,
            masked,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn padded(&self) -> usize {
        self.padded
    }

    pub fn masked(&self) -> usize {
        self.masked
    }
}

/// A prediction curve with one value per hour of its horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSeries {
    pub horizon: Horizon,
    pub values: Vec<f64>,
    pub provenance: Provenance,
}

impl PredictionSeries {
    pub fn peak(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Mean of every 24-hour block; one entry per day of the horizon.
    pub fn daily_means(&self) -> Vec<f64> {
        self.values
            .chunks(Horizon::Day.hours())
            .map(|day| day.iter().sum::<f64>() / day.len() as f64)
            .collect()
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// The three consumption views of a meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayView {
    Yesterday,
    Today,
    Tomorrow,
}

/// Historical curve for one day, or the reason it cannot be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HistoricalDay {
    Available { series: HourlySeries },
    Unavailable { reason: String },
}

impl HistoricalDay {
    pub fn series(&self) -> Option<&HourlySeries> {
        match self {
            Self::Available { series } => Some(series),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Everything the hourly consumption page shows for one meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionView {
    pub meter_id: String,
    pub yesterday: HistoricalDay,
    pub today: HistoricalDay,
    pub tomorrow: PredictionSeries,
}

impl ConsumptionView {
    /// Chart values for a view; `None` when historical data is unavailable.
    pub fn series(&self, view: DayView) -> Option<&[f64]> {
        match view {
            DayView::Yesterday => self.yesterday.series().map(HourlySeries::values),
            DayView::Today => self.today.series().map(HourlySeries::values),
            DayView::Tomorrow => Some(&self.tomorrow.values),
        }
    }

    pub fn provenance(&self) -> Provenance {
        self.tomorrow.provenance
    }
}

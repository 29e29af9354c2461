use time::{Date, OffsetDateTime};

pub mod city_map;
pub mod consumption;
pub mod forecast;
pub mod region;
pub mod tariff;

pub use city_map::CityMap;
pub use consumption::MeterConsumption;
pub use forecast::{CityForecast, CityForecasts, ForecastKey};
pub use region::RegionFlow;
pub use tariff::{TariffLookup, TariffPanel};

/// Which day counts as "today" for the historical views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calendar {
    fixed_today: Option<Date>,
}

impl Calendar {
    /// Follow the current UTC date.
    pub fn system() -> Self {
        Self { fixed_today: None }
    }

    /// Pin "today", for replays and tests.
    pub fn fixed(today: Date) -> Self {
        Self {
            fixed_today: Some(today),
        }
    }

    pub fn today(&self) -> Date {
        self.fixed_today
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }

    /// `None` only on the first representable date.
    pub fn yesterday(&self) -> Option<Date> {
        self.today().previous_day()
    }
}

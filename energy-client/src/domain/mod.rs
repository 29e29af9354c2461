pub mod city;
pub mod delta_record;
pub mod region;
pub mod series;
pub mod session;
pub mod snapshot;
pub mod tariff;

pub use city::{canonical_location, City, Location, UnknownCity};
pub use delta_record::{is_whole_hour, RawDeltaRecord, EXPORT_DELTA, IMPORT_DELTA};
pub use region::{rank_consumers, RegionSeries, RegionTimeMap, RegionTimePoint, RegionalConsumption};
pub use series::{
    ConsumptionView, DayView, HistoricalDay, Horizon, HourlySeries, PredictionSeries, Provenance,
    HOURLY_SERIES_LEN,
};
pub use session::SessionContext;
pub use snapshot::{parse_snapshot_time, snapshot_time, CitySnapshot, RawCitySnapshot};
pub use tariff::{TariffEstimate, TariffQuote, MAX_TARIFF_HOUR};

use energy_client::domain::{delta_record::split_timestamp, RawDeltaRecord};
use time::{macros::format_description, Date};

/// Records on `date` (`YYYY-MM-DD`) whose time-of-day satisfies `time_matches`,
/// in input order.
pub fn filter_records<'a, P>(
    records: &'a [RawDeltaRecord],
    date: &str,
    time_matches: P,
) -> Vec<&'a RawDeltaRecord>
where
    P: Fn(&str) -> bool,
{
    records
        .iter()
        .filter(|r| {
            let (day, time_of_day) = split_timestamp(&r.timestamp);
            day == date && time_matches(time_of_day)
        })
        .collect()
}

/// True when an `HH:MM:SS` time-of-day ends on `00:00` (minute and second zero).
pub fn on_hour_boundary(time_of_day: &str) -> bool {
    time_of_day.len() == 8 && time_of_day.ends_with(":00:00")
}

/// Whole-hour records of one calendar day.
pub fn whole_hours_on(records: &[RawDeltaRecord], date: Date) -> Vec<&RawDeltaRecord> {
    filter_records(records, &iso_date(date), on_hour_boundary)
}

pub fn iso_date(date: Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    date.format(&fmt).unwrap_or_default()
}

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format accepted by the statistics endpoint, e.g. `02/08/2020`
pub const DAY_FORMAT: &str = "%d/%m/%Y";

/// Start of a UTC hour; the unit counters are aggregated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HourBucket(NaiveDateTime);

impl HourBucket {
    /// Truncate a UTC timestamp to the start of its hour
    pub fn containing(time: NaiveDateTime) -> Self {
        let hour = time
            .date()
            .and_hms_opt(time.hour(), 0, 0)
            .unwrap_or(time);
        Self(hour)
    }

    /// Bucket for a millisecond epoch timestamp; sub-second precision is
    /// dropped before truncating. `None` when out of chrono's range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        let seconds = millis.div_euclid(1000);
        DateTime::<Utc>::from_timestamp(seconds, 0).map(|time| Self::containing(time.naive_utc()))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.0
    }

    pub fn day(&self) -> NaiveDate {
        self.0.date()
    }
}

impl From<NaiveDateTime> for HourBucket {
    fn from(time: NaiveDateTime) -> Self {
        Self::containing(time)
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Half-open range `[first bucket of day, first bucket of next day)`
pub fn day_range(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(chrono::NaiveTime::MIN);
    (start, start + Duration::days(1))
}

/// Parse a `day/month/year` date as sent to the statistics endpoint
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok()
}

/// Valid and invalid request counts of one customer over one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounts {
    pub valid: i64,
    pub invalid: i64,
}

impl DailyCounts {
    pub fn total(&self) -> i64 {
        self.valid + self.invalid
    }
}

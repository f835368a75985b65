use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};

use crate::core::CbpError;

/// The candle sizes the exchange serves.
///
/// Parsed from the names `minute`, `five_minute`, `fifteen_minute`, `hour`,
/// `six_hour` and `daily`. Anything else is [`CbpError::UnknownInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Minute,
    FiveMinute,
    FifteenMinute,
    Hour,
    SixHour,
    Daily,
}

impl Granularity {
    pub const ALL: [Granularity; 6] = [
        Granularity::Minute,
        Granularity::FiveMinute,
        Granularity::FifteenMinute,
        Granularity::Hour,
        Granularity::SixHour,
        Granularity::Daily,
    ];

    /// Look up an interval by name.
    ///
    /// # Errors
    /// [`CbpError::UnknownInterval`] for names outside the table.
    pub fn from_name(name: &str) -> Result<Self, CbpError> {
        Self::ALL
            .into_iter()
            .find(|g| g.name() == name)
            .ok_or_else(|| CbpError::UnknownInterval(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Minute => "minute",
            Granularity::FiveMinute => "five_minute",
            Granularity::FifteenMinute => "fifteen_minute",
            Granularity::Hour => "hour",
            Granularity::SixHour => "six_hour",
            Granularity::Daily => "daily",
        }
    }

    /// Bucket length in seconds, as sent in the `granularity` query parameter.
    pub fn seconds(self) -> i64 {
        match self {
            Granularity::Minute => 60,
            Granularity::FiveMinute => 300,
            Granularity::FifteenMinute => 900,
            Granularity::Hour => 3_600,
            Granularity::SixHour => 21_600,
            Granularity::Daily => 86_400,
        }
    }

    pub fn duration(self) -> TimeDelta {
        TimeDelta::seconds(self.seconds())
    }

    /// Start of the bucket containing `t`. Buckets are aligned to the Unix epoch.
    pub fn floor(self, t: DateTime<Utc>) -> DateTime<Utc> {
        let secs = t.timestamp();
        DateTime::from_timestamp(secs - secs.rem_euclid(self.seconds()), 0).unwrap_or(t)
    }
}

impl FromStr for Granularity {
    type Err = CbpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

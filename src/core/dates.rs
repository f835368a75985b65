use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::core::CbpError;

/// Parse the instants the API and its callers use.
///
/// Accepts RFC 3339 (`2019-11-29T20:15:31.148917Z`), the space-separated form
/// some endpoints emit (`2019-11-29 20:15:31.148917+00`), a naive ISO datetime
/// taken as UTC, and a bare date taken as UTC midnight.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, CbpError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CbpError::Data(format!("unrecognized date: {s:?}")))
}

/// Serde adapter so typed records accept every form [`parse_instant`] does.
pub(crate) fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_opt_instant<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_instant(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

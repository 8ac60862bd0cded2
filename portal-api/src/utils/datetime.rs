//! Date/time (de)serialization helpers
//!
//! The portal backend is not consistent about timestamp formats: most fields
//! are RFC3339, calendar dates such as domain expiry come as `YYYY-MM-DD`, and
//! a few legacy endpoints send Unix timestamps. Everything is normalized to
//! `DateTime<Utc>`.
//!
//! - Serialize: `DateTime<Utc>` -> RFC3339 string
//! - Deserialize: RFC3339 string, `YYYY-MM-DD`, or Unix timestamp -> `DateTime<Utc>`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    String(String),
    I64(i64),
}

/// Serialize `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserialize an RFC3339 string, a calendar date or a Unix timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = RawTimestamp::deserialize(deserializer)?;
    from_raw(raw).map_err(Error::custom)
}

fn from_raw(raw: RawTimestamp) -> Result<DateTime<Utc>, String> {
    match raw {
        RawTimestamp::String(s) => parse_timestamp(&s),
        RawTimestamp::I64(ts) => {
            parse_unix_timestamp(ts).ok_or_else(|| format!("Invalid Unix timestamp: {ts}"))
        }
    }
}

/// Parse an RFC3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid timestamp: {s}"))
}

/// Parse a Unix timestamp, telling seconds and milliseconds apart by magnitude.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

/// Same formats as the parent module, for optional fields.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{RawTimestamp, from_raw};

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<RawTimestamp>::deserialize(deserializer)? {
            Some(raw) => from_raw(raw).map(Some).map_err(Error::custom),
            None => Ok(None),
        }
    }
}

//! ISO-8601 timestamps as they are stored in documents.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp kept in its original textual form alongside the parsed instant.
///
/// Accepts RFC 3339 instants, offset-less date-times (read as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC). Anything else fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoTimestamp {
    raw: String,
    instant: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not an ISO-8601 date or timestamp")]
pub struct InvalidTimestamp(String);

impl IsoTimestamp {
    pub fn parse(raw: &str) -> Result<Self, InvalidTimestamp> {
        let trimmed = raw.trim();
        let instant = DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
            .or_else(|_| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            })
            .map_err(|_| InvalidTimestamp(raw.to_string()))?;

        Ok(Self {
            raw: trimmed.to_string(),
            instant,
        })
    }

    /// Current wall-clock time, rendered with millisecond precision.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `YYYY-MM` prefix of the stored text.
    pub fn month(&self) -> &str {
        self.raw.get(..7).unwrap_or(&self.raw)
    }
}

impl From<DateTime<Utc>> for IsoTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            instant,
        }
    }
}

impl TryFrom<String> for IsoTimestamp {
    type Error = InvalidTimestamp;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IsoTimestamp> for String {
    fn from(value: IsoTimestamp) -> Self {
        value.raw
    }
}

impl fmt::Display for IsoTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

//! Millisecond-precision UTC instants

use crate::errors::{Error, Result};
use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A UTC instant truncated to millisecond precision.
///
/// Stored values only ever carry milliseconds, so truncating at construction
/// keeps an instant equal to itself after a trip through storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateInstant(DateTime<Utc>);

impl DateInstant {
    /// Create an instant, dropping sub-millisecond precision
    pub fn new(at: DateTime<Utc>) -> Self {
        let millis = (at.nanosecond() / 1_000_000) * 1_000_000;
        Self(at.with_nanosecond(millis).unwrap_or(at))
    }

    /// The current instant
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Create an instant from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Parse an ISO-8601 / RFC 3339 timestamp
    pub fn parse_iso(text: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|at| Self::new(at.with_timezone(&Utc)))
            .map_err(|e| Error::decode_with_source(format!("invalid ISO-8601 instant '{text}'"), e))
    }

    /// ISO-8601 UTC form with exactly three fractional digits, e.g. `2025-01-01T12:00:00.000Z`
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for DateInstant {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for DateInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl FromStr for DateInstant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_iso(s)
    }
}

impl Serialize for DateInstant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for DateInstant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse_iso(&text).map_err(serde::de::Error::custom)
    }
}

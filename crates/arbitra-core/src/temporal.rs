//! # Event Timestamps
//!
//! Escrow state carries no wall-clock data; ordering comes from escrow ids
//! and transaction ids. Time appears only on emitted events and on
//! generated CLI transaction references, both in whole UTC seconds.
//!
//! A [`Timestamp`] drops subseconds when it is built, so the value, its
//! `Display` form and its serialized form always agree:
//! `2026-01-15T12:00:00Z`.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC instant with whole-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC second.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Truncate `dt` to whole seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Parse an RFC 3339 instant. Offsets are converted to UTC and
    /// subseconds are dropped.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_canonical_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_canonical_string()
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

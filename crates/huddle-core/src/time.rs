//! Timestamp type with an explicit serialization contract
//!
//! Every persisted record in the Huddle stores carries timestamps, and the
//! rehydration contract requires that a timestamp written to storage parses
//! back to the same instant. `Timestamp` therefore serializes itself as an
//! RFC 3339 string through hand-written `Serialize`/`Deserialize` impls
//! rather than relying on ambient container behavior, and comparisons go
//! through the parsed instant, never the string form.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A UTC instant, serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wrap an existing instant
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Build from milliseconds since the Unix epoch.
    ///
    /// Returns `None` when the value is outside chrono's representable
    /// range.
    pub fn from_unix_millis(ms: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(ms).map(Self)
    }

    /// The wrapped instant
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch
    pub fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Render as an RFC 3339 string, the persisted form.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Parse the persisted RFC 3339 form back into an instant.
    pub fn parse_rfc3339(raw: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_instant() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_serializes_as_rfc3339_string() {
        let ts = Timestamp::from_unix_millis(1_700_000_000_000).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with("\"2023-11-14T"));
        assert!(json.ends_with("+00:00\""));
    }

    #[test]
    fn test_parsed_timestamps_order_by_instant() {
        // Offsets differ but the later instant must still sort last.
        let early: Timestamp = serde_json::from_str("\"2024-03-01T12:00:00+02:00\"").unwrap();
        let late: Timestamp = serde_json::from_str("\"2024-03-01T11:30:00+00:00\"").unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let res: Result<Timestamp, _> = serde_json::from_str("\"yesterday\"");
        assert!(res.is_err());
    }
}

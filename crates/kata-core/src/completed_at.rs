//! Completion timestamps that keep the catalog's text.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// When a challenge was completed, as the catalog wrote it.
///
/// The raw text is what gets stored and what commit messages quote, so a
/// load/save cycle never rewrites `2024-03-01T10:15:30.000Z` into another
/// RFC 3339 spelling. Equality compares the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletedAt {
    raw: String,
    at: DateTime<Utc>,
}

impl CompletedAt {
    /// Parse an RFC 3339 timestamp, keeping `raw` verbatim.
    pub fn parse(raw: impl Into<String>) -> Result<Self, chrono::ParseError> {
        let raw = raw.into();
        let at = DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc);
        Ok(Self { raw, at })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Millisecond precision with a `Z` suffix, the catalog's own spelling.
impl From<DateTime<Utc>> for CompletedAt {
    fn from(at: DateTime<Utc>) -> Self {
        Self {
            raw: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            at,
        }
    }
}

impl fmt::Display for CompletedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for CompletedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for CompletedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn keeps_source_text() {
        let at: CompletedAt = serde_json::from_str(r#""2024-03-01T10:15:30.000Z""#).unwrap();
        assert_eq!(at.as_str(), "2024-03-01T10:15:30.000Z");
        assert_eq!(at.timestamp(), Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap());
        assert_eq!(serde_json::to_string(&at).unwrap(), r#""2024-03-01T10:15:30.000Z""#);
    }

    #[test]
    fn offsets_are_normalized_only_in_the_timestamp() {
        let at = CompletedAt::parse("2024-03-01T12:15:30+02:00").unwrap();
        assert_eq!(at.to_string(), "2024-03-01T12:15:30+02:00");
        assert_eq!(at.timestamp(), Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap());
    }

    #[test]
    fn built_timestamps_use_milliseconds() {
        let at = CompletedAt::from(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(at.as_str(), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn rejects_non_timestamps() {
        assert!(serde_json::from_str::<CompletedAt>(r#""yesterday""#).is_err());
    }
}

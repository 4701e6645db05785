//! Clock and wire-timestamp helpers
//!
//! Every instant that crosses the wire is an ISO-8601 string with a `Z`
//! offset. Instants are truncated to whole microseconds so a stored value
//! survives a format/parse round trip unchanged.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

/// Current server instant, truncated to microsecond precision.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// Format an instant as an ISO-8601 string (e.g. `2024-05-01T12:30:00.123456Z`).
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an ISO-8601 instant, returning `None` when the string is malformed.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Reconstruct an instant from stored epoch microseconds.
pub fn from_epoch_micros(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_round_trip() {
        let instant = now();
        let parsed = parse(&format(&instant)).unwrap();
        assert_eq!(instant, parsed);
    }

    #[test]
    fn test_parse_accepts_offset_forms() {
        let parsed = parse("2024-05-01T12:30:00+02:00").unwrap();
        assert_eq!(format(&parsed), "2024-05-01T10:30:00.000000Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("not-a-timestamp").is_none());
        assert!(parse("2024-13-40T99:00:00Z").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn test_epoch_micros_round_trip() {
        let instant = now();
        let restored = from_epoch_micros(instant.timestamp_micros()).unwrap();
        assert_eq!(instant, restored);
    }
}

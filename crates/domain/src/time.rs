//! Time and timestamp helpers.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// UTC timestamp used for `last_seen`, history points, and poll times.
pub type Timestamp = DateTime<Utc>;

/// Format used by devices that report local wall-clock times without a zone.
const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert epoch milliseconds into a timestamp.
#[must_use]
pub fn from_epoch_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis)
}

/// Parse a timestamp in any of the shapes the telemetry server emits.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` in the local time zone, and a
/// string of epoch milliseconds. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT) {
        return from_local_wall_clock(&naive);
    }
    raw.parse::<i64>().ok().and_then(from_epoch_millis)
}

/// Interpret a zone-less wall-clock time in the local time zone.
///
/// An ambiguous time (clocks turned back) resolves to the earlier instant; a
/// time skipped by a DST jump does not exist and yields `None`.
#[must_use]
pub fn from_local_wall_clock(naive: &NaiveDateTime) -> Option<Timestamp> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Render a timestamp as a local wall-clock time (`HH:MM:SS`).
#[must_use]
pub fn format_clock(ts: &Timestamp) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_rfc3339() {
        let ts = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn should_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn should_parse_naive_wall_clock_in_local_zone() {
        let ts = parse_timestamp("2024-03-05 10:20:30").unwrap();
        let expected = Local
            .with_ymd_and_hms(2024, 3, 5, 10, 20, 30)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(ts, expected);
        assert_eq!(ts.with_timezone(&Local).format("%H:%M:%S").to_string(), "10:20:30");
    }

    #[test]
    fn should_parse_epoch_millis() {
        let ts = parse_timestamp("1704067200000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn should_return_none_for_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn should_format_clock_time() {
        let ts = Local
            .with_ymd_and_hms(2024, 1, 1, 7, 5, 9)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_clock(&ts), "07:05:09");
    }
}

//! Timestamp parsing for raw time cells.
//!
//! Text cells accept RFC 3339, naive date-times and plain dates (read as UTC).
//! Integer cells are milliseconds since the Unix epoch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use trend_core::{RawValue, Timestamp};

/// Naive date-time layouts, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts; the result is midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a raw cell into a UTC timestamp.
///
/// Returns `None` for cells that are not a recognised timestamp.
pub fn parse_timestamp(value: &RawValue) -> Option<Timestamp> {
    match value {
        RawValue::Text(s) => parse_text(s.trim()),
        RawValue::Int(ms) => DateTime::<Utc>::from_timestamp_millis(*ms),
        RawValue::Null | RawValue::Bool(_) | RawValue::Float(_) => None,
    }
}

fn parse_text(s: &str) -> Option<Timestamp> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_plain_date() {
        let ts = parse_timestamp(&text("2023-01-03")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap());

        let ts = parse_timestamp(&text("2023/01/03")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let ts = parse_timestamp(&text("2023-01-03T10:00:00+02:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 3, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime() {
        let ts = parse_timestamp(&text(" 2023-01-03 09:30:15 ")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 1, 3, 9, 30, 15).unwrap());

        let ts = parse_timestamp(&text("2023-01-03T09:30:15.250")).unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_epoch_millis() {
        // 2024-01-01 00:01:30.500 UTC
        let ts = parse_timestamp(&RawValue::Int(1704067290500)).unwrap();
        assert_eq!(ts.timestamp_millis(), 1704067290500);
    }

    #[test]
    fn test_rejects_other_cells() {
        assert!(parse_timestamp(&text("yesterday")).is_none());
        assert!(parse_timestamp(&text("")).is_none());
        assert!(parse_timestamp(&text("2023-02-30")).is_none());
        assert!(parse_timestamp(&RawValue::Null).is_none());
        assert!(parse_timestamp(&RawValue::Float(1.5)).is_none());
        assert!(parse_timestamp(&RawValue::Bool(true)).is_none());
    }
}

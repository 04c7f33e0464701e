//! Transaction timestamp parsing.
//!
//! Offsets are kept: the hour of day is read in the offset the timestamp
//! was written in, never converted to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Tried after strict RFC 3339. `%#z` takes `Z`, `+05`, `+0530` and `+05:30`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a transaction timestamp. Returns `None` for anything unrecognised.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn accepts_minute_precision_iso() {
        let ts = parse_timestamp("2024-01-01T10:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn keeps_offset_local_hour() {
        let ts = parse_timestamp("2024-03-05T23:15:00+05:30").unwrap();
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn minute_precision_with_zulu() {
        let ts = parse_timestamp("2024-01-01T10:00Z").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 0);
    }

    #[test]
    fn offset_without_colon() {
        let ts = parse_timestamp("2024-01-01T10:00:00+0530").unwrap();
        assert_eq!(ts.hour(), 10);

        let ts = parse_timestamp("2024-01-01 22:30:00-0800").unwrap();
        assert_eq!(ts.hour(), 22);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn fractional_seconds_and_space_separator() {
        let ts = parse_timestamp("2023-12-31 07:45:12.250").unwrap();
        assert_eq!(ts.hour(), 7);
    }

    #[test]
    fn bare_date_is_midnight() {
        let ts = parse_timestamp("2024-02-29").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-01 10:00:00").is_none());
    }
}

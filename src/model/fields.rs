//! Lenient parsers for the raw text fields of a work-log row.
//!
//! None of these fail. A value that cannot be understood degrades to zero (durations) or `None`
//! (dates) and the row is still ingested.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Parses text like `"1h 30m"`, `"59m 56s"` or `"2h 10m 0s"` into hours.
///
/// Each of the `h`, `m` and `s` components is the first integer found anywhere in the text
/// immediately followed by that unit letter. Absent components count as zero.
pub fn parse_duration(text: &str) -> f64 {
    parse_duration_seconds(text) as f64 / SECONDS_PER_HOUR
}

/// The whole number of seconds in a duration string, see [`parse_duration`].
pub fn parse_duration_seconds(text: &str) -> i64 {
    let hours = unit_component(text, 'h');
    let minutes = unit_component(text, 'm');
    let seconds = unit_component(text, 's');
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// Finds the first run of ASCII digits that is directly followed by `unit`.
fn unit_component(text: &str, unit: char) -> i64 {
    let bytes = text.as_bytes();
    let mut ix = 0;
    while ix < bytes.len() {
        if !bytes[ix].is_ascii_digit() {
            ix += 1;
            continue;
        }
        let start = ix;
        while ix < bytes.len() && bytes[ix].is_ascii_digit() {
            ix += 1;
        }
        if text[ix..].starts_with(unit) {
            return text[start..ix].parse().unwrap_or(0);
        }
    }
    0
}

// Two digit years go first, `%Y` would otherwise happily read "01/07/25" as the year 1
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Interprets `text` as a calendar date. Empty or unrecognized text is `None`, which callers treat
/// as "exclude from bucketing".
///
/// Timestamps that carry an explicit offset (RFC 3339) resolve to the calendar date written in
/// that offset, so the result never depends on the zone of the machine doing the parsing.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_parse_duration_all_components() {
        assert_close(parse_duration("2h 10m 0s"), 2.0 + 10.0 / 60.0);
        assert!((parse_duration("2h 10m 0s") - 2.1667).abs() < 1e-4);
    }

    #[test]
    fn test_parse_duration_partial() {
        assert_close(parse_duration("1h 30m"), 1.5);
        assert_close(parse_duration("59m 56s"), 59.0 / 60.0 + 56.0 / 3600.0);
        assert_close(parse_duration("45s"), 45.0 / 3600.0);
        assert_close(parse_duration("3h"), 3.0);
    }

    #[test]
    fn test_parse_duration_order_and_spacing_do_not_matter() {
        assert_close(parse_duration("30m1h"), 1.5);
        assert_close(parse_duration("took 1h and 15m"), 1.25);
    }

    #[test]
    fn test_parse_duration_garbage_is_zero() {
        assert_eq!(parse_duration(""), 0.0);
        assert_eq!(parse_duration("soon"), 0.0);
        assert_eq!(parse_duration("1.5"), 0.0);
        assert_eq!(parse_duration("h m s"), 0.0);
    }

    #[test]
    fn test_parse_duration_first_match_wins() {
        // The first integer directly followed by the unit is used
        assert_eq!(parse_duration_seconds("1h 2h"), 3600);
        assert_eq!(parse_duration_seconds("12 3m"), 180);
    }

    #[test]
    fn test_parse_duration_overflow_component_is_zero() {
        assert_eq!(parse_duration_seconds("99999999999999999999999h 5m"), 300);
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        for text in [
            "2025-01-07",
            "2025/01/07",
            "01/07/2025",
            "1/7/2025",
            "01/07/25",
            "Jan 7, 2025",
            "January 7, 2025",
            "7 Jan 2025",
            "2025-01-07T10:30:00",
            "2025-01-07 10:30",
            " 2025-01-07 ",
        ] {
            assert_eq!(parse_calendar_date(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn test_parse_calendar_date_rfc3339_keeps_written_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(
            parse_calendar_date("2025-01-07T23:30:00-08:00"),
            Some(expected)
        );
        assert_eq!(parse_calendar_date("2025-01-07T00:10:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_calendar_date_invalid() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("   "), None);
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date("2025-02-30"), None);
    }
}

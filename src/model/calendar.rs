//! The calendar convention used for bucketing: weeks start on Tuesday.

use crate::Result;
use anyhow::Context;
use chrono::{Datelike, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use std::fmt::{Display, Formatter};

/// Number of days from the week start to the week end, inclusive of neither.
pub const WEEK_SPAN_DAYS: u64 = 6;

/// The Tuesday on or before `date`.
///
/// With Sunday = 0 through Saturday = 6, the offset back to Tuesday is `day + 5` for Sunday and
/// Monday and `day - 2` otherwise.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let day = date.weekday().num_days_from_sunday();
    let offset = if day < 2 { day + 5 } else { day - 2 };
    date - Days::new(u64::from(offset))
}

/// The Monday that closes the week starting on `week_start`.
pub fn week_end_of(week_start: NaiveDate) -> NaiveDate {
    week_start + Days::new(WEEK_SPAN_DAYS)
}

/// Where "now" comes from: the host's local zone, or an offset pinned in configuration so that a
/// server produces the same buckets regardless of where it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    /// Parses an offset such as `+02:00` or `-0530`.
    pub fn from_offset(offset: &str) -> Result<Self> {
        let fixed: FixedOffset = offset
            .trim()
            .parse()
            .with_context(|| format!("Invalid UTC offset '{offset}', expected e.g. '+02:00'"))?;
        Ok(Zone::Fixed(fixed))
    }

    /// The current wall-clock time in this zone.
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Zone::Local => Local::now().naive_local(),
            Zone::Fixed(offset) => Utc::now().with_timezone(offset).naive_local(),
        }
    }

    /// Today's calendar date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_always_tuesday_and_idempotent() {
        let mut d = date(2024, 12, 1);
        while d < date(2025, 3, 1) {
            let start = week_start_of(d);
            assert_eq!(start.weekday(), Weekday::Tue, "{d}");
            assert!(start <= d);
            assert!((d - start).num_days() < 7);
            assert_eq!(week_start_of(start), start);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_week_end_is_six_days_later() {
        let start = week_start_of(date(2025, 1, 9));
        let end = week_end_of(start);
        assert_eq!((end - start).num_days(), 6);
        assert_eq!(end.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_monday_and_tuesday_split() {
        // Monday Jan 6 2025 closes the week that began Tuesday Dec 31 2024
        assert_eq!(week_start_of(date(2025, 1, 6)), date(2024, 12, 31));
        assert_eq!(week_start_of(date(2025, 1, 7)), date(2025, 1, 7));
        assert_eq!(week_end_of(date(2025, 1, 7)), date(2025, 1, 13));
    }

    #[test]
    fn test_sunday() {
        assert_eq!(week_start_of(date(2025, 1, 12)), date(2025, 1, 7));
    }

    #[test]
    fn test_zone_from_offset() {
        let zone = Zone::from_offset("+02:00").unwrap();
        assert_eq!(zone, Zone::Fixed(FixedOffset::east_opt(7200).unwrap()));
        assert!(Zone::from_offset("two hours").is_err());
    }
}

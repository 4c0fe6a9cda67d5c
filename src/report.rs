//! The read-only snapshot handed to anything that displays the engine's results.

use crate::model::{
    aggregate_by_day, aggregate_by_pay_type, aggregate_by_project, cycles, filter_buckets,
    filter_entries, hourly_rate, Amount, CycleStats, DayBucket, Entry, GoalHours, PayTypeRollup,
    ProjectRollup, TimeRange, WeekBucket,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// Headline numbers for a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Hours of every entry in the range, dated or not.
    pub total_hours: f64,
    /// Earnings of every entry in the range, dated or not.
    pub total_earnings: Amount,
    /// Earnings of the whole collection, regardless of range.
    pub total_earnings_all_time: Amount,
    /// Entries in the whole collection.
    pub total_entries: usize,
    pub entries_in_range: usize,
    pub avg_weekly_hours: f64,
    pub avg_weekly_earnings: Amount,
    pub avg_hourly_rate: f64,
    /// The goal hours multiplied by the average hourly rate.
    pub weekly_earnings_target: f64,
    /// Earnings of the dated entries that fall in the calendar year of "now", regardless of range.
    pub year_to_date_earnings: Amount,
}

/// How far back the daily trend reaches from "now".
pub const DAILY_TREND_DAYS: i64 = 30;

/// One point of the weekly trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub week: NaiveDate,
    pub hours: f64,
    pub earnings: Amount,
    pub target: f64,
    pub surplus: f64,
}

/// Everything derived from the entry collection for one range and goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub range: TimeRange,
    pub goal_hours: GoalHours,
    pub generated_at: NaiveDateTime,
    pub summary: Summary,
    /// Most recent first.
    pub weeks: Vec<WeekBucket>,
    /// Most recent first.
    pub days: Vec<DayBucket>,
    pub projects: Vec<ProjectRollup>,
    pub pay_types: Vec<PayTypeRollup>,
    /// Oldest first.
    pub trends: Vec<TrendPoint>,
    /// Days of the last [`DAILY_TREND_DAYS`] days with paid work, oldest first, regardless of
    /// range.
    pub daily_trend: Vec<DayBucket>,
    /// Most recent first.
    pub cycles: Vec<CycleStats>,
}

impl Report {
    /// Builds a report over `entries`. `all_weeks` must be the weekly buckets of the whole
    /// collection, most recent first.
    ///
    /// Cycles are laid out over every observed week so that their boundaries do not move when the
    /// range changes, and then only the cycles that end inside the range are kept.
    pub fn build(
        entries: &[Entry],
        all_weeks: &[WeekBucket],
        range: TimeRange,
        goal: GoalHours,
        now: NaiveDateTime,
    ) -> Self {
        let since = range.since(now.date());
        let in_range = filter_entries(entries, since);
        let weeks = filter_buckets(all_weeks, since);

        let oldest_first: Vec<WeekBucket> = all_weeks.iter().rev().cloned().collect();
        let cycles = cycles(&oldest_first, goal, now)
            .into_iter()
            .filter(|c| c.end_week >= since)
            .collect();

        let trends = weeks
            .iter()
            .rev()
            .map(|w| TrendPoint {
                week: w.start(),
                hours: w.total_hours(),
                earnings: w.total_earnings(),
                target: goal.get(),
                surplus: w.total_hours() - goal.get(),
            })
            .collect();

        Self {
            range,
            goal_hours: goal,
            generated_at: now,
            summary: summarize(entries, &in_range, &weeks, goal, now),
            daily_trend: daily_trend(entries, now),
            days: aggregate_by_day(&in_range),
            projects: aggregate_by_project(&in_range),
            pay_types: aggregate_by_pay_type(&in_range),
            weeks,
            trends,
            cycles,
        }
    }
}

/// Daily totals of the dated entries with a payout whose day starts within the last
/// [`DAILY_TREND_DAYS`] days of `now`, oldest first.
fn daily_trend(entries: &[Entry], now: NaiveDateTime) -> Vec<DayBucket> {
    let cutoff = now - Duration::days(DAILY_TREND_DAYS);
    let recent: Vec<Entry> = entries
        .iter()
        .filter(|e| e.payout().is_some())
        .filter(|e| e.date().is_some_and(|d| d.and_time(NaiveTime::MIN) >= cutoff))
        .cloned()
        .collect();
    let mut days = aggregate_by_day(&recent);
    days.reverse();
    days
}

fn summarize(
    all: &[Entry],
    in_range: &[Entry],
    weeks: &[WeekBucket],
    goal: GoalHours,
    now: NaiveDateTime,
) -> Summary {
    let seconds = in_range
        .iter()
        .fold(0i64, |acc, e| acc.saturating_add(e.seconds()));
    let total_hours = seconds as f64 / 3600.0;
    let total_earnings: Amount = in_range.iter().map(Entry::earnings).sum();
    let avg_hourly_rate = hourly_rate(total_earnings, total_hours);

    let (avg_weekly_hours, avg_weekly_earnings) = if weeks.is_empty() {
        (0.0, Amount::ZERO)
    } else {
        let hours: f64 = weeks.iter().map(|w| w.total_hours()).sum();
        let earnings: Amount = weeks.iter().map(|w| w.total_earnings()).sum();
        let n = weeks.len();
        (
            hours / n as f64,
            Amount::new(earnings.value() / Decimal::from(n)),
        )
    };

    let year = now.year();
    let year_to_date_earnings: Amount = all
        .iter()
        .filter(|e| e.date().is_some_and(|d| d.year() == year && d <= now.date()))
        .map(Entry::earnings)
        .sum();

    Summary {
        total_hours,
        total_earnings,
        total_earnings_all_time: all.iter().map(Entry::earnings).sum(),
        total_entries: all.len(),
        entries_in_range: in_range.len(),
        avg_weekly_hours,
        avg_weekly_earnings,
        avg_hourly_rate,
        weekly_earnings_target: goal.get() * avg_hourly_rate,
        year_to_date_earnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::aggregate_by_week;
    use crate::test::{entry, entry_with};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn entries() -> Vec<Entry> {
        vec![
            entry_with("1", "2024-12-31", "10h", "$200", "Alpha", "hourly"),
            entry_with("2", "2025-01-07", "20h", "$400", "Alpha", "hourly"),
            entry_with("3", "2025-01-14", "30h", "$600", "Beta", "bonus"),
            entry_with("4", "2025-01-21", "40h", "$800", "Beta", "hourly"),
            entry("5", "", "5h", "$100"),
        ]
    }

    fn build(range: TimeRange, now: NaiveDateTime) -> Report {
        let entries = entries();
        let weeks = aggregate_by_week(&entries);
        Report::build(&entries, &weeks, range, GoalHours::default(), now)
    }

    #[test]
    fn test_report_all() {
        let report = build(TimeRange::All, at(2025, 1, 22));
        let s = &report.summary;
        assert_eq!(s.total_entries, 5);
        assert_eq!(s.entries_in_range, 5);
        assert_eq!(s.total_hours, 105.0);
        assert_eq!(s.total_earnings.value(), Decimal::from(2100));
        assert_eq!(s.total_earnings_all_time.value(), Decimal::from(2100));
        assert_eq!(s.avg_hourly_rate, 20.0);
        assert_eq!(s.weekly_earnings_target, 600.0);
        assert_eq!(s.avg_weekly_hours, 25.0);
        assert_eq!(s.avg_weekly_earnings.value(), Decimal::from(500));
        // The undated entry does not count toward the year
        assert_eq!(s.year_to_date_earnings.value(), Decimal::from(1800));

        assert_eq!(report.weeks.len(), 4);
        assert_eq!(report.days.len(), 4);
        assert_eq!(report.trends.len(), 4);
        assert_eq!(report.trends[0].week, at(2024, 12, 31).date());
        assert_eq!(report.trends[0].surplus, -20.0);
        assert_eq!(report.trends[3].surplus, 10.0);
        assert_eq!(report.projects[0].name, "Beta");
        assert_eq!(report.pay_types.len(), 2);

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].week_count, 3);
        assert_eq!(report.cycles[0].total_hours, 90.0);
        assert!(report.cycles[0].is_active);
        let cycle_weeks: Vec<NaiveDate> =
            report.cycles[0].weeks.iter().map(|w| w.start()).collect();
        assert_eq!(
            cycle_weeks,
            vec![
                at(2025, 1, 7).date(),
                at(2025, 1, 14).date(),
                at(2025, 1, 21).date()
            ]
        );
    }

    #[test]
    fn test_daily_trend() {
        let entries = vec![
            entry("1", "2025-01-01", "1h", "$10"),
            entry("2", "2025-01-02", "2h", "$20"),
            entry("3", "2025-01-20", "3h", ""),
            entry("4", "2025-01-25", "4h", "$40"),
            entry("5", "2025-01-25", "1h", "$5"),
            entry("6", "2025-01-30", "5h", "$50"),
            entry("7", "", "6h", "$60"),
        ];
        let weeks = aggregate_by_week(&entries);
        // The cutoff is 2025-01-01 12:00, so the first day starts too early
        let now = at(2025, 1, 31) + Duration::hours(12);
        let report = Report::build(
            &entries,
            &weeks,
            TimeRange::OneMonth,
            GoalHours::default(),
            now,
        );

        let days: Vec<(NaiveDate, f64)> = report
            .daily_trend
            .iter()
            .map(|d| (d.start(), d.total_hours()))
            .collect();
        assert_eq!(
            days,
            vec![
                (at(2025, 1, 2).date(), 2.0),
                (at(2025, 1, 25).date(), 5.0),
                (at(2025, 1, 30).date(), 5.0),
            ]
        );
        assert_eq!(
            report.daily_trend[1].total_earnings().value(),
            Decimal::from(45)
        );
    }

    #[test]
    fn test_report_ranged() {
        // One month back from Feb 10 is Jan 10: the week of Jan 7 ends Jan 13 and is kept
        let report = build(TimeRange::OneMonth, at(2025, 2, 10));
        assert_eq!(report.weeks.len(), 3);
        assert_eq!(report.summary.entries_in_range, 2);
        assert_eq!(report.summary.total_hours, 70.0);
        assert_eq!(report.summary.total_earnings.value(), Decimal::from(1400));
        assert_eq!(
            report.summary.total_earnings_all_time.value(),
            Decimal::from(2100)
        );
        assert_eq!(report.days.len(), 2);
        assert_eq!(report.cycles.len(), 1);
        assert!(report.cycles[0].has_ended);
    }

    #[test]
    fn test_report_empty() {
        let report = Report::build(
            &[],
            &[],
            TimeRange::default(),
            GoalHours::default(),
            at(2025, 1, 1),
        );
        assert_eq!(report.summary.avg_weekly_hours, 0.0);
        assert!(report.summary.avg_weekly_earnings.is_zero());
        assert_eq!(report.summary.avg_hourly_rate, 0.0);
        assert!(report.weeks.is_empty());
        assert!(report.cycles.is_empty());
    }
}

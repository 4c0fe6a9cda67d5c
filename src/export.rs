//! Renders weekly buckets as CSV text for download.

use crate::model::{GoalHours, WeekBucket};
use chrono::NaiveDate;

const HEADERS: [&str; 9] = [
    "Week Start",
    "Week End",
    "Total Hours",
    "Hours Remaining/Extra",
    "Total Earnings",
    "Average Hourly Rate",
    "Entry Count",
    "Projects",
    "Pay Types",
];

/// The file name an export produced on `date` is saved under.
pub fn export_filename(date: NaiveDate) -> String {
    format!("weekly_earnings_report_{}.csv", date.format("%Y-%m-%d"))
}

/// Serializes `weeks`, in the order given, as CSV text with a header row.
///
/// Numbers have two decimal places. The remaining/extra column is `hours - goal` and carries a
/// leading `+` when the goal was met. The projects and pay types columns are always quoted, with
/// embedded quotes doubled.
pub fn serialize_weekly_csv(weeks: &[WeekBucket], goal: GoalHours) -> String {
    let mut lines = Vec::with_capacity(weeks.len() + 1);
    lines.push(HEADERS.join(","));
    for week in weeks {
        lines.push(week_row(week, goal).join(","));
    }
    lines.join("\n")
}

fn week_row(week: &WeekBucket, goal: GoalHours) -> Vec<String> {
    let remaining = week.total_hours() - goal.get();
    let remaining = if week.total_hours() >= goal.get() {
        format!("+{remaining:.2}")
    } else {
        format!("{remaining:.2}")
    };
    let projects = week
        .projects()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    let pay_types = week
        .pay_type_counts()
        .iter()
        .map(|(pay_type, count)| format!("{pay_type}:{count}"))
        .collect::<Vec<_>>()
        .join("; ");

    vec![
        week.start().format("%Y-%m-%d").to_string(),
        week.end().format("%Y-%m-%d").to_string(),
        format!("{:.2}", week.total_hours()),
        remaining,
        format!("{:.2}", week.total_earnings().round_cents()),
        format!("{:.2}", week.avg_hourly_rate()),
        week.entry_count().to_string(),
        quote(&projects),
        quote(&pay_types),
    ]
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::aggregate_by_week;
    use crate::records::read_records;
    use crate::test::entry_with;

    fn weeks() -> Vec<WeekBucket> {
        aggregate_by_week(&[
            entry_with("1", "2025-01-06", "1h 30m", "$30.00", "Alpha", "hourly"),
            entry_with("2", "2025-01-07", "20h", "$400.00", "Beta", "hourly"),
            entry_with("3", "2025-01-09", "10h 20m", "$210.10", "The \"Big\" One", "bonus"),
            entry_with("4", "2025-01-13", "1h", "$20.00", "Alpha", "hourly"),
        ])
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(export_filename(date), "weekly_earnings_report_2025-03-04.csv");
    }

    #[test]
    fn test_serialize_weekly_csv() {
        let csv = serialize_weekly_csv(&weeks(), GoalHours::default());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Week Start,Week End,Total Hours,Hours Remaining/Extra,Total Earnings,\
             Average Hourly Rate,Entry Count,Projects,Pay Types"
        );
        assert_eq!(
            lines[1],
            "2025-01-07,2025-01-13,31.33,+1.33,630.10,20.11,3,\
             \"Alpha; Beta; The \"\"Big\"\" One\",\"bonus:1; hourly:2\""
        );
        assert_eq!(
            lines[2],
            "2024-12-31,2025-01-06,1.50,-28.50,30.00,20.00,1,\"Alpha\",\"hourly:1\""
        );
    }

    #[test]
    fn test_goal_exactly_met_is_extra() {
        let weeks = aggregate_by_week(&[entry_with("1", "2025-01-07", "30h", "$1", "", "")]);
        let csv = serialize_weekly_csv(&weeks, GoalHours::default());
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",+0.00,"), "{row}");
        assert!(row.ends_with(",\"\",\"\""), "{row}");
    }

    #[test]
    fn test_empty_export_has_only_headers() {
        let csv = serialize_weekly_csv(&[], GoalHours::default());
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_round_trip_preserves_totals() {
        let weeks = weeks();
        let csv = serialize_weekly_csv(&weeks, GoalHours::default());
        let batch = read_records(&csv).unwrap();
        assert_eq!(batch.skipped_rows(), 0);
        assert_eq!(batch.records().len(), weeks.len());

        let value = |record: &[(String, Option<String>)], name: &str| -> String {
            record
                .iter()
                .find(|(h, _)| h == name)
                .and_then(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        for (week, record) in weeks.iter().zip(batch.records()) {
            let hours: f64 = value(record, "Total Hours").parse().unwrap();
            let earnings: f64 = value(record, "Total Earnings").parse().unwrap();
            assert!((hours - week.total_hours()).abs() < 0.005);
            assert!((earnings - week.total_earnings().to_f64()).abs() < 0.005);
            assert_eq!(value(record, "Week Start"), week.start().to_string());
        }
        assert_eq!(
            value(&batch.records()[0], "Projects"),
            "Alpha; Beta; The \"Big\" One"
        );
    }
}

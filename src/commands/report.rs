use crate::args::ReportArgs;
use crate::commands::{load_tracker, resolve, Out};
use crate::model::Bucket;
use crate::page::Page;
use crate::report::{Report, DAILY_TREND_DAYS};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A report together with the page of the weekly and daily tables that is shown as text.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    #[serde(flatten)]
    report: Report,
    page: Page,
}

impl ReportView {
    pub fn new(report: Report, page: Page) -> Self {
        Self { report, page }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn page(&self) -> Page {
        self.page
    }
}

/// Loads the initial data and the given files, then builds a report for the selected range and
/// goal as of now in the configured zone.
pub async fn report(config: Config, args: &ReportArgs) -> Result<Out<ReportView>> {
    let (range, goal) = resolve(&config, args.selection())?;
    let page = Page::new(args.page(), args.page_size().unwrap_or(config.page_size()))?;
    let tracker = load_tracker(&config, args.selection()).await?;
    let report = tracker.report(range, goal, config.zone().now()).await;
    let message = format!(
        "{} entries in range {range} out of {} in total",
        report.summary.entries_in_range, report.summary.total_entries
    );
    Ok(Out::new(message, ReportView::new(report, page)))
}

impl Display for ReportView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let r = &self.report;
        let s = &r.summary;
        writeln!(
            f,
            "Range {}, goal {}h per week, as of {}",
            r.range,
            r.goal_hours.get(),
            r.generated_at.format("%Y-%m-%d %H:%M")
        )?;

        writeln!(f, "\nSummary")?;
        writeln!(f, "  Total hours           {:.1}", s.total_hours)?;
        writeln!(f, "  Total earnings        {}", s.total_earnings)?;
        writeln!(f, "  All-time earnings     {}", s.total_earnings_all_time)?;
        writeln!(
            f,
            "  Entries               {} ({} in range)",
            s.total_entries, s.entries_in_range
        )?;
        writeln!(f, "  Avg weekly hours      {:.1}", s.avg_weekly_hours)?;
        writeln!(f, "  Avg weekly earnings   {}", s.avg_weekly_earnings)?;
        writeln!(f, "  Avg hourly rate       ${:.2}/hr", s.avg_hourly_rate)?;
        writeln!(f, "  Weekly target         ${:.2}", s.weekly_earnings_target)?;
        writeln!(f, "  Year to date          {}", s.year_to_date_earnings)?;

        if !r.cycles.is_empty() {
            writeln!(f, "\n4-week cycles")?;
            for c in &r.cycles {
                let status = if c.is_active { "active" } else { "ended" };
                writeln!(
                    f,
                    "  #{:<3} {} - {}  {:.1}h / {}h  {:>3.0}%  {} of 4 weeks  {}  {}",
                    c.cycle_number,
                    c.start_week,
                    c.end_week,
                    c.total_hours,
                    c.target_hours,
                    c.progress_percentage,
                    c.week_count,
                    status,
                    c.total_earnings
                )?;
                let starts = c
                    .weeks
                    .iter()
                    .map(|w| w.start().format("%m/%d").to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "       weeks of {starts}")?;
            }
        }

        if !r.daily_trend.is_empty() {
            writeln!(f, "\nLast {DAILY_TREND_DAYS} days")?;
            for d in &r.daily_trend {
                writeln!(
                    f,
                    "  {}  {:>6.1}h  {:>12}",
                    d.start(),
                    d.total_hours(),
                    d.total_earnings()
                )?;
            }
        }

        let goal = r.goal_hours.get();
        write_buckets(f, "Weekly", &r.weeks, self.page, Some(goal))?;
        write_buckets(f, "Daily", &r.days, self.page, None)?;

        if !r.projects.is_empty() {
            writeln!(f, "\nTop projects")?;
            for p in &r.projects {
                writeln!(
                    f,
                    "  {:<30} {:>12}  {:.1}h  {} entries",
                    p.name, p.earnings, p.hours, p.entries
                )?;
            }
        }

        if !r.pay_types.is_empty() {
            writeln!(f, "\nPay types")?;
            for p in &r.pay_types {
                writeln!(f, "  {:<30} {:>12}  {} entries", p.name, p.earnings, p.count)?;
            }
        }
        Ok(())
    }
}

fn write_buckets(
    f: &mut Formatter<'_>,
    title: &str,
    buckets: &[Bucket],
    page: Page,
    goal: Option<f64>,
) -> std::fmt::Result {
    if buckets.is_empty() {
        return Ok(());
    }
    let shown = page.page().min(page.page_count(buckets.len()));
    writeln!(
        f,
        "\n{title} (page {shown} of {})",
        page.page_count(buckets.len())
    )?;
    for b in page.slice(buckets) {
        let when = if b.start() == b.end() {
            b.start().to_string()
        } else {
            format!("{} - {}", b.start(), b.end())
        };
        let versus_goal = match goal {
            Some(goal) => {
                let diff = b.total_hours() - goal;
                let sign = if diff >= 0.0 { "+" } else { "" };
                format!("  {sign}{diff:.1}h")
            }
            None => String::new(),
        };
        let pay_types = b
            .pay_type_counts()
            .iter()
            .map(|(t, n)| format!("{t}:{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            f,
            "  {when:<23} {:>6.1}h{versus_goal}  {:>12}  ${:.2}/hr  {} entries  [{}]  [{}]",
            b.total_hours(),
            b.total_earnings(),
            b.avg_hourly_rate(),
            b.entry_count(),
            b.projects().iter().cloned().collect::<Vec<_>>().join(", "),
            pay_types
        )?;
    }
    Ok(())
}

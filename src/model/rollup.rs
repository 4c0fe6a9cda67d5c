//! Per-period and per-dimension totals over a flat list of entries.
//!
//! Every function here is pure and recomputes from scratch. Hours are accumulated as whole
//! seconds and earnings as exact decimals, so the result does not depend on the order of the
//! input.

use crate::model::calendar::{week_end_of, week_start_of};
use crate::model::{Amount, Entry};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// How many projects [`aggregate_by_project`] keeps.
pub const TOP_PROJECTS: usize = 8;

/// Totals for one period of time. Weekly buckets start on a Tuesday and end on the following
/// Monday; daily buckets start and end on the same day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    start: NaiveDate,
    end: NaiveDate,
    total_hours: f64,
    total_earnings: Amount,
    entry_count: usize,
    projects: BTreeSet<String>,
    pay_type_counts: BTreeMap<String, usize>,
    avg_hourly_rate: f64,
}

pub type WeekBucket = Bucket;
pub type DayBucket = Bucket;

impl Bucket {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn total_earnings(&self) -> Amount {
        self.total_earnings
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn projects(&self) -> &BTreeSet<String> {
        &self.projects
    }

    pub fn pay_type_counts(&self) -> &BTreeMap<String, usize> {
        &self.pay_type_counts
    }

    /// Earnings per hour, exactly zero when no hours were logged.
    pub fn avg_hourly_rate(&self) -> f64 {
        self.avg_hourly_rate
    }
}

#[derive(Default)]
struct Tally {
    seconds: i64,
    earnings: Amount,
    entry_count: usize,
    projects: BTreeSet<String>,
    pay_type_counts: BTreeMap<String, usize>,
}

impl Tally {
    fn add(&mut self, entry: &Entry) {
        self.seconds = self.seconds.saturating_add(entry.seconds());
        self.earnings += entry.earnings();
        self.entry_count += 1;
        if let Some(project) = entry.project_name() {
            self.projects.insert(project.to_string());
        }
        if let Some(pay_type) = entry.pay_type() {
            *self.pay_type_counts.entry(pay_type.to_string()).or_default() += 1;
        }
    }

    fn finish(self, start: NaiveDate, end: NaiveDate) -> Bucket {
        let total_hours = self.seconds as f64 / 3600.0;
        Bucket {
            start,
            end,
            total_hours,
            total_earnings: self.earnings,
            entry_count: self.entry_count,
            projects: self.projects,
            pay_type_counts: self.pay_type_counts,
            avg_hourly_rate: hourly_rate(self.earnings, total_hours),
        }
    }
}

/// `earnings / hours`, or exactly zero when `hours` is not positive.
pub fn hourly_rate(earnings: Amount, hours: f64) -> f64 {
    if hours > 0.0 {
        earnings.to_f64() / hours
    } else {
        0.0
    }
}

fn aggregate(
    entries: &[Entry],
    key: impl Fn(NaiveDate) -> NaiveDate,
    end: impl Fn(NaiveDate) -> NaiveDate,
) -> Vec<Bucket> {
    let mut tallies: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for entry in entries {
        let Some(date) = entry.date() else {
            debug!(
                "Leaving undated entry {} out of the buckets",
                entry.identity_key()
            );
            continue;
        };
        tallies.entry(key(date)).or_default().add(entry);
    }
    // Most recent first
    tallies
        .into_iter()
        .rev()
        .map(|(start, tally)| tally.finish(start, end(start)))
        .collect()
}

/// Groups dated entries into Tuesday-aligned weeks, most recent week first.
pub fn aggregate_by_week(entries: &[Entry]) -> Vec<WeekBucket> {
    aggregate(entries, week_start_of, week_end_of)
}

/// Groups dated entries by calendar day, most recent day first.
pub fn aggregate_by_day(entries: &[Entry]) -> Vec<DayBucket> {
    aggregate(entries, |d| d, |d| d)
}

/// Earnings, hours and entry count for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRollup {
    pub name: String,
    pub earnings: Amount,
    pub hours: f64,
    pub entries: usize,
}

/// The top projects by earnings, highest first. Only entries that name a project and carry a
/// payout take part. Ties are broken by project name.
pub fn aggregate_by_project(entries: &[Entry]) -> Vec<ProjectRollup> {
    let mut by_name: BTreeMap<&str, (Amount, i64, usize)> = BTreeMap::new();
    for entry in entries {
        let (Some(project), Some(_)) = (entry.project_name(), entry.payout()) else {
            continue;
        };
        let slot = by_name.entry(project).or_default();
        slot.0 += entry.earnings();
        slot.1 = slot.1.saturating_add(entry.seconds());
        slot.2 += 1;
    }

    let mut rollups: Vec<ProjectRollup> = by_name
        .into_iter()
        .map(|(name, (earnings, seconds, count))| ProjectRollup {
            name: name.to_string(),
            earnings,
            hours: seconds as f64 / 3600.0,
            entries: count,
        })
        .collect();
    rollups.sort_by(|a, b| match b.earnings.cmp(&a.earnings) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
    rollups.truncate(TOP_PROJECTS);
    rollups
}

/// Earnings and entry count for one pay type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayTypeRollup {
    pub name: String,
    pub earnings: Amount,
    pub count: usize,
}

/// Earnings per pay type for entries that have both a pay type and a payout, in name order.
pub fn aggregate_by_pay_type(entries: &[Entry]) -> Vec<PayTypeRollup> {
    let mut by_type: BTreeMap<&str, (Amount, usize)> = BTreeMap::new();
    for entry in entries {
        let (Some(pay_type), Some(_)) = (entry.pay_type(), entry.payout()) else {
            continue;
        };
        let slot = by_type.entry(pay_type).or_default();
        slot.0 += entry.earnings();
        slot.1 += 1;
    }
    by_type
        .into_iter()
        .map(|(name, (earnings, count))| PayTypeRollup {
            name: name.to_string(),
            earnings,
            count,
        })
        .collect()
}

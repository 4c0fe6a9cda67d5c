//! Symbolic recency ranges and the cutoff filters built on them.

use crate::model::{Bucket, Entry};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How far back a view reaches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum TimeRange {
    #[serde(rename = "1m")]
    #[value(name = "1m")]
    OneMonth,
    #[default]
    #[serde(rename = "3m")]
    #[value(name = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    #[value(name = "6m")]
    SixMonths,
    #[serde(rename = "1Y")]
    #[value(name = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    #[value(name = "ALL")]
    All,
}

serde_plain::derive_display_from_serialize!(TimeRange);
serde_plain::derive_fromstr_from_deserialize!(TimeRange);

impl TimeRange {
    /// The earliest date included in the range when viewed on `today`. `All` yields the earliest
    /// representable date. Month arithmetic clamps to the end of shorter months, so a 1m view on
    /// March 31st starts on the last day of February.
    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        let months = match self {
            TimeRange::OneMonth => 1,
            TimeRange::ThreeMonths => 3,
            TimeRange::SixMonths => 6,
            TimeRange::OneYear => 12,
            TimeRange::All => return NaiveDate::MIN,
        };
        today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Keeps the entries dated on or after `since`. Undated entries only survive an unbounded cutoff
/// (`NaiveDate::MIN`), since there is nothing to compare.
pub fn filter_entries(entries: &[Entry], since: NaiveDate) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| match e.date() {
            Some(date) => date >= since,
            None => since == NaiveDate::MIN,
        })
        .cloned()
        .collect()
}

/// Keeps the buckets whose last day is on or after `since`.
pub fn filter_buckets(buckets: &[Bucket], since: NaiveDate) -> Vec<Bucket> {
    buckets
        .iter()
        .filter(|b| b.end() >= since)
        .cloned()
        .collect()
}

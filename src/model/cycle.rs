//! Four-week goal tracking cycles.
//!
//! The first observed week is assumed to be partial and is never part of a cycle. From the
//! second week on, consecutive weeks are grouped four at a time.

use crate::model::{Amount, WeekBucket};
use crate::Result;
use anyhow::ensure;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// The number of weeks in a complete cycle.
pub const CYCLE_WEEKS: usize = 4;

/// The default weekly hours goal.
pub const DEFAULT_GOAL_HOURS: f64 = 30.0;

/// A validated weekly hours goal: finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct GoalHours(f64);

impl GoalHours {
    pub fn new(hours: f64) -> Result<Self> {
        ensure!(
            hours.is_finite() && hours > 0.0,
            "The weekly hours goal must be a positive number, got {hours}"
        );
        Ok(Self(hours))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for GoalHours {
    fn default() -> Self {
        Self(DEFAULT_GOAL_HOURS)
    }
}

/// Progress of one cycle against the hours goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStats {
    pub cycle_number: usize,
    pub start_week: NaiveDate,
    pub end_week: NaiveDate,
    pub week_count: usize,
    pub total_hours: f64,
    pub total_earnings: Amount,
    pub target_hours: f64,
    pub hours_remaining: f64,
    pub progress_percentage: f64,
    pub is_complete: bool,
    pub is_active: bool,
    pub has_ended: bool,
    /// The weeks of the cycle, oldest first.
    pub weeks: Vec<WeekBucket>,
}

/// Groups `weeks` (oldest first) into cycles and measures each against `goal`, most recent cycle
/// first.
///
/// `now` decides whether a cycle is still active: a cycle is active while the midnight that
/// starts its last day has not passed yet. Because of that the result is only good for the
/// moment it was computed.
pub fn cycles(weeks: &[WeekBucket], goal: GoalHours, now: NaiveDateTime) -> Vec<CycleStats> {
    let mut out: Vec<CycleStats> = weeks
        .iter()
        .skip(1)
        .collect::<Vec<_>>()
        .chunks(CYCLE_WEEKS)
        .enumerate()
        .map(|(ix, chunk)| cycle(ix + 1, chunk, goal, now))
        .collect();
    out.reverse();
    out
}

fn cycle(
    cycle_number: usize,
    chunk: &[&WeekBucket],
    goal: GoalHours,
    now: NaiveDateTime,
) -> CycleStats {
    let week_count = chunk.len();
    let total_hours: f64 = chunk.iter().map(|w| w.total_hours()).sum();
    let total_earnings: Amount = chunk.iter().map(|w| w.total_earnings()).sum();
    let target_hours = week_count as f64 * goal.get();
    let progress_percentage = (total_hours / target_hours * 100.0).clamp(0.0, 100.0);

    // Chunks are never empty, the fallbacks only satisfy the type checker
    let start_week = chunk.first().map(|w| w.start()).unwrap_or_default();
    let end_week = chunk.last().map(|w| w.end()).unwrap_or_default();
    let end_moment = end_week.and_time(NaiveTime::MIN);

    CycleStats {
        cycle_number,
        start_week,
        end_week,
        week_count,
        total_hours,
        total_earnings,
        target_hours,
        hours_remaining: target_hours - total_hours,
        progress_percentage,
        is_complete: week_count == CYCLE_WEEKS,
        is_active: end_moment >= now,
        has_ended: end_moment < now,
        weeks: chunk.iter().map(|w| (*w).clone()).collect(),
    }
}

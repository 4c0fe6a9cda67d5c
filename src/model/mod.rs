//! Types that represent the core data model, such as `Entry` and `WeekBucket`, and the pure
//! functions that derive buckets, rollups and cycles from a collection of entries.
mod amount;
mod calendar;
mod cycle;
mod entry;
mod fields;
mod range;
mod rollup;

pub use amount::{parse_currency, Amount};
pub use calendar::{week_end_of, week_start_of, Zone, WEEK_SPAN_DAYS};
pub use cycle::{cycles, CycleStats, GoalHours, CYCLE_WEEKS, DEFAULT_GOAL_HOURS};
pub use entry::{Entry, EntryColumn, IdentityKey, RawRecord};
pub use fields::{parse_calendar_date, parse_duration, parse_duration_seconds};
pub use range::{filter_buckets, filter_entries, TimeRange};
pub use rollup::{
    aggregate_by_day, aggregate_by_pay_type, aggregate_by_project, aggregate_by_week,
    hourly_rate, Bucket, DayBucket, PayTypeRollup, ProjectRollup, WeekBucket, TOP_PROJECTS,
};

pub(crate) use entry::{
    DURATION_STR, ITEM_ID_STR, PAYOUT_STR, PAY_TYPE_STR, PROJECT_NAME_STR, WORK_DATE_STR,
};

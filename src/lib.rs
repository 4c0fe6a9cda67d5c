//! Weekly hours and earnings statistics from freelance work-log CSV exports.
//!
//! The core is a pure aggregation engine in [`model`]: lenient field parsing, Tuesday-aligned
//! week and day buckets, project and pay type rollups, and four-week goal cycles. Around it,
//! [`records`] reads CSV text, [`ingest`] merges entries without duplicates, [`Tracker`] owns the
//! collection, and [`export`] writes the weekly totals back out as CSV.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod page;
pub mod records;
pub mod report;
mod tracker;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use tracker::{SharedTracker, Tracker, UploadReport};

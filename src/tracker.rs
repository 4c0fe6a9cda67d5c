//! The owner of the entry collection.
//!
//! `Tracker` holds the entries and the weekly buckets derived from them. Every upload re-derives
//! the buckets from scratch. `SharedTracker` makes read-merge-recompute a single critical section
//! so two uploads can never both check for duplicates against the same stale collection.

use crate::ingest::{ingest, IngestReport};
use crate::model::{aggregate_by_week, Entry, GoalHours, TimeRange, WeekBucket};
use crate::records::parse_entries;
use crate::report::Report;
use crate::{utils, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The outcome of one upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub added_count: usize,
    pub duplicate_count: usize,
    pub skipped_rows: usize,
}

impl UploadReport {
    fn new(ingest: IngestReport, skipped_rows: usize) -> Self {
        Self {
            added_count: ingest.added_count,
            duplicate_count: ingest.duplicate_count,
            skipped_rows,
        }
    }

    pub fn message(&self) -> String {
        IngestReport {
            added_count: self.added_count,
            duplicate_count: self.duplicate_count,
        }
        .message()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    entries: Vec<Entry>,
    weeks: Vec<WeekBucket>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order they were admitted.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Weekly buckets of the whole collection, most recent first.
    pub fn weeks(&self) -> &[WeekBucket] {
        &self.weeks
    }

    /// Parses `text` as a work-log CSV and merges its entries.
    ///
    /// # Errors
    /// - When the text has no header row. The collection is left unchanged.
    pub fn upload(&mut self, text: &str) -> Result<UploadReport> {
        let parsed = parse_entries(text)?;
        let skipped_rows = parsed.skipped_rows();
        if skipped_rows > 0 {
            debug!("Skipped {skipped_rows} CSV rows");
        }
        let report = self.admit(parsed.into_entries());
        Ok(UploadReport::new(report, skipped_rows))
    }

    /// Merges already parsed entries, dropping duplicates, and recomputes the weekly buckets.
    pub fn admit(&mut self, incoming: Vec<Entry>) -> IngestReport {
        let existing = std::mem::take(&mut self.entries);
        let ingested = ingest(existing, incoming);
        self.entries = ingested.merged;
        self.weeks = aggregate_by_week(&self.entries);
        ingested.report
    }

    /// A snapshot of everything derived from the collection. `now` is the moment the report is
    /// for, in the configured zone.
    pub fn report(&self, range: TimeRange, goal: GoalHours, now: NaiveDateTime) -> Report {
        Report::build(&self.entries, &self.weeks, range, goal, now)
    }
}

/// A `Tracker` that can be shared between tasks. Cloning shares the same collection.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<Tracker>>,
}

impl SharedTracker {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Uploads CSV text. The merge and the recomputation happen under the lock.
    pub async fn upload(&self, text: &str) -> Result<UploadReport> {
        let report = self.inner.lock().await.upload(text)?;
        info!("{}", report.message());
        Ok(report)
    }

    /// Reads the CSV file at `path` and uploads it. The file is read before the lock is taken.
    ///
    /// # Errors
    /// - When the file cannot be read or has no header row. No entries are admitted.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadReport> {
        let text = utils::read(path).await?;
        self.upload(&text).await
    }

    /// Loads the initial data file if there is one. A missing file is not an error and yields
    /// `None`.
    pub async fn load_initial(&self, path: &Path) -> Result<Option<UploadReport>> {
        if !utils::exists(path).await {
            info!(
                "No initial data found at '{}', upload a CSV file to get started",
                path.display()
            );
            return Ok(None);
        }
        self.upload_file(path).await.map(Some)
    }

    pub async fn report(&self, range: TimeRange, goal: GoalHours, now: NaiveDateTime) -> Report {
        self.inner.lock().await.report(range, goal, now)
    }

    /// A copy of the weekly buckets, most recent first.
    pub async fn weeks(&self) -> Vec<WeekBucket> {
        self.inner.lock().await.weeks().to_vec()
    }

    pub async fn entry_count(&self) -> usize {
        self.inner.lock().await.entries().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::SAMPLE_CSV;
    use tempfile::TempDir;

    #[test]
    fn test_upload_recomputes_weeks() {
        let mut tracker = Tracker::new();
        let report = tracker.upload(SAMPLE_CSV).unwrap();
        assert_eq!(report.added_count, 4);
        assert_eq!(report.duplicate_count, 0);
        assert_eq!(tracker.weeks().len(), 2);
        assert_eq!(tracker.weeks()[0].entry_count(), 3);

        let again = tracker.upload(SAMPLE_CSV).unwrap();
        assert_eq!(again.added_count, 0);
        assert_eq!(again.duplicate_count, 4);
        assert_eq!(
            again.message(),
            "Added 0 new entries (4 duplicates skipped)"
        );
        assert_eq!(tracker.entries().len(), 4);
    }

    #[test]
    fn test_failed_upload_leaves_collection_unchanged() {
        let mut tracker = Tracker::new();
        tracker.upload(SAMPLE_CSV).unwrap();
        let before = tracker.entries().to_vec();
        assert!(tracker.upload("").is_err());
        assert_eq!(tracker.entries(), before.as_slice());
    }

    #[tokio::test]
    async fn test_concurrent_uploads_do_not_duplicate() {
        let shared = SharedTracker::default();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let shared = shared.clone();
            handles.push(tokio::spawn(
                async move { shared.upload(SAMPLE_CSV).await },
            ));
        }
        let mut added = 0;
        for handle in handles {
            added += handle.await.unwrap().unwrap().added_count;
        }
        assert_eq!(added, 4);
        assert_eq!(shared.entry_count().await, 4);
        assert_eq!(shared.weeks().await.len(), 2);
    }

    #[tokio::test]
    async fn test_load_initial() {
        let dir = TempDir::new().unwrap();
        let shared = SharedTracker::default();

        let missing = dir.path().join("nothing_here.csv");
        assert!(shared.load_initial(&missing).await.unwrap().is_none());

        let path = dir.path().join("Earnings_Report.csv");
        tokio::fs::write(&path, SAMPLE_CSV).await.unwrap();
        let report = shared.load_initial(&path).await.unwrap().unwrap();
        assert_eq!(report.added_count, 4);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let shared = SharedTracker::default();
        let err = shared
            .upload_file(&dir.path().join("missing.csv"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.csv"));
        assert_eq!(shared.entry_count().await, 0);
    }
}

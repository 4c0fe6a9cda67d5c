//! Merges newly parsed entries into an existing collection without admitting duplicates.

use crate::model::{Entry, IdentityKey};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// The counts from one ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub added_count: usize,
    pub duplicate_count: usize,
}

impl IngestReport {
    /// A human readable summary of the ingestion.
    pub fn message(&self) -> String {
        format!(
            "Added {} new entries ({} duplicates skipped)",
            self.added_count, self.duplicate_count
        )
    }
}

/// The merged collection along with the counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingested {
    pub merged: Vec<Entry>,
    pub report: IngestReport,
}

/// Appends the entries of `incoming` to `existing`, dropping any entry whose identity key is already
/// present, either in `existing` or earlier in `incoming`. Entries with neither an item id nor a
/// work date are dropped too and counted as duplicates.
///
/// The existing entries are neither reordered nor changed, and admitted entries keep their relative
/// order.
pub fn ingest(existing: Vec<Entry>, incoming: Vec<Entry>) -> Ingested {
    let mut seen: HashSet<IdentityKey> = existing.iter().map(Entry::identity_key).collect();
    let mut merged = existing;
    let mut report = IngestReport::default();

    for entry in incoming {
        let key = entry.identity_key();
        if key.is_empty() {
            trace!("Dropping an entry with neither an item id nor a work date");
            report.duplicate_count += 1;
            continue;
        }
        if !seen.insert(key) {
            trace!("Dropping duplicate entry {}", entry.identity_key());
            report.duplicate_count += 1;
            continue;
        }
        merged.push(entry);
        report.added_count += 1;
    }

    debug!("{}", report.message());
    Ingested { merged, report }
}

//! Shared test utilities for building entries and work-log CSV text.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{
    Entry, DURATION_STR, ITEM_ID_STR, PAYOUT_STR, PAY_TYPE_STR, PROJECT_NAME_STR, WORK_DATE_STR,
};
use crate::Config;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small work-log export. Three rows land in the week of Tuesday 2025-01-07, one in the week of
/// Tuesday 2024-12-31, and the `notes` column is passed through.
pub const SAMPLE_CSV: &str = "\
itemID,workDate,duration,payout,projectName,payType,notes
1,2025-01-06,1h 30m,$30.00,Alpha,hourly,
2,2025-01-07,2h,$50.00,Beta,hourly,\"long, with a comma\"
3,2025-01-09,30m,$10.00,Alpha,bonus,
4,2025-01-13,1h,$20.00,Alpha,hourly,
";

/// Builds an entry from its four identifying fields. Empty strings are missing values.
pub fn entry(item_id: &str, work_date: &str, duration: &str, payout: &str) -> Entry {
    entry_with(item_id, work_date, duration, payout, "", "")
}

/// Builds an entry from all six semantic fields. Empty strings are missing values.
pub fn entry_with(
    item_id: &str,
    work_date: &str,
    duration: &str,
    payout: &str,
    project_name: &str,
    pay_type: &str,
) -> Entry {
    let mut entry = Entry::default();
    for (header, value) in [
        (ITEM_ID_STR, item_id),
        (WORK_DATE_STR, work_date),
        (DURATION_STR, duration),
        (PAYOUT_STR, payout),
        (PROJECT_NAME_STR, project_name),
        (PAY_TYPE_STR, pay_type),
    ] {
        entry.set_with_header(header, Some(value.to_string()));
    }
    entry
}

/// Test environment with an initialized earnings home directory. Holds the TempDir to keep the
/// directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("earnings");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Writes `content` to `name` inside the home directory and returns the path.
    pub async fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.config.root().join(name);
        tokio::fs::write(&path, content).await.unwrap();
        path
    }
}

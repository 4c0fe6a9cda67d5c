//! Command handlers for the earnings CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod export;
mod init;
mod report;

use crate::args::Selection;
use crate::model::{GoalHours, TimeRange};
use crate::tracker::SharedTracker;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::{Debug, Display};
use tracing::{debug, info};

pub use export::{export, ExportOutput};
pub use init::init;
pub use report::{report, ReportView};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }

    /// Print the message to `info!` and the structured data (if it exists) as pretty JSON to
    /// stdout.
    pub fn print_json(&self) -> Result<()> {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            println!("{}", serde_json::to_string_pretty(structure)?);
        }
        Ok(())
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug + Display,
{
    /// Print the message to `info!` and the structured data (if it exists) as text to stdout.
    pub fn print_table(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            println!("{structure}");
        }
    }
}

/// The range and goal for a command: the command line wins over the config file.
fn resolve(config: &Config, selection: &Selection) -> Result<(TimeRange, GoalHours)> {
    let range = selection.range().unwrap_or(config.default_range());
    let goal = match selection.goal() {
        Some(hours) => GoalHours::new(hours)?,
        None => config.goal(),
    };
    Ok((range, goal))
}

/// Loads the configured initial data followed by every file in `selection`, in order.
async fn load_tracker(config: &Config, selection: &Selection) -> Result<SharedTracker> {
    let tracker = SharedTracker::default();
    tracker.load_initial(&config.initial_data_path()).await?;
    for file in selection.files() {
        tracker.upload_file(file).await?;
    }
    Ok(tracker)
}

//! These structs provide the CLI interface for the earnings CLI.

use crate::model::TimeRange;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// earnings: Weekly hours and earnings reports from freelance work-log exports.
///
/// Give it one or more CSV exports of your work log (columns itemID, workDate, duration, payout,
/// projectName, payType) and it groups the entries into weeks that run Tuesday through Monday,
/// tracks your progress against a weekly hours goal in four-week cycles, and can export the weekly
/// totals as CSV.
///
/// Entries that appear in more than one file (same itemID and workDate) are only counted once.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the earnings home directory and write a default config.json.
    ///
    /// Running this is optional, without a config file the defaults are used. Put your main work
    /// log export in the home directory as Earnings_Report.csv to have it loaded every time.
    Init,
    /// Show summary, weekly, daily, project, pay type and cycle statistics.
    Report(ReportArgs),
    /// Write the weekly totals to weekly_earnings_report_<date>.csv.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and the initial data file are held. Defaults to
    /// ~/earnings
    #[arg(long, env = "EARNINGS_HOME", default_value_t = default_earnings_home())]
    earnings_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, earnings_home: PathBuf) -> Self {
        Self {
            log_level,
            earnings_home: earnings_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn earnings_home(&self) -> &DisplayPath {
        &self.earnings_home
    }
}

/// Selection of entries and goal shared by `report` and `export`.
#[derive(Debug, Parser, Clone, Default)]
pub struct Selection {
    /// A work-log CSV file to add to the initial data. May be given more than once, files are
    /// added in order.
    #[arg(long = "file", short = 'f')]
    files: Vec<PathBuf>,

    /// How far back to look: 1m, 3m, 6m, 1Y or ALL. A report defaults to the config file's
    /// default_range, an export to ALL.
    #[arg(long, value_enum)]
    range: Option<TimeRange>,

    /// Weekly hours goal. Defaults to the config file's goal_hours_per_week.
    #[arg(long)]
    goal: Option<f64>,
}

impl Selection {
    pub fn new(files: Vec<PathBuf>, range: Option<TimeRange>, goal: Option<f64>) -> Self {
        Self { files, range, goal }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn range(&self) -> Option<TimeRange> {
        self.range
    }

    pub fn goal(&self) -> Option<f64> {
        self.goal
    }
}

/// How `report` prints its data.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// (Not shown): Args for the `earnings report` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ReportArgs {
    #[clap(flatten)]
    selection: Selection,

    /// The page of the weekly and daily tables to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page. Defaults to the config file's page_size.
    #[arg(long)]
    page_size: Option<usize>,

    /// Print a text table or the full report as JSON.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ReportArgs {
    pub fn new(
        selection: Selection,
        page: usize,
        page_size: Option<usize>,
        format: OutputFormat,
    ) -> Self {
        Self {
            selection,
            page,
            page_size,
            format,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `earnings export` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    #[clap(flatten)]
    selection: Selection,

    /// Directory the CSV is written to. Defaults to the current directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(selection: Selection, out_dir: Option<PathBuf>) -> Self {
        Self { selection, out_dir }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }
}

fn default_earnings_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("earnings"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --earnings-home or EARNINGS_HOME instead of relying on the \
                default earnings home directory.",
            );
            PathBuf::from("earnings")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

//! Configuration file handling.
//!
//! The configuration file is stored at `$EARNINGS_HOME/config.json` and holds the weekly hours
//! goal, the default range and page size, the time zone offset used for "now", and the location of
//! the CSV that is loaded at start-up.

use crate::model::{GoalHours, TimeRange, Zone, DEFAULT_GOAL_HOURS};
use crate::page::DEFAULT_PAGE_SIZE;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "earnings";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const INITIAL_DATA_CSV: &str = "Earnings_Report.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EARNINGS_HOME` and from there it loads `$EARNINGS_HOME/config.json`, or falls back
/// to the defaults when there is no such file.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    goal: GoalHours,
    zone: Zone,
}

impl Config {
    /// Creates the home directory and writes a `config.json` with default settings.
    ///
    /// # Errors
    /// - When a config file already exists in `dir`.
    /// - When any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the earnings home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if utils::exists(&config_path).await {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;
        Self::from_parts(root, config_path, config_file)
    }

    /// Loads `$EARNINGS_HOME/config.json`. When the file does not exist the defaults are used.
    ///
    /// # Errors
    /// - When the file exists but cannot be read, parsed or validated.
    pub async fn load(earnings_home: impl Into<PathBuf>) -> Result<Self> {
        let root = earnings_home.into();
        let config_path = root.join(CONFIG_JSON);
        if !utils::exists(&config_path).await {
            debug!(
                "No config file at '{}', using default settings",
                config_path.display()
            );
            return Self::from_parts(root, config_path, ConfigFile::default());
        }
        let root = utils::canonicalize(&root).await?;
        let config_file = ConfigFile::load(&config_path).await?;
        Self::from_parts(root, config_path, config_file)
    }

    fn from_parts(root: PathBuf, config_path: PathBuf, config_file: ConfigFile) -> Result<Self> {
        let goal = GoalHours::new(config_file.goal_hours_per_week)
            .context("Invalid goal_hours_per_week in config file")?;
        ensure!(
            config_file.page_size > 0,
            "Invalid page_size in config file, it must be at least 1"
        );
        let zone = match config_file.utc_offset.as_deref() {
            Some(offset) => Zone::from_offset(offset)?,
            None => Zone::Local,
        };
        Ok(Self {
            root,
            config_path,
            config_file,
            goal,
            zone,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn goal(&self) -> GoalHours {
        self.goal
    }

    pub fn default_range(&self) -> TimeRange {
        self.config_file.default_range
    }

    pub fn page_size(&self) -> usize {
        self.config_file.page_size
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The CSV loaded at start-up. Relative paths are resolved against the home directory.
    pub fn initial_data_path(&self) -> PathBuf {
        let p = self.config_file.initial_data();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "earnings",
///   "config_version": 1,
///   "goal_hours_per_week": 30.0,
///   "default_range": "3m",
///   "page_size": 10,
///   "utc_offset": "+02:00",
///   "initial_data": "Earnings_Report.csv"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "earnings"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Weekly hours goal used for cycles, trends and exports
    #[serde(default = "default_goal")]
    goal_hours_per_week: f64,

    /// Range shown when none is given on the command line
    #[serde(default)]
    default_range: TimeRange,

    /// Rows per page in table output
    #[serde(default = "default_page_size")]
    page_size: usize,

    /// Fixed UTC offset such as "+02:00". Host local time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    utc_offset: Option<String>,

    /// CSV loaded at start-up (optional, relative to the home directory or absolute)
    /// Defaults to $EARNINGS_HOME/Earnings_Report.csv if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_data: Option<PathBuf>,
}

fn default_goal() -> f64 {
    DEFAULT_GOAL_HOURS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            goal_hours_per_week: DEFAULT_GOAL_HOURS,
            default_range: TimeRange::default(),
            page_size: DEFAULT_PAGE_SIZE,
            utc_offset: None,
            initial_data: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another application
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn initial_data(&self) -> PathBuf {
        self.initial_data
            .clone()
            .unwrap_or_else(|| PathBuf::from(INITIAL_DATA_CSV))
    }
}

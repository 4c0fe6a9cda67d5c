use crate::args::ExportArgs;
use crate::commands::{load_tracker, resolve, Out};
use crate::export::{export_filename, serialize_weekly_csv};
use crate::model::{filter_buckets, TimeRange};
use crate::{utils, Config, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where the export was written and how many weeks it holds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportOutput {
    pub path: PathBuf,
    pub weeks: usize,
}

/// Writes the weekly totals to `weekly_earnings_report_<today>.csv` in the output directory. Every
/// week is exported unless a range is given on the command line. When there are no weeks to
/// export nothing is written.
pub async fn export(config: Config, args: &ExportArgs) -> Result<Out<ExportOutput>> {
    let (_, goal) = resolve(&config, args.selection())?;
    let range = args.selection().range().unwrap_or(TimeRange::All);
    let tracker = load_tracker(&config, args.selection()).await?;
    let today = config.zone().today();
    let weeks = filter_buckets(&tracker.weeks().await, range.since(today));
    if weeks.is_empty() {
        return Ok("No weekly data to export, nothing was written".into());
    }

    let out_dir = args.out_dir().unwrap_or(Path::new("."));
    utils::make_dir(out_dir).await?;
    let path = out_dir.join(export_filename(today));
    utils::write(&path, serialize_weekly_csv(&weeks, goal)).await?;

    let message = format!("Exported {} weeks to '{}'", weeks.len(), path.display());
    Ok(Out::new(
        message,
        ExportOutput {
            path,
            weeks: weeks.len(),
        },
    ))
}

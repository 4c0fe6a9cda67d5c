//! Reads work-log CSV text into header/value records and then into entries.
//!
//! Quoting follows RFC 4180 through the `csv` crate: a doubled quote inside a quoted field is a
//! literal quote, and a comma inside quotes does not split the field. A quoted field never spans
//! more than one line.

use crate::model::{Entry, RawRecord};
use crate::Result;
use anyhow::{ensure, Context};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

/// The rows read from one CSV blob, before the identifying-field rule is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    headers: Vec<String>,
    records: Vec<RawRecord>,
    skipped_rows: usize,
}

impl RecordBatch {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }

    /// Rows that were dropped for having fewer fields than the header row, or no values at all.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

/// The entries found in one CSV blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    entries: Vec<Entry>,
    skipped_rows: usize,
}

impl ParseReport {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Rows dropped for structural reasons: short rows, empty rows and rows with none of the
    /// identifying fields.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

/// Reads `text` as CSV with a header row. Rows with fewer fields than the header and rows whose
/// fields are all empty are dropped and counted. Extra trailing fields are ignored.
///
/// Every physical line is read as its own record, so a quote that is never closed only affects
/// the line it is on. Empty lines are ignored.
///
/// # Errors
/// - When `text` has no header row at all.
pub fn read_records(text: &str) -> Result<RecordBatch> {
    let text = text.trim_start_matches('\u{feff}');
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty());

    let headers: Vec<String> = match lines.next() {
        Some((_, line)) => read_line(line)
            .context("Unable to read the CSV header row")?
            .map(|row| row.iter().map(str::to_string).collect())
            .unwrap_or_default(),
        None => Vec::new(),
    };
    ensure!(
        headers.iter().any(|h| !h.is_empty()),
        "The CSV text is empty, there is no header row"
    );

    let mut batch = RecordBatch {
        headers,
        ..RecordBatch::default()
    };
    for (ix, line) in lines {
        let row = match read_line(line) {
            Ok(Some(row)) => row,
            Ok(None) => continue,
            Err(e) => {
                debug!("Skipping unreadable CSV line {}: {e}", ix + 1);
                batch.skipped_rows += 1;
                continue;
            }
        };
        match to_record(&batch.headers, &row) {
            Some(record) => batch.records.push(record),
            None => {
                debug!("Skipping short or empty CSV line {}", ix + 1);
                batch.skipped_rows += 1;
            }
        }
    }
    Ok(batch)
}

/// Reads a single physical line as one CSV record.
fn read_line(line: &str) -> csv::Result<Option<StringRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());
    let mut row = StringRecord::new();
    let found = rdr.read_record(&mut row)?;
    Ok(found.then_some(row))
}

fn to_record(headers: &[String], row: &StringRecord) -> Option<RawRecord> {
    if row.len() < headers.len() || row.iter().all(str::is_empty) {
        return None;
    }
    Some(
        headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| {
                let value = (!value.is_empty()).then(|| value.to_string());
                (header.clone(), value)
            })
            .collect(),
    )
}

/// Reads `text` into entries, keeping only the rows that carry at least one identifying field
/// (work date, item id, duration or payout).
///
/// # Errors
/// - When `text` has no header row at all.
pub fn parse_entries(text: &str) -> Result<ParseReport> {
    let batch = read_records(text)?;
    let mut skipped_rows = batch.skipped_rows;
    let mut entries = Vec::with_capacity(batch.records.len());
    for record in batch.records.iter() {
        let entry = Entry::from_record(record);
        if entry.has_identifying_field() {
            entries.push(entry);
        } else {
            debug!("Skipping a CSV row that has no date, id, duration or payout");
            skipped_rows += 1;
        }
    }
    Ok(ParseReport {
        entries,
        skipped_rows,
    })
}

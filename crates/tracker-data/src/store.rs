//! CSV persistence for the attendance ledger.
//!
//! The backing store is a single flat file with the columns
//! `Student Name,Status,Date`. Reads load the whole table into memory;
//! writes rewrite the whole table through a temp file + rename so a
//! successful save always leaves a complete, parseable file. A missing
//! file is not an error — it is an empty ledger.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use tracker_core::error::{Result, TrackerError};
use tracker_core::formatting::{format_date, parse_date};
use tracker_core::models::{AttendanceRow, SessionEntry, Status};

use crate::ledger::AttendanceLedger;

/// Column headers of the records file, in order.
pub const HEADERS: [&str; 3] = ["Student Name", "Status", "Date"];

/// Handle to the records file at a fixed, configured location.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full ledger from disk.
    ///
    /// Absence of the file means no history yet and yields an empty
    /// ledger. A file that exists but cannot be read or parsed is a real
    /// error: a corrupt table must not be silently treated as empty and
    /// then overwritten.
    pub fn load(&self) -> Result<AttendanceLedger> {
        if !self.path.exists() {
            debug!("No records file at {}; starting empty", self.path.display());
            return Ok(AttendanceLedger::new());
        }

        let file = std::fs::File::open(&self.path).map_err(|source| TrackerError::FileRead {
            path: self.path.clone(),
            source,
        })?;

        let mut reader = csv::Reader::from_reader(file);
        let mut rows: Vec<AttendanceRow> = Vec::new();

        for record in reader.records() {
            let record = record?;
            let name = record.get(0).unwrap_or("").to_string();
            let status = Status::parse(record.get(1).unwrap_or(""));
            let date = parse_date(record.get(2).unwrap_or(""))?;
            rows.push(AttendanceRow {
                student_name: name,
                status,
                date,
            });
        }

        debug!(
            "Loaded {} rows from {}",
            rows.len(),
            self.path.display()
        );
        Ok(AttendanceLedger::from_rows(rows))
    }

    /// Rewrite the whole records file from the given ledger.
    ///
    /// Writes to a sibling temp file first and renames it over the target,
    /// so readers never observe a half-written table.
    pub fn save(&self, ledger: &AttendanceLedger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            writer.write_record(HEADERS)?;
            for row in ledger.rows() {
                let date_str = format_date(row.date);
                writer.write_record([
                    row.student_name.as_str(),
                    row.status.as_str(),
                    date_str.as_str(),
                ])?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;

        debug!(
            "Saved {} rows to {}",
            ledger.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ── Session export ─────────────────────────────────────────────────────────────

/// Render one session's rows as CSV text in the records-file format, date
/// column included. This is the downloadable per-session artifact.
pub fn export_session(entries: &[SessionEntry], date: NaiveDate) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    let date_str = format_date(date);
    for entry in entries {
        writer.write_record([entry.name.trim(), entry.status.as_str(), date_str.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TrackerError::Config(format!("CSV export buffer error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| TrackerError::Config(format!("CSV export not UTF-8: {e}")))
}

/// File name of the export artifact for a given date,
/// e.g. `attendance_01-01-2025.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("attendance_{}.csv", format_date(date))
}

/// Write the session export into `dir` and return the written path.
pub fn write_export(dir: &Path, entries: &[SessionEntry], date: NaiveDate) -> Result<PathBuf> {
    let contents = export_session(entries, date)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    if path.exists() {
        warn!("Overwriting existing export at {}", path.display());
    }
    std::fs::write(&path, contents)?;
    Ok(path)
}

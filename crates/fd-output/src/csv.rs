//! CSV audit backend.
//!
//! Creates a single `audit_trail.csv` in the configured output directory,
//! one row per fired event.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use fd_dispatch::AssignmentRecord;

use crate::writer::AuditWriter;
use crate::OutputResult;

/// Writes the audit trail to `audit_trail.csv`.
pub struct CsvAuditWriter {
    records:  Writer<File>,
    finished: bool,
}

impl CsvAuditWriter {
    /// Open (or create) the file in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut records = Writer::from_path(dir.join("audit_trail.csv"))?;
        records.write_record([
            "task_id",
            "worker_id",
            "raw_eta_secs",
            "selection_score",
            "outcome",
        ])?;
        Ok(Self { records, finished: false })
    }
}

impl AuditWriter for CsvAuditWriter {
    fn write_record(&mut self, record: &AssignmentRecord) -> OutputResult<()> {
        // Absent worker/ETA fields become empty cells, not sentinels.
        self.records.write_record(&[
            record.task_id.clone(),
            record.chosen_worker.map(|w| w.0.to_string()).unwrap_or_default(),
            record.raw_eta_secs.map(|e| e.to_string()).unwrap_or_default(),
            record.selection_score.map(|s| s.to_string()).unwrap_or_default(),
            record.outcome.as_str().to_owned(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.records.flush()?;
        Ok(())
    }
}

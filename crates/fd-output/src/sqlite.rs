//! SQLite audit backend (feature `sqlite`).
//!
//! Creates a single `audit.db` in the configured output directory with one
//! `assignment_records` table.

use std::path::Path;

use rusqlite::Connection;

use fd_dispatch::AssignmentRecord;

use crate::writer::AuditWriter;
use crate::OutputResult;

/// Writes the audit trail to an SQLite database.
pub struct SqliteAuditWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteAuditWriter {
    /// Open (or create) `audit.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("audit.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS assignment_records (
                 seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                 task_id         TEXT NOT NULL,
                 worker_id       INTEGER,
                 raw_eta_secs    REAL,
                 selection_score REAL,
                 outcome         TEXT NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl AuditWriter for SqliteAuditWriter {
    fn write_record(&mut self, record: &AssignmentRecord) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO assignment_records \
             (task_id, worker_id, raw_eta_secs, selection_score, outcome) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(rusqlite::params![
            record.task_id,
            record.chosen_worker.map(|w| w.0),
            record.raw_eta_secs,
            record.selection_score,
            record.outcome.as_str(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.flush_prepared_statement_cache();
        Ok(())
    }
}

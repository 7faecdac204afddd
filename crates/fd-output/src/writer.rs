//! The `AuditWriter` trait implemented by all backend writers.

use fd_dispatch::AssignmentRecord;

use crate::OutputResult;

/// Trait implemented by the CSV and SQLite audit writers.
///
/// Records arrive one at a time, in firing order, and the sequence is
/// append-only — a writer never updates or reorders rows.
pub trait AuditWriter {
    /// Append one audit record.
    fn write_record(&mut self, record: &AssignmentRecord) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

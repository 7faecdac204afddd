//! `AuditObserver<W>` — bridges `FleetObserver` to an `AuditWriter`.

use fd_dispatch::AssignmentRecord;
use fd_sim::FleetObserver;

use crate::writer::AuditWriter;
use crate::{OutputError, OutputResult};

/// A [`FleetObserver`] that streams every assignment record to an
/// [`AuditWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct AuditObserver<W: AuditWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: AuditWriter> AuditObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: AuditWriter> FleetObserver for AuditObserver<W> {
    fn on_assignment(&mut self, record: &AssignmentRecord) {
        let result = self.writer.write_record(record);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: u64, _sim_time_secs: f64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

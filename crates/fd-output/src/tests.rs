//! Unit tests for fd-output.

use fd_core::WorkerId;
use fd_dispatch::{AssignmentOutcome, AssignmentRecord};
use fd_sim::FleetObserver;

use crate::{AuditObserver, AuditWriter, CsvAuditWriter};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn assigned(task: &str, worker: u32, eta: f64, score: f64) -> AssignmentRecord {
    AssignmentRecord {
        task_id:         task.to_owned(),
        chosen_worker:   Some(WorkerId(worker)),
        raw_eta_secs:    Some(eta),
        selection_score: Some(score),
        outcome:         AssignmentOutcome::Assigned,
    }
}

fn unresolved(task: &str) -> AssignmentRecord {
    AssignmentRecord {
        task_id:         task.to_owned(),
        chosen_worker:   None,
        raw_eta_secs:    None,
        selection_score: None,
        outcome:         AssignmentOutcome::UnresolvedLocation,
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_backend {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvAuditWriter::new(dir.path()).unwrap();
        writer.write_record(&assigned("id_000", 1, 17.0, 21.25)).unwrap();
        writer.write_record(&unresolved("id_001")).unwrap();
        writer.finish().unwrap();

        let contents = std::fs::read_to_string(dir.path().join("audit_trail.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "task_id,worker_id,raw_eta_secs,selection_score,outcome");
        assert_eq!(lines[1], "id_000,1,17,21.25,assigned");
        // Absent fields are empty cells.
        assert_eq!(lines[2], "id_001,,,,unresolved-location");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvAuditWriter::new(dir.path()).unwrap();
        writer.write_record(&assigned("id_000", 0, 1.0, 1.0)).unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap();
    }
}

// ── Observer bridge ───────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[test]
    fn streams_records_and_finishes_on_sim_end() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvAuditWriter::new(dir.path()).unwrap();
        let mut observer = AuditObserver::new(writer);

        observer.on_assignment(&assigned("id_000", 0, 10.0, 10.0));
        observer.on_assignment(&assigned("id_001", 1, 20.0, 25.0));
        observer.on_sim_end(100, 100.0);

        assert!(observer.take_error().is_none());

        let contents = std::fs::read_to_string(dir.path().join("audit_trail.csv")).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.contains("id_001,1,20,25,assigned"));
    }
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_backend {
    use super::*;
    use crate::SqliteAuditWriter;

    #[test]
    fn round_trips_through_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SqliteAuditWriter::new(dir.path()).unwrap();
        writer.write_record(&assigned("id_000", 2, 42.5, 53.125)).unwrap();
        writer.write_record(&unresolved("id_001")).unwrap();
        writer.finish().unwrap();
        drop(writer);

        let conn = rusqlite::Connection::open(dir.path().join("audit.db")).unwrap();
        let mut stmt = conn
            .prepare("SELECT task_id, worker_id, raw_eta_secs, outcome FROM assignment_records ORDER BY seq")
            .unwrap();
        let rows: Vec<(String, Option<u32>, Option<f64>, String)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .unwrap()
            .map(Result::unwrap)
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("id_000".into(), Some(2), Some(42.5), "assigned".into()));
        assert_eq!(rows[1], ("id_001".into(), None, None, "unresolved-location".into()));
    }
}

//! Audit-trail rows: one per fired event, in firing order.

use fd_core::WorkerId;

/// How the dispatcher disposed of one fired event.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AssignmentOutcome {
    /// Task accepted by the chosen worker.
    Assigned,
    /// An endpoint code was missing from the registry.
    UnresolvedLocation,
    /// No candidate produced a finite planning estimate.
    NoEligibleWorker,
    /// The chosen worker turned the task down (full queue, no route,
    /// charging).
    RejectedByWorker,
}

impl AssignmentOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOutcome::Assigned           => "assigned",
            AssignmentOutcome::UnresolvedLocation => "unresolved-location",
            AssignmentOutcome::NoEligibleWorker   => "no-eligible-worker",
            AssignmentOutcome::RejectedByWorker   => "rejected-by-worker",
        }
    }
}

impl std::fmt::Display for AssignmentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit entry.  ETA and score are absent when the decision failed
/// before any candidate was evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentRecord {
    pub task_id: String,
    /// The selected worker — also set on `RejectedByWorker`, naming the
    /// worker that refused.
    pub chosen_worker: Option<WorkerId>,
    /// Raw (unpenalized) planning ETA of the selected candidate.
    pub raw_eta_secs: Option<f64>,
    /// The ETA after selection bias — what the candidates competed on.
    pub selection_score: Option<f64>,
    pub outcome: AssignmentOutcome,
}

impl AssignmentRecord {
    /// A record for a decision that failed before candidate evaluation.
    pub(crate) fn failed(task_id: &str, outcome: AssignmentOutcome) -> Self {
        Self {
            task_id: task_id.to_owned(),
            chosen_worker: None,
            raw_eta_secs: None,
            selection_score: None,
            outcome,
        }
    }
}

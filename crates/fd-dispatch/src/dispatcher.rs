//! The dispatcher: per-event decision pipeline and the observer adapter
//! that hooks it onto the sequencer.

use tracing::{debug, info, warn};

use fd_core::WorkerRole;
use fd_nav::{LocationRegistry, RoutePlanner};
use fd_sequencer::{ObserverError, SequenceObserver, TaskRelease};
use fd_worker::{Task, Worker};

use crate::config::DispatchConfig;
use crate::record::{AssignmentOutcome, AssignmentRecord};

/// Decides which worker, if any, gets each released task.
///
/// Holds only configuration and the append-only audit trail; workers, the
/// registry, and the planner are borrowed per call so ownership stays with
/// the orchestrator.
pub struct Dispatcher {
    config: DispatchConfig,
    records: Vec<AssignmentRecord>,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The audit trail: one record per handled release, in firing order.
    pub fn records(&self) -> &[AssignmentRecord] {
        &self.records
    }

    /// Handle one task release end-to-end and append its audit record.
    pub fn handle_release<P: RoutePlanner>(
        &mut self,
        release: &TaskRelease,
        registry: &LocationRegistry,
        planner: &P,
        workers: &mut [Worker],
    ) -> AssignmentOutcome {
        let record = self.decide(release, registry, planner, workers);
        let outcome = record.outcome;
        info!(
            task = %record.task_id,
            outcome = %record.outcome,
            worker = record.chosen_worker.map(|w| w.0),
            eta_secs = record.raw_eta_secs,
            "dispatch decision"
        );
        self.records.push(record);
        outcome
    }

    fn decide<P: RoutePlanner>(
        &self,
        release: &TaskRelease,
        registry: &LocationRegistry,
        planner: &P,
        workers: &mut [Worker],
    ) -> AssignmentRecord {
        // ── 1. Resolve endpoints ──────────────────────────────────────────
        let Some(origin) = registry.resolve(&release.origin_code) else {
            warn!(task = %release.id, code = %release.origin_code, "unresolved origin code");
            return AssignmentRecord::failed(&release.id, AssignmentOutcome::UnresolvedLocation);
        };
        let Some(destination) = registry.resolve(&release.destination_code) else {
            warn!(task = %release.id, code = %release.destination_code, "unresolved destination code");
            return AssignmentRecord::failed(&release.id, AssignmentOutcome::UnresolvedLocation);
        };

        // The task's own route is candidate-independent; plan it once.  No
        // route here means no candidate could produce a finite estimate.
        let Ok(route) = planner.plan(origin, destination) else {
            warn!(task = %release.id, "no route between task endpoints");
            return AssignmentRecord::failed(&release.id, AssignmentOutcome::NoEligibleWorker);
        };

        // ── 2–3. Eligibility and candidate pool ───────────────────────────
        let tag = release.priority_tag.as_str();
        let robotic_ok = self.config.robotic_compatible(tag);
        let pool_has_robotic =
            robotic_ok && workers.iter().any(|w| w.role() == WorkerRole::Robotic);

        let adjust = self.config.adjustment_for(tag);
        let task = Task {
            id:               release.id.clone(),
            origin,
            destination,
            priority:         self.config.priority_for(tag),
            route,
            planned_eta_secs: 0.0,
        };

        // ── 4–6. Estimate, score, select ──────────────────────────────────
        //
        // Strict `<` keeps the first-found candidate on ties.
        let mut best: Option<(usize, f64, f64)> = None;
        for (index, worker) in workers.iter().enumerate() {
            if !robotic_ok && worker.role() == WorkerRole::Robotic {
                continue;
            }
            let raw = worker.planning_eta(&task, planner, &adjust);
            if !raw.is_finite() {
                debug!(task = %task.id, worker = %worker.id(), "candidate has no finite estimate");
                continue;
            }
            let score = if pool_has_robotic && worker.role() == WorkerRole::Human {
                raw * self.config.human_eta_penalty
            } else {
                raw
            };
            if best.is_none_or(|(_, _, best_score)| score < best_score) {
                best = Some((index, raw, score));
            }
        }

        let Some((index, raw, score)) = best else {
            return AssignmentRecord::failed(&release.id, AssignmentOutcome::NoEligibleWorker);
        };

        // ── 7. Offer to the winner ────────────────────────────────────────
        //
        // The task carries the raw ETA — the penalty exists only for
        // comparison and never reaches the worker.
        let mut task = task;
        task.planned_eta_secs = raw;
        let worker = &mut workers[index];
        let chosen = worker.id();

        let outcome = match worker.try_accept(task, planner) {
            Ok(())      => AssignmentOutcome::Assigned,
            Err(reason) => {
                debug!(task = %release.id, worker = %chosen, %reason, "worker rejected task");
                AssignmentOutcome::RejectedByWorker
            }
        };

        AssignmentRecord {
            task_id:         release.id.clone(),
            chosen_worker:   Some(chosen),
            raw_eta_secs:    Some(raw),
            selection_score: Some(score),
            outcome,
        }
    }
}

// ── Sequencer adapter ─────────────────────────────────────────────────────────

/// Borrows everything a dispatch decision needs and plugs it into the
/// sequencer's subscriber list, so assignments happen synchronously inside
/// the clock's micro-step — event N is fully resolved before event N+1
/// fires.
pub struct DispatchContext<'a, P: RoutePlanner> {
    pub dispatcher: &'a mut Dispatcher,
    pub registry: &'a LocationRegistry,
    pub planner: &'a P,
    pub workers: &'a mut [Worker],
}

impl<P: RoutePlanner> SequenceObserver for DispatchContext<'_, P> {
    fn on_task(&mut self, release: &TaskRelease) -> Result<(), ObserverError> {
        self.dispatcher
            .handle_release(release, self.registry, self.planner, self.workers);
        Ok(())
    }
}

//! Unit and end-to-end tests for fd-sim.

use fd_core::{Point, SimParams, WorkerRole};
use fd_dispatch::{AssignmentOutcome, AssignmentRecord};
use fd_nav::{LinePlanner, LocationRegistry};
use fd_sequencer::{SequencerParams, TimeMode};
use fd_worker::{CongestionParams, IdleZone, WorkerSpec, WorkerState};

use crate::{FleetObserver, FleetSimBuilder, NoopObserver, SimError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn registry() -> LocationRegistry {
    let mut reg = LocationRegistry::new();
    reg.register("DOCK", p(10.0, 0.0)).unwrap();
    reg.register("STORE", p(30.0, 0.0)).unwrap();
    reg
}

fn robot_spec() -> WorkerSpec {
    WorkerSpec {
        role:              WorkerRole::Robotic,
        nominal_speed_mps: 2.0,
        mount_secs:        1.0,
        unmount_secs:      1.0,
    }
}

fn base_params(total_ticks: u64) -> (SimParams, SequencerParams) {
    (
        SimParams { tick_secs: 1.0, total_ticks, seed: 42 },
        SequencerParams {
            time_mode:          TimeMode::Elapsed,
            micro_step_secs:    0.5,
            max_steps_per_tick: 100,
            start_delay_secs:   0.0,
        },
    )
}

/// Observer that records assignment outcomes and per-tick fire counts.
#[derive(Default)]
struct Recording {
    assignments: Vec<AssignmentRecord>,
    fired_per_tick: Vec<usize>,
    ended: bool,
}

impl FleetObserver for Recording {
    fn on_assignment(&mut self, record: &AssignmentRecord) {
        self.assignments.push(record.clone());
    }

    fn on_tick_end(&mut self, _tick: u64, fired: usize) {
        self.fired_per_tick.push(fired);
    }

    fn on_sim_end(&mut self, _final_tick: u64, _sim_time_secs: f64) {
        self.ended = true;
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn missing_schedule_is_a_config_error() {
        let (params, seq_params) = base_params(10);
        let err = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .registry(registry())
            .worker(robot_spec(), p(0.0, 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn empty_fleet_is_a_config_error() {
        let (params, seq_params) = base_params(10);
        let err = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .schedule_text("00:01,DOCK,STORE,std\n")
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn unparseable_schedule_fails_the_build() {
        let (params, seq_params) = base_params(10);
        let err = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .schedule_text("# nothing but comments\n")
            .worker(robot_spec(), p(0.0, 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Schedule(_)));
    }
}

// ── End-to-end runs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use super::*;

    #[test]
    fn single_task_is_dispatched_and_executed() {
        let (params, seq_params) = base_params(40);
        let mut sim = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .registry(registry())
            .schedule_text("00:02,DOCK,STORE,std\n")
            .worker(robot_spec(), p(0.0, 0.0))
            // Zero-radius zone at the drop-off: post-task roaming collapses
            // to standing still, keeping the final position exact.
            .idle_zone(IdleZone { center: p(30.0, 0.0), radius_m: 0.0, dwell_secs: 1_000.0 })
            .build()
            .unwrap();

        let mut obs = Recording::default();
        sim.run(&mut obs).unwrap();

        assert_eq!(obs.assignments.len(), 1);
        let record = &obs.assignments[0];
        assert_eq!(record.outcome, AssignmentOutcome::Assigned);
        assert_eq!(record.task_id, "id_000");
        // 5 s reposition + 1 s mount + 10 s travel + 1 s unmount at 2 m/s.
        assert_eq!(record.raw_eta_secs, Some(17.0));

        // Task executed: queue drained, worker ended at the drop-off.
        assert!(sim.workers[0].queue().is_empty());
        assert_eq!(sim.workers[0].position(), p(30.0, 0.0));
        assert!(obs.ended);
    }

    #[test]
    fn every_event_gets_exactly_one_record_in_firing_order() {
        let (params, seq_params) = base_params(30);
        let mut sim = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .registry(registry())
            .schedule_text(
                "00:03,DOCK,STORE,std\n\
                 00:01,DOCK,NOWHERE,std\n\
                 00:02,DOCK,STORE,std\n",
            )
            .worker(robot_spec(), p(0.0, 0.0))
            .build()
            .unwrap();

        let mut obs = Recording::default();
        sim.run(&mut obs).unwrap();

        let ids: Vec<&str> = obs.assignments.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["id_000", "id_001", "id_002"]);
        // The unresolvable destination sorts first (1 s) and is recorded,
        // not dropped.
        assert_eq!(obs.assignments[0].outcome, AssignmentOutcome::UnresolvedLocation);
        assert_eq!(obs.assignments[1].outcome, AssignmentOutcome::Assigned);
        assert_eq!(obs.assignments[2].outcome, AssignmentOutcome::Assigned);
        assert_eq!(obs.fired_per_tick.iter().sum::<usize>(), 3);
    }

    #[test]
    fn identical_seeds_reproduce_identical_audit_trails() {
        let schedule = "00:01,DOCK,STORE,std\n00:04,STORE,DOCK,std\n";
        let run_once = || {
            let (params, seq_params) = base_params(60);
            let mut sim = FleetSimBuilder::new(params, seq_params, LinePlanner)
                .registry(registry())
                .schedule_text(schedule)
                .worker(robot_spec(), p(0.0, 0.0))
                .worker(robot_spec(), p(40.0, 0.0))
                .build()
                .unwrap();
            let mut obs = Recording::default();
            sim.run(&mut obs).unwrap();
            obs.assignments
        };
        assert_eq!(run_once(), run_once());
    }

    #[test]
    fn queue_overflow_shows_up_as_rejections() {
        // Three simultaneous tasks against a single capacity-2 worker.
        let (params, seq_params) = base_params(5);
        let mut sim = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .registry(registry())
            .schedule_text(
                "00:01,DOCK,STORE,std\n\
                 00:01,DOCK,STORE,std\n\
                 00:01,DOCK,STORE,std\n",
            )
            .worker(robot_spec(), p(0.0, 0.0))
            .build()
            .unwrap();

        let mut obs = Recording::default();
        sim.run(&mut obs).unwrap();

        let outcomes: Vec<AssignmentOutcome> =
            obs.assignments.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                AssignmentOutcome::Assigned,
                AssignmentOutcome::Assigned,
                AssignmentOutcome::RejectedByWorker,
            ]
        );
    }

    #[test]
    fn idle_fleet_roams_after_the_schedule_drains() {
        let (params, seq_params) = base_params(60);
        let mut sim = FleetSimBuilder::new(params, seq_params, LinePlanner)
            .registry(registry())
            .schedule_text("00:01,DOCK,STORE,std\n")
            .worker(robot_spec(), p(0.0, 0.0))
            .idle_zone(IdleZone { center: p(100.0, 100.0), radius_m: 5.0, dwell_secs: 5.0 })
            .congestion(CongestionParams::default())
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();

        // Long after the single task finished, the worker is loitering
        // around the idle zone, not parked at the drop-off.
        let state = sim.workers[0].state();
        assert!(matches!(state, WorkerState::Idle | WorkerState::MovingToIdle));
        assert!(sim.workers[0].position().distance_m(p(30.0, 0.0)) > 1.0);
    }
}

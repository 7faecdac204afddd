//! Unit tests for fd-dispatch.

use fd_core::{Point, WorkerId, WorkerRng, WorkerRole};
use fd_nav::{LinePlanner, LocationRegistry};
use fd_sequencer::TaskRelease;
use fd_worker::{CongestionParams, IdleZone, Worker, WorkerSpec, WorkerState};

use crate::{AssignmentOutcome, DispatchConfig, Dispatcher, TagAdjustRule, TagPriorityRule};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// 1 m/s worker with zero handling time: its raw ETA equals reposition
/// metres + travel metres, so scores can be read off the geometry.
fn worker(id: u32, role: WorkerRole, pos: Point) -> Worker {
    Worker::new(
        WorkerId(id),
        WorkerSpec {
            role,
            nominal_speed_mps: 1.0,
            mount_secs:        0.0,
            unmount_secs:      0.0,
        },
        pos,
        IdleZone { center: p(0.0, 0.0), radius_m: 5.0, dwell_secs: 60.0 },
        CongestionParams { no_effect_count: 100, max_effect_count: 200, max_slowdown: 0.5 },
        WorkerRng::new(7, WorkerId(id)),
    )
}

fn release(id: &str, origin: &str, destination: &str, tag: &str) -> TaskRelease {
    TaskRelease {
        id:               id.to_owned(),
        origin_code:      origin.to_owned(),
        destination_code: destination.to_owned(),
        priority_tag:     tag.to_owned(),
    }
}

/// Registry with PICKUP at (0,0) and DROP at (50,0): every task route is
/// 50 m.
fn registry() -> LocationRegistry {
    let mut reg = LocationRegistry::new();
    reg.register("PICKUP", p(0.0, 0.0)).unwrap();
    reg.register("DROP", p(50.0, 0.0)).unwrap();
    reg
}

// ── Configuration rules ───────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn exact_disallow_matches_whole_tag_only() {
        let config = DispatchConfig {
            robotic_disallow_exact: vec!["fragile".into()],
            ..DispatchConfig::default()
        };
        assert!(!config.robotic_compatible("fragile"));
        assert!(config.robotic_compatible("fragile-2"));
        assert!(config.robotic_compatible("std"));
    }

    #[test]
    fn substring_disallow_is_case_insensitive() {
        let config = DispatchConfig {
            robotic_disallow_substrings: vec!["HazMat".into()],
            ..DispatchConfig::default()
        };
        assert!(!config.robotic_compatible("hazmat-3"));
        assert!(!config.robotic_compatible("cold-HAZMAT"));
        assert!(config.robotic_compatible("std"));
    }

    #[test]
    fn priority_rules_win_over_embedded_digits() {
        let config = DispatchConfig {
            tag_priorities: vec![TagPriorityRule { pattern: "urgent".into(), priority: 9 }],
            ..DispatchConfig::default()
        };
        assert_eq!(config.priority_for("urgent-3"), 9);
        assert_eq!(config.priority_for("express-3"), 3);
        assert_eq!(config.priority_for("std"), 0);
    }

    #[test]
    fn first_adjustment_rule_wins() {
        let config = DispatchConfig {
            tag_adjustments: vec![
                TagAdjustRule {
                    pattern: "cold".into(),
                    extra_mount_secs: 5.0,
                    extra_unmount_secs: 0.0,
                    travel_multiplier: 1.0,
                },
                TagAdjustRule {
                    pattern: "cold-fast".into(),
                    extra_mount_secs: 99.0,
                    extra_unmount_secs: 0.0,
                    travel_multiplier: 1.0,
                },
            ],
            ..DispatchConfig::default()
        };
        // "cold-fast" contains "cold", and the "cold" rule comes first.
        assert_eq!(config.adjustment_for("cold-fast").extra_mount_secs, 5.0);
        assert_eq!(config.adjustment_for("dry").extra_mount_secs, 0.0);
    }
}

// ── Selection and assignment ──────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn penalized_human_loses_to_robot_with_worse_raw_eta() {
        // Robotic raw ETA 100 s (50 m reposition + 50 m travel), human raw
        // ETA 90 s (40 m + 50 m).  Penalty 1.25 → human scores 112.5.
        let mut dispatcher = Dispatcher::new(DispatchConfig {
            human_eta_penalty: 1.25,
            ..DispatchConfig::default()
        });
        let mut workers = vec![
            worker(0, WorkerRole::Robotic, p(-50.0, 0.0)),
            worker(1, WorkerRole::Human, p(-40.0, 0.0)),
        ];

        let outcome = dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "std"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );

        assert_eq!(outcome, AssignmentOutcome::Assigned);
        let record = &dispatcher.records()[0];
        assert_eq!(record.chosen_worker, Some(WorkerId(0)));
        assert_eq!(record.raw_eta_secs, Some(100.0));
        assert_eq!(record.selection_score, Some(100.0));
        // The robot got the task; the human stayed idle.
        assert_eq!(workers[0].queue().len(), 1);
        assert!(workers[1].queue().is_empty());
    }

    #[test]
    fn disallowed_tag_restricts_pool_to_humans_unpenalized() {
        let mut dispatcher = Dispatcher::new(DispatchConfig {
            human_eta_penalty:           1.25,
            robotic_disallow_substrings: vec!["hazmat".into()],
            ..DispatchConfig::default()
        });
        // The robot is much closer, but ineligible.
        let mut workers = vec![
            worker(0, WorkerRole::Robotic, p(-1.0, 0.0)),
            worker(1, WorkerRole::Human, p(-40.0, 0.0)),
        ];

        let outcome = dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "HAZMAT-2"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );

        assert_eq!(outcome, AssignmentOutcome::Assigned);
        let record = &dispatcher.records()[0];
        assert_eq!(record.chosen_worker, Some(WorkerId(1)));
        // No robots in the pool → the human's score is its raw ETA.
        assert_eq!(record.raw_eta_secs, Some(90.0));
        assert_eq!(record.selection_score, Some(90.0));
        assert!(workers[0].queue().is_empty());
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default());
        let mut workers = vec![
            worker(0, WorkerRole::Robotic, p(-10.0, 0.0)),
            worker(1, WorkerRole::Robotic, p(0.0, -10.0)),
        ];

        dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "std"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );
        assert_eq!(dispatcher.records()[0].chosen_worker, Some(WorkerId(0)));
    }

    #[test]
    fn raw_eta_lands_on_the_task_not_the_score() {
        let mut dispatcher = Dispatcher::new(DispatchConfig {
            human_eta_penalty: 2.0,
            ..DispatchConfig::default()
        });
        // Robot so far away the penalized human still wins.
        let mut workers = vec![
            worker(0, WorkerRole::Robotic, p(-1000.0, 0.0)),
            worker(1, WorkerRole::Human, p(-40.0, 0.0)),
        ];

        dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "std"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );

        let record = &dispatcher.records()[0];
        assert_eq!(record.chosen_worker, Some(WorkerId(1)));
        assert_eq!(record.raw_eta_secs, Some(90.0));
        assert_eq!(record.selection_score, Some(180.0));
        // The queued task carries the raw 90 s, not the doubled score.
        let queued = workers[1].queue().head().unwrap();
        assert_eq!(queued.planned_eta_secs, 90.0);
    }

    #[test]
    fn adjustment_inflates_the_estimate_for_matching_tags() {
        let mut dispatcher = Dispatcher::new(DispatchConfig {
            tag_adjustments: vec![TagAdjustRule {
                pattern: "cold".into(),
                extra_mount_secs: 10.0,
                extra_unmount_secs: 10.0,
                travel_multiplier: 2.0,
            }],
            ..DispatchConfig::default()
        });
        let mut workers = vec![worker(0, WorkerRole::Robotic, p(-50.0, 0.0))];

        dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "cold-1"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );
        // (50 m + 50 m) × 2 + 20 s of extra handling.
        assert_eq!(dispatcher.records()[0].raw_eta_secs, Some(220.0));
    }
}

// ── Failure outcomes ──────────────────────────────────────────────────────────

#[cfg(test)]
mod outcomes {
    use super::*;

    #[test]
    fn unknown_code_is_unresolved_location() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default());
        let mut workers = vec![worker(0, WorkerRole::Robotic, p(0.0, 0.0))];

        let outcome = dispatcher.handle_release(
            &release("id_000", "NOWHERE", "DROP", "std"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );

        assert_eq!(outcome, AssignmentOutcome::UnresolvedLocation);
        let record = &dispatcher.records()[0];
        assert_eq!(record.chosen_worker, None);
        assert_eq!(record.raw_eta_secs, None);
        // No worker was touched.
        assert!(workers[0].queue().is_empty());
        assert_eq!(workers[0].state(), WorkerState::Idle);
    }

    #[test]
    fn empty_pool_is_no_eligible_worker() {
        let mut dispatcher = Dispatcher::new(DispatchConfig {
            robotic_disallow_exact: vec!["manual".into()],
            ..DispatchConfig::default()
        });
        // Only a robot, and the tag excludes robots.
        let mut workers = vec![worker(0, WorkerRole::Robotic, p(0.0, 0.0))];

        let outcome = dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "manual"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );
        assert_eq!(outcome, AssignmentOutcome::NoEligibleWorker);
    }

    #[test]
    fn charging_winner_is_rejected_by_worker() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default());
        let mut workers = vec![worker(0, WorkerRole::Robotic, p(0.0, 0.0))];
        workers[0].begin_charging().unwrap();

        let outcome = dispatcher.handle_release(
            &release("id_000", "PICKUP", "DROP", "std"),
            &registry(),
            &LinePlanner,
            &mut workers,
        );

        assert_eq!(outcome, AssignmentOutcome::RejectedByWorker);
        let record = &dispatcher.records()[0];
        // The record names the worker that refused.
        assert_eq!(record.chosen_worker, Some(WorkerId(0)));
    }

    #[test]
    fn one_record_per_release_in_order() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default());
        let mut workers = vec![worker(0, WorkerRole::Robotic, p(0.0, 0.0))];

        for (i, origin) in [(0, "PICKUP"), (1, "NOWHERE"), (2, "PICKUP")] {
            dispatcher.handle_release(
                &release(&format!("id_{i:03}"), origin, "DROP", "std"),
                &registry(),
                &LinePlanner,
                &mut workers,
            );
        }

        let ids: Vec<&str> = dispatcher.records().iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["id_000", "id_001", "id_002"]);
        assert_eq!(dispatcher.records()[1].outcome, AssignmentOutcome::UnresolvedLocation);
        // Two accepted tasks fill the worker's queue.
        assert_eq!(workers[0].queue().len(), 2);
    }
}

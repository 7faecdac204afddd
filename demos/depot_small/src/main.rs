//! depot_small — smallest runnable scenario for the rust_fd framework.
//!
//! A 6-node depot floor: two inbound docks on the west wall, two storage
//! aisles east of them, connected by a central corridor.  Two AGVs and one
//! human tug handle a 10-request morning schedule; one request carries a
//! `fragile` tag that only the human may take, and one names a location
//! code nobody registered (it shows up in the audit trail as unresolved).
//!
//! Run with `RUST_LOG=info` to watch the sequencer release tasks.

use std::path::Path;

use anyhow::Result;

use fd_core::{Point, SimParams, WorkerRole};
use fd_dispatch::DispatchConfig;
use fd_nav::{GraphPlanner, LocationRegistry, NavGraphBuilder};
use fd_output::{AuditObserver, CsvAuditWriter};
use fd_sequencer::{SequencerParams, TimeMode};
use fd_sim::FleetSimBuilder;
use fd_worker::{IdleZone, WorkerSpec};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const TICK_SECS: f64 = 0.5;
const SIM_MINUTES: u64 = 30;

// Elapsed-mode schedule: time,origin,destination,priority.
const SCHEDULE: &str = "\
# morning inbound wave
00:05,DOCK_1,AISLE_A,std
00:10,DOCK_2,AISLE_B,std
00:20,DOCK_1,AISLE_B,urgent-5
00:40,DOCK_2,AISLE_A,fragile
01:00,DOCK_1,AISLE_A,std
02:00,DOCK_2,AISLE_B,std
03:00,DOCK_1,MEZZANINE,std
05:00,DOCK_2,AISLE_A,urgent-5
08:00,DOCK_1,AISLE_B,std
12:00,DOCK_2,AISLE_A,std
";

// ── Site layout ───────────────────────────────────────────────────────────────

/// Build the lane graph and registry together so codes land on lane nodes.
fn build_site() -> (GraphPlanner, LocationRegistry) {
    let mut b = NavGraphBuilder::new();

    // West wall docks, central corridor, east aisles (metres).
    let dock_1 = b.add_node(Point::new(0.0, 10.0));
    let dock_2 = b.add_node(Point::new(0.0, 30.0));
    let mid_s  = b.add_node(Point::new(25.0, 10.0));
    let mid_n  = b.add_node(Point::new(25.0, 30.0));
    let aisle_a = b.add_node(Point::new(50.0, 10.0));
    let aisle_b = b.add_node(Point::new(50.0, 30.0));

    b.add_lane(dock_1, mid_s);
    b.add_lane(dock_2, mid_n);
    b.add_lane(mid_s, mid_n);
    b.add_lane(mid_s, aisle_a);
    b.add_lane(mid_n, aisle_b);

    let mut registry = LocationRegistry::new();
    for (code, point) in [
        ("DOCK_1", Point::new(0.0, 10.0)),
        ("DOCK_2", Point::new(0.0, 30.0)),
        ("AISLE_A", Point::new(50.0, 10.0)),
        ("AISLE_B", Point::new(50.0, 30.0)),
    ] {
        if let Err(e) = registry.register(code, point) {
            tracing::warn!(error = %e, "site file conflict");
        }
    }
    // MEZZANINE is deliberately absent — its request goes unresolved.

    (GraphPlanner::new(b.build()), registry)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (planner, registry) = build_site();

    let agv = WorkerSpec {
        role:              WorkerRole::Robotic,
        nominal_speed_mps: 1.8,
        mount_secs:        4.0,
        unmount_secs:      3.0,
    };
    let tug = WorkerSpec {
        role:              WorkerRole::Human,
        nominal_speed_mps: 1.4,
        mount_secs:        8.0,
        unmount_secs:      6.0,
    };

    let params = SimParams {
        tick_secs:   TICK_SECS,
        total_ticks: SIM_MINUTES * 60 * 2, // 0.5 s ticks
        seed:        SEED,
    };
    let sequencer_params = SequencerParams {
        time_mode:          TimeMode::Elapsed,
        micro_step_secs:    0.1,
        max_steps_per_tick: 600,
        start_delay_secs:   0.0,
    };
    let dispatch = DispatchConfig {
        robotic_disallow_substrings: vec!["fragile".into()],
        human_eta_penalty:           1.25,
        ..DispatchConfig::default()
    };

    let mut sim = FleetSimBuilder::new(params, sequencer_params, planner)
        .registry(registry)
        .dispatch(dispatch)
        .schedule_text(SCHEDULE)
        .worker(agv.clone(), Point::new(25.0, 10.0))
        .worker(agv, Point::new(25.0, 30.0))
        .worker(tug, Point::new(0.0, 20.0))
        .idle_zone(IdleZone {
            center:     Point::new(25.0, 20.0),
            radius_m:   8.0,
            dwell_secs: 45.0,
        })
        .build()?;

    let writer = CsvAuditWriter::new(Path::new("."))?;
    let mut observer = AuditObserver::new(writer);
    sim.run(&mut observer)?;
    if let Some(e) = observer.take_error() {
        return Err(e.into());
    }

    // ── Summary ───────────────────────────────────────────────────────────
    println!("audit trail ({} records):", sim.dispatcher.records().len());
    for record in sim.dispatcher.records() {
        match (record.chosen_worker, record.raw_eta_secs) {
            (Some(worker), Some(eta)) => println!(
                "  {}  {:<20} worker {} (eta {:.1} s)",
                record.task_id,
                record.outcome,
                worker.0,
                eta
            ),
            _ => println!("  {}  {}", record.task_id, record.outcome),
        }
    }
    for worker in &sim.workers {
        println!(
            "worker {} ({}) finished at {} in state {:?}",
            worker.id().0,
            worker.role(),
            worker.position(),
            worker.state()
        );
    }
    Ok(())
}

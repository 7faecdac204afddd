//! The `FleetSim` struct, its tick loop, and the default proximity sensor.

use tracing::info;

use fd_core::{Point, SimParams, WorkerId};
use fd_dispatch::{DispatchContext, Dispatcher};
use fd_nav::{LocationRegistry, RoutePlanner};
use fd_sequencer::Sequencer;
use fd_worker::{ProximitySensor, Worker};

use crate::{FleetObserver, SimResult};

// ── FleetSim ──────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Owns every service object for the run — clock, dispatcher, registry,
/// planner, fleet — constructed once by
/// [`FleetSimBuilder`][crate::FleetSimBuilder] and torn down together.
/// There is no ambient state: everything a tick touches hangs off this
/// struct.
pub struct FleetSim<P: RoutePlanner> {
    /// Outer-loop parameters (tick length, total ticks, seed).
    pub params: SimParams,

    /// The event clock.
    pub sequencer: Sequencer,

    /// Assignment logic and the audit trail.
    pub dispatcher: Dispatcher,

    /// Location code → point resolution.
    pub registry: LocationRegistry,

    /// The path-planning oracle, shared by dispatch and execution.
    pub planner: P,

    /// The fleet, in candidate-evaluation order.
    pub workers: Vec<Worker>,

    /// Radius for the per-tick neighbour counts.
    pub proximity_radius_m: f64,

    /// First audit record not yet forwarded to the observer.
    audit_cursor: usize,
    tick_index: u64,
}

impl<P: RoutePlanner> std::fmt::Debug for FleetSim<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetSim")
            .field("params", &self.params)
            .field("proximity_radius_m", &self.proximity_radius_m)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

impl<P: RoutePlanner> FleetSim<P> {
    pub(crate) fn new(
        params: SimParams,
        sequencer: Sequencer,
        dispatcher: Dispatcher,
        registry: LocationRegistry,
        planner: P,
        workers: Vec<Worker>,
        proximity_radius_m: f64,
    ) -> Self {
        Self {
            params,
            sequencer,
            dispatcher,
            registry,
            planner,
            workers,
            proximity_radius_m,
            audit_cursor: 0,
            tick_index: 0,
        }
    }

    /// Ticks executed so far.
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Start the clock and run `params.total_ticks` ticks.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: FleetObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.sequencer.begin()?;
        info!(total_ticks = self.params.total_ticks, "simulation started");

        for _ in 0..self.params.total_ticks {
            self.step(observer);
        }

        observer.on_sim_end(self.tick_index, self.sequencer.sim_time_secs());
        info!(
            sim_time_secs = self.sequencer.sim_time_secs(),
            assignments = self.dispatcher.records().len(),
            "simulation finished"
        );
        Ok(())
    }

    /// Execute exactly one tick: clock + dispatch, then congestion sensing,
    /// then worker advancement.
    ///
    /// Useful for tests and incremental stepping; `run` is a loop over this.
    pub fn step<O: FleetObserver>(&mut self, observer: &mut O) {
        let tick = self.tick_index;
        observer.on_tick_start(tick);

        // ── Phase 1: integrate time and dispatch fired events ─────────────
        let fired = {
            let mut ctx = DispatchContext {
                dispatcher: &mut self.dispatcher,
                registry:   &self.registry,
                planner:    &self.planner,
                workers:    &mut self.workers,
            };
            self.sequencer.tick(self.params.tick_secs, &mut [&mut ctx])
        };

        // ── Phase 2: congestion sensing over a position snapshot ──────────
        //
        // Counts are taken before anyone moves, so every worker sees the
        // same consistent neighbourhood for this tick.
        let sensor = RadiusSensor::snapshot(&self.workers, self.proximity_radius_m);
        let counts: Vec<usize> = self
            .workers
            .iter()
            .map(|w| sensor.nearby_count(w.id(), w.position()))
            .collect();

        // ── Phase 3: advance every worker by the same tick_secs ───────────
        for (worker, nearby) in self.workers.iter_mut().zip(counts) {
            worker.advance(self.params.tick_secs, nearby, &self.planner);
        }

        // ── Phase 4: forward fresh audit records ──────────────────────────
        for record in &self.dispatcher.records()[self.audit_cursor..] {
            observer.on_assignment(record);
        }
        self.audit_cursor = self.dispatcher.records().len();

        observer.on_tick_end(tick, fired);
        self.tick_index += 1;
    }
}

// ── RadiusSensor ──────────────────────────────────────────────────────────────

/// Default congestion sensor: counts workers within a fixed radius of a
/// position, from a snapshot taken at the start of the tick.
///
/// An O(N) scan per query is fine for fleet sizes where congestion between
/// individual workers is meaningful; swap in an indexed implementation of
/// [`ProximitySensor`] if fleets grow past that.
pub struct RadiusSensor {
    radius_m: f64,
    positions: Vec<(WorkerId, Point)>,
}

impl RadiusSensor {
    /// Capture all worker positions.
    pub fn snapshot(workers: &[Worker], radius_m: f64) -> Self {
        Self {
            radius_m,
            positions: workers.iter().map(|w| (w.id(), w.position())).collect(),
        }
    }
}

impl ProximitySensor for RadiusSensor {
    fn nearby_count(&self, subject: WorkerId, position: Point) -> usize {
        self.positions
            .iter()
            .filter(|(id, pos)| *id != subject && pos.distance_m(position) <= self.radius_m)
            .count()
    }
}

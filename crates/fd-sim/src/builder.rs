//! Fluent builder for constructing a [`FleetSim`].

use std::path::PathBuf;

use fd_core::{Point, SimParams, WorkerId, WorkerRng};
use fd_dispatch::{DispatchConfig, Dispatcher};
use fd_nav::{LocationRegistry, RoutePlanner};
use fd_sequencer::{Sequencer, SequencerParams};
use fd_worker::{CongestionParams, IdleZone, Worker, WorkerSpec};

use crate::{FleetSim, SimError, SimResult};

enum ScheduleInput {
    Path(PathBuf),
    Text(String),
}

/// Fluent builder for [`FleetSim<P>`].
///
/// # Required inputs
///
/// - [`SimParams`] + [`SequencerParams`] — tick length, micro-step, seed, …
/// - `P: RoutePlanner` — the path-planning oracle
/// - a schedule source (`schedule_path` or `schedule_text`)
/// - at least one worker
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.registry(r)`          | empty registry                   |
/// | `.dispatch(c)`          | `DispatchConfig::default()`      |
/// | `.idle_zone(z)`         | 10 m disc at the origin, 30 s dwell |
/// | `.congestion(c)`        | `CongestionParams::default()`    |
/// | `.proximity_radius_m(r)`| 5 m                              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = FleetSimBuilder::new(params, sequencer_params, GraphPlanner::new(graph))
///     .registry(registry)
///     .schedule_path(Path::new("shift_a.csv"))
///     .worker(robot_spec.clone(), Point::new(0.0, 0.0))
///     .worker(human_spec, Point::new(5.0, 0.0))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct FleetSimBuilder<P: RoutePlanner> {
    params: SimParams,
    sequencer_params: SequencerParams,
    planner: P,
    dispatch_config: DispatchConfig,
    registry: LocationRegistry,
    schedule: Option<ScheduleInput>,
    workers: Vec<(WorkerSpec, Point)>,
    idle_zone: IdleZone,
    congestion: CongestionParams,
    proximity_radius_m: f64,
}

impl<P: RoutePlanner> FleetSimBuilder<P> {
    /// Create a builder with all required scalar inputs.
    pub fn new(params: SimParams, sequencer_params: SequencerParams, planner: P) -> Self {
        Self {
            params,
            sequencer_params,
            planner,
            dispatch_config: DispatchConfig::default(),
            registry: LocationRegistry::new(),
            schedule: None,
            workers: Vec::new(),
            idle_zone: IdleZone {
                center:     Point::new(0.0, 0.0),
                radius_m:   10.0,
                dwell_secs: 30.0,
            },
            congestion: CongestionParams::default(),
            proximity_radius_m: 5.0,
        }
    }

    /// Supply the populated location registry.
    pub fn registry(mut self, registry: LocationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Supply the dispatcher configuration.
    pub fn dispatch(mut self, config: DispatchConfig) -> Self {
        self.dispatch_config = config;
        self
    }

    /// Load the schedule from a file at build time.
    pub fn schedule_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schedule = Some(ScheduleInput::Path(path.into()));
        self
    }

    /// Load the schedule from an in-memory table at build time.
    pub fn schedule_text(mut self, text: impl Into<String>) -> Self {
        self.schedule = Some(ScheduleInput::Text(text.into()));
        self
    }

    /// Add a worker starting at `position`.  Call once per fleet member;
    /// ids are assigned in call order, which is also the dispatcher's
    /// candidate-evaluation (tie-breaking) order.
    pub fn worker(mut self, spec: WorkerSpec, position: Point) -> Self {
        self.workers.push((spec, position));
        self
    }

    /// Shared idle zone for the whole fleet.
    pub fn idle_zone(mut self, zone: IdleZone) -> Self {
        self.idle_zone = zone;
        self
    }

    /// Shared congestion curve for the whole fleet.
    pub fn congestion(mut self, params: CongestionParams) -> Self {
        self.congestion = params;
        self
    }

    /// Radius used by the default proximity sensor.
    pub fn proximity_radius_m(mut self, radius_m: f64) -> Self {
        self.proximity_radius_m = radius_m;
        self
    }

    /// Validate inputs, load the schedule, build the fleet, and return a
    /// ready-to-run [`FleetSim`].
    pub fn build(self) -> SimResult<FleetSim<P>> {
        if self.workers.is_empty() {
            return Err(SimError::Config("fleet has no workers".into()));
        }
        let Some(schedule) = self.schedule else {
            return Err(SimError::Config("no schedule source given".into()));
        };

        // ── Load the schedule ─────────────────────────────────────────────
        let mut sequencer = Sequencer::new(self.sequencer_params);
        match schedule {
            ScheduleInput::Path(path) => sequencer.load_path(&path)?,
            ScheduleInput::Text(text) => sequencer.load_str(&text)?,
        };

        // ── Build the fleet with per-worker deterministic RNGs ────────────
        let seed = self.params.seed;
        let idle_zone = self.idle_zone;
        let congestion = self.congestion;
        let workers: Vec<Worker> = self
            .workers
            .into_iter()
            .enumerate()
            .map(|(i, (spec, position))| {
                let id = WorkerId(i as u32);
                Worker::new(id, spec, position, idle_zone, congestion, WorkerRng::new(seed, id))
            })
            .collect();

        Ok(FleetSim::new(
            self.params,
            sequencer,
            Dispatcher::new(self.dispatch_config),
            self.registry,
            self.planner,
            workers,
            self.proximity_radius_m,
        ))
    }
}

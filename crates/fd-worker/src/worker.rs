//! The `Worker` — task acceptance, ETA estimation, and per-tick advancement.

use tracing::debug;

use fd_core::{Point, WorkerId, WorkerRng, WorkerRole};
use fd_nav::RoutePlanner;

use crate::congestion::CongestionParams;
use crate::error::{ChargeError, RejectReason};
use crate::progress::RouteProgress;
use crate::queue::TaskQueue;
use crate::Task;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Static per-worker parameters fixed at setup.
#[derive(Clone, Debug)]
pub struct WorkerSpec {
    pub role: WorkerRole,

    /// Cruise speed in metres per simulated second.  Planning always uses
    /// this value; execution scales it by the congestion multiplier.
    pub nominal_speed_mps: f64,

    /// Fixed duration of the `Mounting` phase (load pickup).
    pub mount_secs: f64,

    /// Fixed duration of the `Unmounting` phase (load drop-off).
    pub unmount_secs: f64,
}

/// Where an idle worker loiters between tasks.
#[derive(Copy, Clone, Debug)]
pub struct IdleZone {
    pub center: Point,
    pub radius_m: f64,
    /// Simulated seconds to wait at a roam point before picking the next.
    pub dwell_secs: f64,
}

/// Per-tag additions to a planning estimate; configured by the dispatcher's
/// scoring variant and applied only to the candidate task's own legs.
#[derive(Copy, Clone, Debug)]
pub struct EtaAdjust {
    pub extra_mount_secs: f64,
    pub extra_unmount_secs: f64,
    pub travel_multiplier: f64,
}

impl EtaAdjust {
    pub const NONE: EtaAdjust = EtaAdjust {
        extra_mount_secs:   0.0,
        extra_unmount_secs: 0.0,
        travel_multiplier:  1.0,
    };
}

impl Default for EtaAdjust {
    fn default() -> Self {
        Self::NONE
    }
}

// ── Observable state ──────────────────────────────────────────────────────────

/// The worker's movement state as seen from outside.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WorkerState {
    Idle,
    MovingToTask,
    InTask(TaskPhase),
    MovingToIdle,
    Charging,
}

/// Phase within `InTask`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TaskPhase {
    Mounting,
    Traveling,
    Unmounting,
}

// ── Internal activity (state + its data) ──────────────────────────────────────

enum Activity {
    /// Waiting out the dwell before the next roam leg.
    Idle { wait_secs: f64 },
    /// Driving toward the head task's origin.
    MovingToTask { route: RouteProgress },
    InTask { phase: Phase },
    /// Roaming toward a sampled point near the idle zone.
    MovingToIdle { route: RouteProgress },
    /// Unavailable; rejects all tasks.
    Charging,
}

enum Phase {
    Mounting { remaining_secs: f64 },
    Traveling { route: RouteProgress },
    Unmounting { remaining_secs: f64 },
}

/// Decision produced by one advancement step, applied after the borrow of
/// `activity` ends.  `consumed` is simulated seconds eaten by the step.
enum Step {
    /// State mutated in place; nothing further.
    Stay { consumed: f64 },
    /// Switch to a new activity.
    Go { consumed: f64, next: Activity },
    /// Idle wait expired: plan the next roam leg (needs `&mut self`).
    Roam { consumed: f64 },
    /// The head task finished unmounting.
    CompleteHead { consumed: f64 },
}

// ── Worker ────────────────────────────────────────────────────────────────────

/// A mobile worker: bounded task queue plus a movement/phase state machine.
///
/// The queue is mutated in exactly two places — [`try_accept`](Self::try_accept)
/// (called by the dispatcher) and the completion step inside
/// [`advance`](Self::advance) — which, with the single-threaded tick model,
/// is the whole locking discipline.
pub struct Worker {
    id: WorkerId,
    spec: WorkerSpec,
    idle_zone: IdleZone,
    congestion: CongestionParams,

    position: Point,
    activity: Activity,
    queue: TaskQueue,

    /// Planning estimate for the queued work; refreshed on accept and
    /// completion.
    queue_eta_secs: f64,

    rng: WorkerRng,
}

impl Worker {
    /// Create an idle worker at `position`.  It waits out one dwell period
    /// before its first roam leg, so a task arriving early finds it where it
    /// was placed.
    pub fn new(
        id: WorkerId,
        spec: WorkerSpec,
        position: Point,
        idle_zone: IdleZone,
        congestion: CongestionParams,
        rng: WorkerRng,
    ) -> Self {
        Self {
            id,
            spec,
            idle_zone,
            congestion,
            position,
            activity: Activity::Idle { wait_secs: idle_zone.dwell_secs },
            queue: TaskQueue::new(),
            queue_eta_secs: 0.0,
            rng,
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn role(&self) -> WorkerRole {
        self.spec.role
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn state(&self) -> WorkerState {
        match &self.activity {
            Activity::Idle { .. }         => WorkerState::Idle,
            Activity::MovingToTask { .. } => WorkerState::MovingToTask,
            Activity::MovingToIdle { .. } => WorkerState::MovingToIdle,
            Activity::Charging            => WorkerState::Charging,
            Activity::InTask { phase }    => WorkerState::InTask(match phase {
                Phase::Mounting { .. }   => TaskPhase::Mounting,
                Phase::Traveling { .. }  => TaskPhase::Traveling,
                Phase::Unmounting { .. } => TaskPhase::Unmounting,
            }),
        }
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    /// Planning estimate for the work currently queued.
    pub fn queue_eta_secs(&self) -> f64 {
        self.queue_eta_secs
    }

    /// Where the worker will be once the whole queue is worked off:
    /// destination of the last queued task, else the current position.
    pub fn queue_final_position(&self) -> Point {
        self.queue.final_destination().unwrap_or(self.position)
    }

    // ── Charging ──────────────────────────────────────────────────────────

    /// Take the worker out of service.  Refused while it holds tasks.
    pub fn begin_charging(&mut self) -> Result<(), ChargeError> {
        if !self.queue.is_empty() {
            return Err(ChargeError::HasWork);
        }
        self.activity = Activity::Charging;
        Ok(())
    }

    /// Return to service; the worker resumes idle roaming.
    pub fn end_charging(&mut self) {
        if matches!(self.activity, Activity::Charging) {
            self.activity = Activity::Idle { wait_secs: 0.0 };
        }
    }

    // ── Acceptance ────────────────────────────────────────────────────────

    /// Offer `task` to this worker.
    ///
    /// Queue semantics:
    /// - empty queue → task becomes the head and the worker starts moving
    ///   toward its origin;
    /// - occupied head, higher-priority task, free tail → the head is
    ///   displaced to the tail and the worker re-routes to the new head's
    ///   origin, discarding in-flight progress;
    /// - otherwise the task is appended at the tail if there is room.
    ///
    /// A full queue is a capacity reject even for a higher-priority task.
    pub fn try_accept<P: RoutePlanner>(
        &mut self,
        task: Task,
        planner: &P,
    ) -> Result<(), RejectReason> {
        if matches!(self.activity, Activity::Charging) {
            return Err(RejectReason::Charging);
        }
        if self.queue.is_full() {
            return Err(RejectReason::QueueFull);
        }

        // A route must exist from the queue-final position to the new origin.
        let reposition = planner
            .plan(self.queue_final_position(), task.origin)
            .map_err(|_| RejectReason::NoRoute)?;

        if self.queue.is_empty() {
            debug!(worker = %self.id, task = %task.id, "accepted into empty queue");
            let route = RouteProgress::new(reposition);
            if self.queue.push_tail(task).is_err() {
                return Err(RejectReason::QueueFull);
            }
            self.activity = Activity::MovingToTask { route };
        } else if self
            .queue
            .head()
            .is_some_and(|head| task.priority > head.priority)
        {
            // Preemption drives from the *current* position, not the
            // queue-final one the reject check used.
            let direct = planner
                .plan(self.position, task.origin)
                .map_err(|_| RejectReason::NoRoute)?;
            debug!(worker = %self.id, task = %task.id, "preempting current head");
            let route = RouteProgress::new(direct);
            if self.queue.preempt_head(task).is_err() {
                return Err(RejectReason::QueueFull);
            }
            self.activity = Activity::MovingToTask { route };
        } else {
            debug!(worker = %self.id, task = %task.id, "appended at tail");
            if self.queue.push_tail(task).is_err() {
                return Err(RejectReason::QueueFull);
            }
        }

        self.refresh_queue_eta(planner);
        Ok(())
    }

    // ── Planning ETA ──────────────────────────────────────────────────────

    /// Estimated seconds to finish the current queue **plus** `candidate`,
    /// at nominal speed.
    ///
    /// Chain model per task: reposition to its origin, mount, drive its
    /// route, unmount.  `adjust` applies to the candidate's legs only.
    /// Any planner failure yields `f64::INFINITY`.
    pub fn planning_eta<P: RoutePlanner>(
        &self,
        candidate: &Task,
        planner: &P,
        adjust: &EtaAdjust,
    ) -> f64 {
        self.chain_eta(Some((candidate, adjust)), planner)
    }

    fn chain_eta<P: RoutePlanner>(
        &self,
        candidate: Option<(&Task, &EtaAdjust)>,
        planner: &P,
    ) -> f64 {
        let v = self.spec.nominal_speed_mps;
        if v <= 0.0 {
            return f64::INFINITY;
        }

        let mut eta = 0.0;
        let mut at = self.position;

        for queued in self.queue.iter() {
            let Ok(reposition) = planner.plan(at, queued.origin) else {
                return f64::INFINITY;
            };
            eta += reposition.length_m / v
                + self.spec.mount_secs
                + queued.route.length_m / v
                + self.spec.unmount_secs;
            at = queued.destination;
        }

        if let Some((task, adjust)) = candidate {
            let Ok(reposition) = planner.plan(at, task.origin) else {
                return f64::INFINITY;
            };
            let travel_secs = (reposition.length_m + task.route.length_m) / v;
            eta += travel_secs * adjust.travel_multiplier
                + self.spec.mount_secs
                + adjust.extra_mount_secs
                + self.spec.unmount_secs
                + adjust.extra_unmount_secs;
        }
        eta
    }

    fn refresh_queue_eta<P: RoutePlanner>(&mut self, planner: &P) {
        self.queue_eta_secs = self.chain_eta(None, planner);
    }

    // ── Advancement ───────────────────────────────────────────────────────

    /// Advance the state machine by one tick of `tick_secs` simulated
    /// seconds.
    ///
    /// `nearby_count` comes from the orchestrator's proximity sensor and
    /// sets the congestion-adjusted execution speed for the whole tick.
    /// Leftover time flows across phase transitions, so a mount that ends
    /// mid-tick immediately starts eating into travel time.
    pub fn advance<P: RoutePlanner>(
        &mut self,
        tick_secs: f64,
        nearby_count: usize,
        planner: &P,
    ) {
        let speed = self.spec.nominal_speed_mps * self.congestion.multiplier(nearby_count);

        // Legitimate flows need a dozen transitions at most; the cap stops a
        // degenerate config (zero dwell, zero-length routes) from spinning
        // through instant transitions for the whole tick.
        const MAX_TRANSITIONS_PER_TICK: u32 = 64;

        let mut remaining = tick_secs;
        let mut transitions = 0u32;
        while remaining > 1e-9 {
            transitions += 1;
            if transitions > MAX_TRANSITIONS_PER_TICK {
                break;
            }
            let step = self.step_once(remaining, speed);
            let consumed = match step {
                Step::Stay { consumed } => consumed,
                Step::Go { consumed, next } => {
                    self.activity = next;
                    consumed
                }
                Step::Roam { consumed } => {
                    if !self.start_next_leg(planner) {
                        // Planner refused the roam target: sit out the rest
                        // of this tick and retry after a fresh dwell.
                        self.activity = Activity::Idle {
                            wait_secs: self.idle_zone.dwell_secs,
                        };
                        return;
                    }
                    consumed
                }
                Step::CompleteHead { consumed } => {
                    self.complete_head(planner);
                    consumed
                }
            };
            // Charging (and zero-speed crawling) consume the whole budget.
            remaining -= consumed.max(1e-9);
        }
    }

    /// Process one state-machine step, consuming up to `dt` seconds.
    fn step_once(&mut self, dt: f64, speed: f64) -> Step {
        match &mut self.activity {
            Activity::Charging => Step::Stay { consumed: dt },

            Activity::Idle { wait_secs } => {
                if *wait_secs > dt {
                    *wait_secs -= dt;
                    Step::Stay { consumed: dt }
                } else {
                    let consumed = *wait_secs;
                    *wait_secs = 0.0;
                    Step::Roam { consumed }
                }
            }

            Activity::MovingToIdle { route } => {
                match drive(route, &mut self.position, speed, dt) {
                    Drive::EnRoute { consumed } => Step::Stay { consumed },
                    Drive::Arrived { consumed } => Step::Go {
                        consumed,
                        next: Activity::Idle {
                            wait_secs: self.idle_zone.dwell_secs,
                        },
                    },
                }
            }

            Activity::MovingToTask { route } => {
                match drive(route, &mut self.position, speed, dt) {
                    Drive::EnRoute { consumed } => Step::Stay { consumed },
                    Drive::Arrived { consumed } => {
                        debug!(worker = %self.id, "arrived at task origin; mounting");
                        Step::Go {
                            consumed,
                            next: Activity::InTask {
                                phase: Phase::Mounting {
                                    remaining_secs: self.spec.mount_secs,
                                },
                            },
                        }
                    }
                }
            }

            Activity::InTask { phase } => match phase {
                Phase::Mounting { remaining_secs } => {
                    if *remaining_secs > dt {
                        *remaining_secs -= dt;
                        Step::Stay { consumed: dt }
                    } else {
                        let consumed = *remaining_secs;
                        let route = match self.queue.head() {
                            Some(task) => RouteProgress::new(task.route.clone()),
                            // Inconsistent queue; recover by idling.
                            None => {
                                return Step::Go {
                                    consumed,
                                    next: Activity::Idle { wait_secs: 0.0 },
                                };
                            }
                        };
                        Step::Go {
                            consumed,
                            next: Activity::InTask {
                                phase: Phase::Traveling { route },
                            },
                        }
                    }
                }

                Phase::Traveling { route } => {
                    match drive(route, &mut self.position, speed, dt) {
                        Drive::EnRoute { consumed } => Step::Stay { consumed },
                        Drive::Arrived { consumed } => Step::Go {
                            consumed,
                            next: Activity::InTask {
                                phase: Phase::Unmounting {
                                    remaining_secs: self.spec.unmount_secs,
                                },
                            },
                        },
                    }
                }

                Phase::Unmounting { remaining_secs } => {
                    if *remaining_secs > dt {
                        *remaining_secs -= dt;
                        Step::Stay { consumed: dt }
                    } else {
                        let consumed = *remaining_secs;
                        Step::CompleteHead { consumed }
                    }
                }
            },
        }
    }

    /// Shift the finished head out of the queue and pick the next activity.
    fn complete_head<P: RoutePlanner>(&mut self, planner: &P) {
        if let Some(done) = self.queue.complete_head() {
            debug!(worker = %self.id, task = %done.id, "task complete");
        }
        self.refresh_queue_eta(planner);

        match self.queue.head() {
            Some(next) => match planner.plan(self.position, next.origin) {
                Ok(route) => {
                    self.activity = Activity::MovingToTask {
                        route: RouteProgress::new(route),
                    };
                }
                // Retried from the Idle arm on the next roam attempt.
                Err(_) => {
                    self.activity = Activity::Idle {
                        wait_secs: self.idle_zone.dwell_secs,
                    };
                }
            },
            None => {
                self.activity = Activity::Idle { wait_secs: 0.0 };
            }
        }
    }

    /// Leaving `Idle`: resume a stranded head task if one exists, otherwise
    /// sample and route to a roam point near the idle zone.
    ///
    /// Returns `false` when the planner refuses, leaving the worker idle.
    fn start_next_leg<P: RoutePlanner>(&mut self, planner: &P) -> bool {
        if let Some(head) = self.queue.head() {
            match planner.plan(self.position, head.origin) {
                Ok(route) => {
                    self.activity = Activity::MovingToTask {
                        route: RouteProgress::new(route),
                    };
                    return true;
                }
                Err(_) => return false,
            }
        }

        let target = self.rng.point_in_disc(self.idle_zone.center, self.idle_zone.radius_m);
        match planner.plan(self.position, target) {
            Ok(route) => {
                self.activity = Activity::MovingToIdle {
                    route: RouteProgress::new(route),
                };
                true
            }
            Err(_) => false,
        }
    }
}

// ── Movement helper ───────────────────────────────────────────────────────────

enum Drive {
    EnRoute { consumed: f64 },
    Arrived { consumed: f64 },
}

/// Integrate up to `dt` seconds of movement at `speed`, updating `position`
/// from the route's interpolated point.
fn drive(route: &mut RouteProgress, position: &mut Point, speed: f64, dt: f64) -> Drive {
    if route.is_arrived() {
        *position = route.destination();
        return Drive::Arrived { consumed: 0.0 };
    }
    if speed <= 0.0 {
        // Fully congested or misconfigured: no movement, tick consumed.
        return Drive::EnRoute { consumed: dt };
    }

    let time_to_arrive = route.remaining_m() / speed;
    if time_to_arrive <= dt {
        route.advance(f64::INFINITY);
        *position = route.destination();
        Drive::Arrived { consumed: time_to_arrive }
    } else {
        route.advance(speed * dt);
        *position = route.position();
        Drive::EnRoute { consumed: dt }
    }
}

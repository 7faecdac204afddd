//! `fd-worker` — mobile worker state machine and task execution.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`task`]       | `Task` — an accepted transport request                  |
//! | [`queue`]      | `TaskQueue` — the fixed two-slot task queue             |
//! | [`progress`]   | `RouteProgress` — polyline walker for movement          |
//! | [`congestion`] | congestion speed model + `ProximitySensor` boundary     |
//! | [`worker`]     | `Worker` — accept, ETA estimation, per-tick advancement |
//! | [`error`]      | `RejectReason`, `ChargeError`                           |
//!
//! # State machine
//!
//! ```text
//! Idle ──────────────► MovingToIdle ──► Idle (dwell, re-roam)
//!  │ accept                 │ accept preempts roaming
//!  ▼                        ▼
//! MovingToTask ──► InTask: Mounting ──► Traveling ──► Unmounting
//!                                                        │ complete
//!                            ┌───────────────────────────┘
//!                            ▼
//!               next head? MovingToTask : Idle
//! ```
//!
//! `Charging` sits outside the cycle: a charging worker rejects every task
//! and does not move.
//!
//! # Two speeds
//!
//! Planning (`planning_eta`) always uses the worker's **nominal** speed, so
//! estimates are stable and comparable across candidates.  Execution
//! (`advance`) multiplies the nominal speed by the congestion factor derived
//! from the nearby-entity count — planning never sees that factor.

pub mod congestion;
pub mod error;
pub mod progress;
pub mod queue;
pub mod task;
pub mod worker;


pub use congestion::{CongestionParams, ProximitySensor};
pub use error::{ChargeError, RejectReason};
pub use progress::RouteProgress;
pub use queue::TaskQueue;
pub use task::Task;
pub use worker::{EtaAdjust, IdleZone, TaskPhase, Worker, WorkerSpec, WorkerState};

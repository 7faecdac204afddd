//! `fd-sim` — the single-threaded tick orchestrator.
//!
//! # Tick anatomy
//!
//! ```text
//! for tick in 0..params.total_ticks:
//!   ① Clock     — the sequencer integrates tick_secs in micro-steps and
//!                 fires due events; each event is dispatched synchronously
//!                 (resolve → score → assign) before the next micro-step.
//!   ② Sense     — snapshot all worker positions; count neighbours within
//!                 the proximity radius for each worker.
//!   ③ Advance   — every worker advances movement and phase timers by the
//!                 same tick_secs, at its congestion-adjusted speed.
//!   ④ Report    — fresh audit records and tick boundaries go to the
//!                 observer.
//! ```
//!
//! Everything inside a tick runs on the caller's thread, in this order, to
//! completion — the ordering guarantee "assignment for event N is resolved
//! before event N+1 fires" falls out of the sequencer's synchronous
//! subscriber calls, not from any locking.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = FleetSimBuilder::new(params, sequencer_params, LinePlanner)
//!     .registry(registry)
//!     .schedule_text(schedule)
//!     .worker(robot_spec, Point::new(0.0, 0.0))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::FleetSimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{FleetObserver, NoopObserver};
pub use sim::{FleetSim, RadiusSensor};

//! `fd-sequencer` — the deterministic event clock.
//!
//! A schedule of transport requests is loaded once, sorted, and replayed on
//! **simulated time only**: each external tick hands the clock a budget of
//! simulated seconds, which it integrates in fixed micro-steps, firing every
//! event that has come due.  Wall-clock time never enters the picture, so a
//! run is reproducible tick-for-tick.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`event`]     | `ScheduledEvent`, `TaskRelease`                        |
//! | [`parse`]     | schedule table parsing, `TimeMode`, `SequencerParams`  |
//! | [`sequencer`] | `Sequencer` — load / begin / tick / stop / reload      |
//! | [`observer`]  | `SequenceObserver` subscriber trait                    |
//! | [`error`]     | `SequenceError`, `SequenceResult<T>`                   |
//!
//! # Tick anatomy
//!
//! ```text
//! tick(secs):
//!   budget += secs
//!   while budget >= micro_step and steps < cap:
//!     budget    -= micro_step
//!     sim_time  += micro_step
//!     fire every event with firing_secs <= sim_time, in id order,
//!       notifying all subscribers synchronously
//!   (cap hit → one warning, remainder carries to the next tick)
//! ```

pub mod error;
pub mod event;
pub mod observer;
pub mod parse;
pub mod sequencer;


pub use error::{SequenceError, SequenceResult};
pub use event::{ScheduledEvent, TaskRelease};
pub use observer::{ObserverError, SequenceObserver};
pub use parse::{SequencerParams, TimeMode};
pub use sequencer::Sequencer;

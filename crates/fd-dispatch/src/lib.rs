//! `fd-dispatch` — turns fired schedule events into worker assignments.
//!
//! On every task release from the sequencer the dispatcher:
//!
//! 1. resolves both location codes through the registry,
//! 2. decides whether robotic workers are eligible for the priority tag,
//! 3. collects raw planning ETAs from every candidate worker,
//! 4. scores them (human estimates are penalized when robots compete),
//! 5. offers the task to the cheapest candidate, and
//! 6. appends one [`AssignmentRecord`] to the audit trail — exactly one per
//!    fired event, whatever the outcome.
//!
//! # Crate layout
//!
//! | Module         | Contents                                       |
//! |----------------|------------------------------------------------|
//! | [`config`]     | `DispatchConfig` and its tag-matching rules    |
//! | [`record`]     | `AssignmentRecord`, `AssignmentOutcome`        |
//! | [`dispatcher`] | `Dispatcher`, `DispatchContext`                |

pub mod config;
pub mod dispatcher;
pub mod record;

#[cfg(test)]
mod tests;

pub use config::{DispatchConfig, TagAdjustRule, TagPriorityRule};
pub use dispatcher::{DispatchContext, Dispatcher};
pub use record::{AssignmentOutcome, AssignmentRecord};

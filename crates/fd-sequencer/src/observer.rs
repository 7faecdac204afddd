//! Subscriber trait for task-release notifications.

use crate::TaskRelease;

/// Error type subscribers may return; the clock logs it and moves on.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked synchronously for every fired event, in subscriber
/// order, before the clock executes its next micro-step.
///
/// A returned error is caught and logged per-subscriber; it never stops
/// dispatch of the remaining subscribers or of subsequent events in the
/// same tick.
pub trait SequenceObserver {
    fn on_task(&mut self, release: &TaskRelease) -> Result<(), ObserverError>;
}

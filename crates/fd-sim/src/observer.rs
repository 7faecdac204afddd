//! Simulation observer trait for progress reporting and data collection.

use fd_dispatch::AssignmentRecord;

/// Callbacks invoked by [`FleetSim::run`][crate::FleetSim::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl FleetObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: u64, fired: usize) {
///         if tick % self.interval == 0 {
///             println!("tick {tick}: fired {fired} events");
///         }
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: u64) {}

    /// Called once per audit record produced this tick, in firing order.
    fn on_assignment(&mut self, _record: &AssignmentRecord) {}

    /// Called at the end of each tick.
    ///
    /// `fired` is the number of schedule events the clock released this
    /// tick.
    fn on_tick_end(&mut self, _tick: u64, _fired: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: u64, _sim_time_secs: f64) {}
}

/// A [`FleetObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

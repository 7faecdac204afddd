//! Congestion speed model and the proximity-sensing boundary.
//!
//! The worker never counts its neighbours itself — the orchestrator owns a
//! [`ProximitySensor`] and hands each worker its count for the tick.  The
//! model here only turns that count into a speed multiplier:
//!
//! ```text
//! multiplier
//!   1.0 ┤────────●
//!       │         ╲
//!       │          ╲          linear between the two thresholds
//! floor ┤           ●─────────
//!       └───┬───────┬────────► nearby count
//!     no_effect  max_effect
//! ```
//!
//! The multiplier applies **only during execution**; planning estimates use
//! the nominal speed unmodified.

use fd_core::{Point, WorkerId};

/// Parameters of the congestion slowdown curve.
#[derive(Copy, Clone, Debug)]
pub struct CongestionParams {
    /// Up to this many nearby entities the worker moves at full speed.
    pub no_effect_count: usize,

    /// At (and beyond) this count the full slowdown applies.
    pub max_effect_count: usize,

    /// Fraction of speed lost at `max_effect_count`; total slowdown is
    /// capped here no matter how crowded the neighbourhood gets.
    pub max_slowdown: f64,
}

impl Default for CongestionParams {
    fn default() -> Self {
        Self {
            no_effect_count:  2,
            max_effect_count: 6,
            max_slowdown:     0.6,
        }
    }
}

impl CongestionParams {
    /// Speed multiplier in `[1 − max_slowdown, 1]` for a nearby count.
    pub fn multiplier(&self, nearby: usize) -> f64 {
        if nearby <= self.no_effect_count {
            return 1.0;
        }
        let span = self.max_effect_count.saturating_sub(self.no_effect_count);
        let t = if span == 0 {
            1.0
        } else {
            ((nearby - self.no_effect_count) as f64 / span as f64).min(1.0)
        };
        1.0 - self.max_slowdown.clamp(0.0, 1.0) * t
    }
}

/// Counts mobile entities near a worker — the congestion sensor contract.
///
/// Implemented outside this crate (the orchestrator snapshots all worker
/// positions once per tick); workers only consume the resulting counts.
pub trait ProximitySensor {
    /// Number of *other* mobile entities near `position`.
    fn nearby_count(&self, subject: WorkerId, position: Point) -> usize;
}

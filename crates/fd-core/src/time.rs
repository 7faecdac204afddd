//! Outer-loop simulation parameters and time formatting.
//!
//! # Design
//!
//! Simulated time is a monotonically non-decreasing count of **simulated
//! seconds** (`f64`), advanced only by explicit ticks — never by the wall
//! clock.  The clock in `fd-sequencer` integrates it in fixed micro-steps;
//! this module only carries the parameters of the outer tick loop and a
//! formatting helper for human-readable logging.

use std::fmt;

/// Top-level simulation parameters.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimParams {
    /// Simulated seconds handed to the clock and to every worker on each
    /// external tick.
    pub tick_secs: f64,

    /// Total external ticks to run.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl SimParams {
    /// Simulated seconds covered by a full run.
    #[inline]
    pub fn horizon_secs(&self) -> f64 {
        self.tick_secs * self.total_ticks as f64
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            tick_secs:   0.5,
            total_ticks: 0,
            seed:        0,
        }
    }
}

/// Format simulated seconds as `HH:MM:SS` for log output.
///
/// Negative inputs are clamped to zero; fractional seconds are truncated.
pub fn format_hms(secs: f64) -> HmsDisplay {
    HmsDisplay(secs.max(0.0) as u64)
}

pub struct HmsDisplay(u64);

impl fmt::Display for HmsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3_600;
        let m = (self.0 % 3_600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

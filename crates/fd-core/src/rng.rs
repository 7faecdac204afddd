//! Deterministic per-worker RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each worker gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (worker_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive worker IDs uniformly across the seed space.
//! This means:
//!
//! - Workers never share RNG state (no ordering dependency between them).
//! - Adding or removing workers at the end of the fleet does not disturb the
//!   seeds of existing workers — runs stay reproducible as the fleet grows.
//!
//! The only stochastic behavior in the simulation is idle-roam target
//! sampling; everything on the dispatch path is fully deterministic.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::WorkerId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-worker deterministic RNG.
///
/// Create one per worker at setup; the worker owns it for the whole run.
pub struct WorkerRng(SmallRng);

impl WorkerRng {
    /// Seed deterministically from the run's global seed and a worker ID.
    pub fn new(global_seed: u64, worker: WorkerId) -> Self {
        let seed = global_seed ^ (worker.0 as u64).wrapping_mul(MIXING_CONSTANT);
        WorkerRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A point sampled uniformly from the disc of radius `radius_m` around
    /// `center` — the roam-target distribution for idle workers.
    pub fn point_in_disc(&mut self, center: crate::Point, radius_m: f64) -> crate::Point {
        // sqrt keeps the area density uniform rather than clustering at the
        // center.
        let r = radius_m * self.0.gen_range(0.0_f64..=1.0).sqrt();
        let theta = self.0.gen_range(0.0..std::f64::consts::TAU);
        crate::Point::new(center.x + r * theta.cos(), center.y + r * theta.sin())
    }
}

//! `fd-core` — foundational types for the `rust_fd` fleet dispatch simulation.
//!
//! This crate is a dependency of every other `fd-*` crate.  It intentionally
//! has no `fd-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                          |
//! |------------|---------------------------------------------------|
//! | [`ids`]    | `WorkerId`, `NodeId`                              |
//! | [`geo`]    | `Point`, Euclidean distance in the site frame     |
//! | [`time`]   | `SimParams`, elapsed-time formatting              |
//! | [`rng`]    | `WorkerRng` (per-worker deterministic RNG)        |
//! | [`role`]   | `WorkerRole` enum                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod role;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::Point;
pub use ids::{NodeId, WorkerId};
pub use rng::WorkerRng;
pub use role::WorkerRole;
pub use time::SimParams;

//! An accepted transport request.

use fd_core::Point;
use fd_nav::PlannedRoute;

/// A transport task owned by the worker it was assigned to.
///
/// Created by the dispatcher from a fired schedule event plus resolved
/// endpoints; before acceptance it is a transient value, afterwards it lives
/// in exactly one worker's queue until completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Sequence id of the originating schedule event (`id_000`, …).
    pub id: String,

    /// Pickup point, resolved from the event's origin code.
    pub origin: Point,

    /// Drop-off point, resolved from the event's destination code.
    pub destination: Point,

    /// Priority derived from the event's tag; higher displaces lower.
    pub priority: i32,

    /// The origin → destination route driven during the `Traveling` phase.
    pub route: PlannedRoute,

    /// Raw planning ETA recorded at assignment (unpenalized).
    pub planned_eta_secs: f64,
}

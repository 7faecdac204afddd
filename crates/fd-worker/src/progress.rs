//! Polyline walker: incremental movement along a planned route.

use fd_core::Point;
use fd_nav::PlannedRoute;

/// Tracks how far along a route's waypoint polyline a worker has moved.
///
/// Unlike an arrival-tick model, progress is integrated in metres within
/// each tick, so congestion can slow a journey mid-flight.
#[derive(Debug, Clone)]
pub struct RouteProgress {
    waypoints: Vec<Point>,
    /// Index of the waypoint most recently reached.
    leg: usize,
    position: Point,
}

impl RouteProgress {
    pub fn new(route: PlannedRoute) -> Self {
        let position = route.waypoints.first().copied().unwrap_or_default();
        Self {
            waypoints: route.waypoints,
            leg: 0,
            position,
        }
    }

    /// Current interpolated position on the polyline.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The route's final waypoint.
    pub fn destination(&self) -> Point {
        self.waypoints.last().copied().unwrap_or(self.position)
    }

    /// Metres left to the destination.
    pub fn remaining_m(&self) -> f64 {
        if self.is_arrived() {
            return 0.0;
        }
        let mut total = self.position.distance_m(self.waypoints[self.leg + 1]);
        total += self.waypoints[self.leg + 1..]
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .sum::<f64>();
        total
    }

    pub fn is_arrived(&self) -> bool {
        self.leg + 1 >= self.waypoints.len()
    }

    /// Move up to `dist` metres along the polyline.
    ///
    /// Returns `true` once the destination is reached; surplus distance is
    /// discarded (the caller converts it back to time).
    pub fn advance(&mut self, dist: f64) -> bool {
        let mut left = dist;
        while !self.is_arrived() {
            let target = self.waypoints[self.leg + 1];
            let seg_remaining = self.position.distance_m(target);
            if left >= seg_remaining {
                left -= seg_remaining;
                self.position = target;
                self.leg += 1;
            } else {
                self.position = self.position.advance_toward(target, left);
                return false;
            }
        }
        true
    }
}

//! Route-planning trait and the two built-in planners.
//!
//! # Pluggability
//!
//! Workers and the dispatcher call routing via the [`RoutePlanner`] trait,
//! so applications can swap in custom implementations without touching the
//! framework core.  [`LinePlanner`] is the minimal oracle for open floors;
//! [`GraphPlanner`] routes along a [`NavGraph`] lane network.
//!
//! # Cost units
//!
//! All route lengths are in **metres**.  Converting length to time is the
//! workers' concern — planning uses their nominal speed, execution their
//! congestion-adjusted speed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fd_core::{NodeId, Point};

use crate::graph::NavGraph;
use crate::{NavError, NavResult};

// ── PlannedRoute ──────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered waypoint polyline and its total
/// length.
///
/// The first waypoint is the query's `from` point, the last its `to` point;
/// a degenerate query (`from == to`) yields a single waypoint and zero
/// length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedRoute {
    /// Waypoints to traverse in order, from source to destination.
    pub waypoints: Vec<Point>,
    /// Cumulative polyline length in metres.
    pub length_m: f64,
}

impl PlannedRoute {
    /// Build a route from a waypoint polyline, computing the length.
    pub fn from_waypoints(waypoints: Vec<Point>) -> Self {
        let length_m = waypoints
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .sum();
        Self { waypoints, length_m }
    }

    /// `true` if the source and destination coincide.
    pub fn is_trivial(&self) -> bool {
        self.waypoints.len() < 2 || self.length_m == 0.0
    }

    /// Final waypoint — the route's destination.  `None` only for a route
    /// with no waypoints at all.
    pub fn destination(&self) -> Option<Point> {
        self.waypoints.last().copied()
    }
}

// ── RoutePlanner trait ────────────────────────────────────────────────────────

/// The path-planning oracle: two points in, a route and its length out.
///
/// Implementations must be deterministic — the dispatcher's selection and
/// every ETA in the audit trail depend on reproducible answers.
pub trait RoutePlanner {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` is handled as a trivial single-point route rather than
    /// an error; an unreachable destination is [`NavError::NoRoute`].
    fn plan(&self, from: Point, to: Point) -> NavResult<PlannedRoute>;
}

// ── LinePlanner ───────────────────────────────────────────────────────────────

/// Straight-line planner: every pair of points is connected by one segment.
///
/// The minimal oracle for open floors without fixed lanes, and the planner
/// of choice in unit tests, where route length must be readable off the
/// coordinates.
pub struct LinePlanner;

impl RoutePlanner for LinePlanner {
    fn plan(&self, from: Point, to: Point) -> NavResult<PlannedRoute> {
        if from == to {
            return Ok(PlannedRoute { waypoints: vec![from], length_m: 0.0 });
        }
        Ok(PlannedRoute {
            length_m: from.distance_m(to),
            waypoints: vec![from, to],
        })
    }
}

// ── GraphPlanner ──────────────────────────────────────────────────────────────

/// Dijkstra over a [`NavGraph`] lane network.
///
/// Endpoints are snapped to their nearest graph nodes; the emitted polyline
/// is `from → snap(from) → … lane nodes … → snap(to) → to`, so workers leave
/// and rejoin free space at the lane network's edge.
pub struct GraphPlanner {
    graph: NavGraph,
}

impl GraphPlanner {
    pub fn new(graph: NavGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }
}

impl RoutePlanner for GraphPlanner {
    fn plan(&self, from: Point, to: Point) -> NavResult<PlannedRoute> {
        if from == to {
            return Ok(PlannedRoute { waypoints: vec![from], length_m: 0.0 });
        }

        let src = self.graph.snap_to_node(from).ok_or(NavError::EmptyGraph)?;
        let dst = self.graph.snap_to_node(to).ok_or(NavError::EmptyGraph)?;

        let node_path =
            dijkstra(&self.graph, src, dst).ok_or(NavError::NoRoute { from, to })?;

        // Polyline: free-space approach, lane nodes, free-space egress.
        // Skip duplicated endpoints when the snap is exact.
        let mut waypoints = Vec::with_capacity(node_path.len() + 2);
        waypoints.push(from);
        for node in node_path {
            let pos = self.graph.node_pos[node.index()];
            if waypoints.last() != Some(&pos) {
                waypoints.push(pos);
            }
        }
        if waypoints.last() != Some(&to) {
            waypoints.push(to);
        }

        Ok(PlannedRoute::from_waypoints(waypoints))
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Ordered heap key: length in micrometres so the binary heap orders on an
/// integer.  Secondary key `NodeId` gives deterministic tie-breaking.
#[inline]
fn cost_key(length_m: f64) -> u64 {
    (length_m * 1_000_000.0) as u64
}

/// Shortest node path by edge length, or `None` when `to` is unreachable.
fn dijkstra(graph: &NavGraph, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
    if from == to {
        return Some(vec![from]);
    }

    let n = graph.node_count();
    let mut dist = vec![u64::MAX; n];
    // prev[v] = node that reached v; NodeId::INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(prev, from, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for e in graph.out_edges(node) {
            let neighbor = graph.edge_to[e];
            let new_cost = cost.saturating_add(cost_key(graph.edge_length_m[e]));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    None
}

fn reconstruct(prev: Vec<NodeId>, from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        path.push(cur);
    }
    path.reverse();
    path
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest-path search over networks made of polyline edges.
//!
//! Edges (e.g. road or footpath polylines) connect wherever their extremities meet,
//! forming an implicit graph. [Router] snaps arbitrary start and end positions onto that
//! graph and runs a best-first (A*) search with weighted edge costs and per-edge
//! traversal directions, as described by a [CostModel]. The search never monopolizes
//! the caller: it advances in bounded slices through [Router::tick], and can be paused,
//! resumed and inspected for the best-so-far way in between.
//!
//! Networks can be built by hand, or loaded from [OpenStreetMap](https://www.openstreetmap.org/)
//! data with the [osm] module, whose [profiles](crate::osm::Profile) double as cost models.
//!
//! # Example
//!
//! ```
//! use polyroute::{Edge, Network, Point, UniformCost};
//!
//! let mut network = Network::default();
//! network.add_edge(Edge::new(1, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]));
//! network.add_edge(Edge::new(2, vec![Point::new(10.0, 0.0), Point::new(10.0, 10.0)]));
//!
//! let route = polyroute::find_route(
//!     &network,
//!     UniformCost,
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     polyroute::Config::default(),
//! )
//! .expect("failed to find route");
//!
//! assert_eq!(route.edges.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
//! assert_eq!(route.distance, 20.0);
//! ```

use std::collections::HashMap;

mod cost;
mod geometry;
mod kd;
mod network;
pub mod osm;
mod search;

pub use cost::{CostModel, UniformCost};
pub use geometry::{approx_eq, distance, distance_to_polyline, distance_to_segment, polyline_length};
pub use kd::KDTree;
pub use network::{EdgeSource, Network};
pub use search::{
    find_route, Config, Event, PathError, Route, Router, Status, DEFAULT_EPSILON,
    DEFAULT_MAX_ITERATION, DEFAULT_STEP_ITERATION,
};

/// A position in the planar coordinate space shared by all [Edges](Edge) of a network.
///
/// The router never reprojects coordinates - callers working with geographic data
/// are responsible for choosing a suitable projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which traversals of an [Edge] are permitted, relative to the order of its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The edge can't be used at all.
    Blocked,

    /// The edge can only be traversed from its first point towards its last point.
    Forward,

    /// The edge can only be traversed from its last point towards its first point.
    Backward,

    /// The edge can be traversed both ways.
    #[default]
    Both,
}

impl Direction {
    /// Builds a direction out of two flags: whether the edge can be traversed
    /// first-to-last, and whether it can be traversed last-to-first.
    pub fn from_flags(forward: bool, backward: bool) -> Self {
        match (forward, backward) {
            (true, true) => Self::Both,
            (true, false) => Self::Forward,
            (false, true) => Self::Backward,
            (false, false) => Self::Blocked,
        }
    }

    #[inline]
    pub fn allows_forward(self) -> bool {
        matches!(self, Self::Forward | Self::Both)
    }

    #[inline]
    pub fn allows_backward(self) -> bool {
        matches!(self, Self::Backward | Self::Both)
    }
}

/// Represents a single polyline of a network.
///
/// Two edges are connected if one of the extremities (first or last point)
/// of the first edge lies on one of the extremities of the second edge. Points in the
/// middle of the geometry never connect to anything.
///
/// `id` identifies the edge for the caller and doesn't need to be unique - e.g. edges
/// cut out of a single OpenStreetMap way all share the id of that way. `tags` carry
/// arbitrary attributes for [cost models](CostModel).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edge {
    pub id: i64,
    pub geometry: Vec<Point>,
    pub tags: HashMap<String, String>,
}

impl Edge {
    /// Creates an untagged edge.
    pub fn new(id: i64, geometry: Vec<Point>) -> Self {
        Self {
            id,
            geometry,
            tags: HashMap::default(),
        }
    }

    /// Creates an edge with the provided tags.
    pub fn with_tags(id: i64, geometry: Vec<Point>, tags: HashMap<String, String>) -> Self {
        Self { id, geometry, tags }
    }

    /// The first point of the geometry. Returns [Point::default] for empty geometries.
    pub fn first(&self) -> Point {
        self.geometry.first().cloned().unwrap_or_default()
    }

    /// The last point of the geometry. Returns [Point::default] for empty geometries.
    pub fn last(&self) -> Point {
        self.geometry.last().cloned().unwrap_or_default()
    }

    /// Length of the whole geometry.
    pub fn length(&self) -> f64 {
        polyline_length(&self.geometry)
    }
}

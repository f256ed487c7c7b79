// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, Point};

/// Result of a finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<'a> {
    /// Edges to follow from the start to the end, in order.
    /// Empty if there is no route, or if the start and end are the same node.
    pub edges: Vec<&'a Edge>,

    /// Sum of `length * weight` over all edges of the route,
    /// or [f64::INFINITY] if there is no route.
    pub weighted_distance: f64,

    /// Sum of `length` over all edges of the route,
    /// or [f64::INFINITY] if there is no route.
    pub distance: f64,
}

impl<'a> Route<'a> {
    pub(super) fn not_found() -> Self {
        Self {
            edges: vec![],
            weighted_distance: f64::INFINITY,
            distance: f64::INFINITY,
        }
    }

    pub(super) fn empty() -> Self {
        Self {
            edges: vec![],
            weighted_distance: 0.0,
            distance: 0.0,
        }
    }

    /// Returns `true` if the end was reached.
    pub fn is_found(&self) -> bool {
        self.weighted_distance.is_finite()
    }
}

/// Progress notifications produced by [Router::tick](crate::Router::tick).
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// A search has begun between the snapped start and end positions.
    Start { start: Point, end: Point },

    /// A slice of the search was completed and more work is pending.
    /// `expanded` counts nodes expanded since the search was started or last resumed.
    Calculating { expanded: usize },

    /// The search was paused, either explicitly (`overflow == false`), or because
    /// [Config::max_iteration](crate::Config::max_iteration) was reached (`overflow == true`).
    /// [Router::resume](crate::Router::resume) continues the search.
    Pause { overflow: bool },

    /// The search is over.
    Finish(Route<'a>),
}

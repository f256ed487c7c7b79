// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Direction, Edge};

/// Describes how expensive, and whether at all, traversing an [Edge] is.
///
/// The cost of traversing an edge is `length(edge) * weight(edge)`.
///
/// The search uses the straight-line distance to the destination multiplied by
/// [CostModel::min_weight] as its heuristic. This is only a lower bound (and thus
/// guarantees shortest routes) if `min_weight` is never greater than anything
/// [CostModel::weight] returns, and `length` is never shorter than the straight-line
/// distance between the edge's extremities. Violating either condition results in
/// routes which might not be the cheapest.
pub trait CostModel {
    /// Multiplier of the edge's length, in the (0, 1] range. 1 means no penalty,
    /// lower values make the edge "faster".
    fn weight(&self, _edge: &Edge) -> f64 {
        1.0
    }

    /// Lower bound of all values returned by [CostModel::weight].
    fn min_weight(&self) -> f64 {
        1.0
    }

    /// Which traversals of the edge are allowed.
    fn direction(&self, _edge: &Edge) -> Direction {
        Direction::Both
    }

    /// Base distance of the edge, by default the length of its geometry.
    fn length(&self, edge: &Edge) -> f64 {
        edge.length()
    }
}

/// [CostModel] with all the defaults: every edge is traversable both ways,
/// and costs exactly its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UniformCost;

impl CostModel for UniformCost {}

impl<C: CostModel + ?Sized> CostModel for &C {
    fn weight(&self, edge: &Edge) -> f64 {
        (**self).weight(edge)
    }

    fn min_weight(&self) -> f64 {
        (**self).min_weight()
    }

    fn direction(&self, edge: &Edge) -> Direction {
        (**self).direction(edge)
    }

    fn length(&self, edge: &Edge) -> f64 {
        (**self).length(edge)
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{distance, Edge, Point};

/// Index of a [Node] in its [NodeRegistry].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

/// A vertex of the implicit graph, materialized during a single search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Node<'a> {
    pub at: Point,

    /// Raw distance from the start along the best known path.
    pub dist: f64,

    /// Weighted distance from the start along the best known path.
    /// Only `None` for the arrival node before it is first reached.
    pub wdist: Option<f64>,

    /// Last edge of the best known path.
    pub from: Option<&'a Edge>,

    /// Previous node of the best known path.
    pub prev: Option<NodeId>,
}

/// Set of [Nodes](Node) uniquely identified by their position, up to `epsilon`.
///
/// Positions are bucketed into a grid of cells at least `epsilon` wide, so that any node
/// within `epsilon` of a position lies in the position's cell or one of its 8 neighbors.
#[derive(Debug, Clone)]
pub(crate) struct NodeRegistry<'a> {
    nodes: Vec<Node<'a>>,
    cells: HashMap<(i64, i64), Vec<NodeId>>,
    epsilon: f64,
    cell_size: f64,
}

/// Smallest width of a [NodeRegistry] cell, used when `epsilon` is zero or tiny.
const MIN_CELL_SIZE: f64 = 1e-9;

impl<'a> NodeRegistry<'a> {
    pub fn new(epsilon: f64) -> Self {
        Self {
            nodes: Vec::default(),
            cells: HashMap::default(),
            epsilon,
            cell_size: epsilon.max(MIN_CELL_SIZE),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }

    fn cell(&self, at: Point) -> (i64, i64) {
        // Float-to-int casts saturate, which only degrades bucketing of absurd coordinates
        (
            (at.x / self.cell_size).floor() as i64,
            (at.y / self.cell_size).floor() as i64,
        )
    }

    /// Finds the node at most `epsilon` away from `at`.
    /// If there are multiple such nodes, the earliest inserted one is returned.
    pub fn lookup(&self, at: Point) -> Option<NodeId> {
        let (cx, cy) = self.cell(at);
        let mut found: Option<NodeId> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                for &id in self.cells.get(&key).map(|v| v.as_slice()).unwrap_or_default() {
                    if distance(self.get(id).at, at) <= self.epsilon
                        && found.map_or(true, |f| id < f)
                    {
                        found = Some(id);
                    }
                }
            }
        }

        found
    }

    fn insert(&mut self, node: Node<'a>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let key = self.cell(node.at);
        self.nodes.push(node);
        self.cells.entry(key).or_default().push(id);
        id
    }

    /// Ensures a node without a predecessor exists at `at`. Used for the start
    /// (`wdist == Some(0.0)`) and arrival (`wdist == None`) nodes.
    /// An existing node at that position is returned untouched.
    pub fn seed(&mut self, at: Point, wdist: Option<f64>) -> NodeId {
        if let Some(id) = self.lookup(at) {
            return id;
        }

        self.insert(Node {
            at,
            dist: if wdist.is_some() { 0.0 } else { f64::INFINITY },
            wdist,
            from: None,
            prev: None,
        })
    }

    /// Records that `at` can be reached with the weighted distance `wdist` (and raw
    /// distance `dist`) by following `via` from `prev`.
    ///
    /// If a node at `at` already has a `wdist` not greater than the provided one, nothing
    /// changes and `None` is returned. Otherwise, the existing node is updated in place
    /// (or a new one is created) and its id is returned - the node becomes a new
    /// candidate for expansion.
    pub fn upsert(
        &mut self,
        at: Point,
        wdist: f64,
        dist: f64,
        via: &'a Edge,
        prev: NodeId,
    ) -> Option<NodeId> {
        let node = Node {
            at,
            dist,
            wdist: Some(wdist),
            from: Some(via),
            prev: Some(prev),
        };

        match self.lookup(at) {
            Some(id) => {
                let existing = &mut self.nodes[id.0];
                if existing.wdist.is_some_and(|known| known <= wdist) {
                    return None;
                }

                // Keep the originally registered position as the node's identity
                existing.dist = node.dist;
                existing.wdist = node.wdist;
                existing.from = node.from;
                existing.prev = node.prev;
                Some(id)
            }

            None => Some(self.insert(node)),
        }
    }

    /// Walks the predecessor chain of a node, returning the edges which
    /// lead to it from its root, oldest first.
    pub fn route_to(&self, id: NodeId) -> Vec<&'a Edge> {
        let mut route = Vec::default();
        let mut current = self.get(id);

        while let (Some(edge), Some(prev)) = (current.from, current.prev) {
            route.push(edge);
            current = self.get(prev);

            if route.len() > self.nodes.len() {
                log::error!("cycle in the predecessor chain of node {:?}", id);
                break;
            }
        }

        route.reverse();
        return route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_with_tolerance() {
        let mut r = NodeRegistry::new(1e-6);
        let a = r.seed(Point::new(1.0, 1.0), Some(0.0));
        let b = r.seed(Point::new(2.0, 1.0), None);

        assert_eq!(r.lookup(Point::new(1.0, 1.0)), Some(a));
        assert_eq!(r.lookup(Point::new(1.0 + 5e-7, 1.0 - 5e-7)), Some(a));
        assert_eq!(r.lookup(Point::new(2.0 - 9e-7, 1.0)), Some(b));
        assert_eq!(r.lookup(Point::new(1.0, 1.00001)), None);
        assert_eq!(r.len(), 2);

        // Seeding at a known position re-uses the node
        assert_eq!(r.seed(Point::new(1.0, 1.0 + 1e-7), None), a);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn lookup_across_cell_boundary() {
        let mut r = NodeRegistry::new(0.5);
        let a = r.seed(Point::new(0.99, 0.99), Some(0.0));
        assert_eq!(r.lookup(Point::new(1.01, 1.01)), Some(a));
        assert_eq!(r.lookup(Point::new(-0.01, 0.5)), None);
    }

    #[test]
    fn zero_epsilon_keeps_separate_cells() {
        let mut r = NodeRegistry::new(0.0);
        let a = r.seed(Point::new(0.0, 0.0), Some(0.0));
        let b = r.seed(Point::new(1.0, 0.0), None);
        let c = r.seed(Point::new(2.0, 3.0), None);

        assert_eq!(r.cells.len(), 3);
        assert_eq!(r.lookup(Point::new(0.0, 0.0)), Some(a));
        assert_eq!(r.lookup(Point::new(1.0, 0.0)), Some(b));
        assert_eq!(r.lookup(Point::new(2.0, 3.0)), Some(c));
        assert_eq!(r.lookup(Point::new(1.0, 1e-12)), None);
    }

    #[test]
    fn upsert_relaxes_only_cheaper() {
        let e1 = Edge::new(1, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let e2 = Edge::new(2, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);

        let mut r = NodeRegistry::new(1e-6);
        let start = r.seed(Point::new(0.0, 0.0), Some(0.0));
        let end = r.seed(Point::new(1.0, 0.0), None);

        // Arrival node is always relaxed on the first visit
        assert_eq!(r.upsert(Point::new(1.0, 0.0), 5.0, 1.0, &e1, start), Some(end));
        assert_eq!(r.get(end).wdist, Some(5.0));

        // Not cheaper
        assert_eq!(r.upsert(Point::new(1.0, 0.0), 5.0, 1.0, &e2, start), None);
        assert_eq!(r.upsert(Point::new(1.0, 0.0), 6.0, 1.0, &e2, start), None);
        assert_eq!(r.get(end).from.map(|e| e.id), Some(1));

        // Cheaper
        assert_eq!(r.upsert(Point::new(1.0, 1e-7), 4.0, 1.0, &e2, start), Some(end));
        let node = r.get(end);
        assert_eq!(node.wdist, Some(4.0));
        assert_eq!(node.from.map(|e| e.id), Some(2));
        assert_eq!(node.at, Point::new(1.0, 0.0));

        // New node
        let c = r.upsert(Point::new(3.0, 0.0), 9.0, 3.0, &e1, end);
        assert!(c.is_some());
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn route_to() {
        let e1 = Edge::new(1, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let e2 = Edge::new(2, vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);

        let mut r = NodeRegistry::new(1e-6);
        let a = r.seed(Point::new(0.0, 0.0), Some(0.0));
        let b = r.upsert(Point::new(1.0, 0.0), 1.0, 1.0, &e1, a).unwrap();
        let c = r.upsert(Point::new(2.0, 0.0), 2.0, 2.0, &e2, b).unwrap();

        let ids: Vec<i64> = r.route_to(c).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(r.route_to(a).is_empty());
    }
}

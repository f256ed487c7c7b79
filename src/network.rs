// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cell::OnceCell;

use crate::{distance_to_polyline, Edge, KDTree, Point};

/// Collection of [Edges](Edge) which can be searched by the [Router](crate::Router).
pub trait EdgeSource {
    /// Returns all edges with an extremity (first or last point) at most `epsilon` away
    /// from `at`. The order of returned edges must be deterministic, as it decides
    /// which of multiple equally-good routes is returned.
    fn edges_touching(&self, at: Point, epsilon: f64) -> Vec<&Edge>;

    /// Returns the edge closest to `at`, or `None` if there are no edges.
    fn closest_edge(&self, at: Point) -> Option<&Edge>;
}

/// In-memory [EdgeSource] backed by a vector of [Edges](Edge),
/// with a [KDTree] over edge extremities.
#[derive(Debug, Default, Clone)]
pub struct Network {
    edges: Vec<Edge>,
    extremities: OnceCell<Option<KDTree>>,
}

impl Network {
    /// Creates a network out of the provided edges, skipping invalid ones
    /// (see [Network::add_edge]).
    pub fn from_edges<I: IntoIterator<Item = Edge>>(edges: I) -> Self {
        let mut n = Self::default();
        for edge in edges {
            n.add_edge(edge);
        }
        n
    }

    /// Returns the number of edges in the network.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the network has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns an iterator over all [Edges](Edge), in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Retrieves the `index`-th added [Edge].
    pub fn get(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Appends an [Edge] to the network.
    ///
    /// Edges with less than two points are unusable for routing; such edges are
    /// discarded and `false` is returned.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.geometry.len() < 2 {
            log::warn!(
                "discarding edge {} with {} point(s)",
                edge.id,
                edge.geometry.len()
            );
            return false;
        }

        self.edges.push(edge);
        self.extremities = OnceCell::new();
        true
    }

    fn extremities(&self) -> Option<&KDTree> {
        self.extremities
            .get_or_init(|| {
                let mut points = self
                    .edges
                    .iter()
                    .enumerate()
                    .flat_map(|(idx, e)| [(e.first(), idx), (e.last(), idx)])
                    .collect::<Vec<_>>();
                KDTree::build(&mut points)
            })
            .as_ref()
    }
}

impl EdgeSource for Network {
    fn edges_touching(&self, at: Point, epsilon: f64) -> Vec<&Edge> {
        let mut indices = match self.extremities() {
            Some(tree) => tree.find_within(at, epsilon),
            None => return vec![],
        };

        // Both extremities of short or closed edges might match
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|idx| &self.edges[idx]).collect()
    }

    /// Finds the [Edge] with the closest point to `at`; ties are resolved in favor
    /// of the earliest added edge.
    ///
    /// This function requires computing the distance to every [Edge] in the network,
    /// and is not suitable for large networks.
    fn closest_edge(&self, at: Point) -> Option<&Edge> {
        self.edges
            .iter()
            .map(|e| (distance_to_polyline(at, &e.geometry), e))
            .fold(None, |best: Option<(f64, &Edge)>, (dist, e)| match best {
                Some((best_dist, _)) if best_dist <= dist => best,
                _ => Some((dist, e)),
            })
            .map(|(_, e)| e)
    }
}

impl FromIterator<Edge> for Network {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::from_edges(iter)
    }
}

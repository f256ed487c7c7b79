// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::ptr;

use super::queue::{Candidate, CandidateQueue};
use super::registry::{NodeId, NodeRegistry};
use super::{Config, Route};
use crate::{approx_eq, distance, CostModel, Edge, EdgeSource, Point};

/// Outcome of [SearchState::run_slice].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Slice {
    /// `step_iteration` nodes were expanded and there's more work to do.
    Yield,

    /// The expansion budget granted at the start or by the last resume is used up.
    Overflow,

    /// No candidate can improve the route to the arrival node.
    Exhausted,
}

/// Everything a single search run owns: the nodes materialized so far,
/// the frontier and the expansion budget.
#[derive(Debug, Clone)]
pub(super) struct SearchState<'a> {
    registry: NodeRegistry<'a>,
    queue: CandidateQueue,
    end: Point,
    arrival: NodeId,
    min_weight: f64,
    epsilon: f64,

    /// Nodes expanded since the start or the last resume.
    pub expanded: usize,
    budget: usize,
}

impl<'a> SearchState<'a> {
    pub fn new(start: Point, end: Point, min_weight: f64, epsilon: f64, budget: usize) -> Self {
        let mut registry = NodeRegistry::new(epsilon);
        let arrival = registry.seed(end, None);
        let origin = registry.seed(start, Some(0.0));

        let mut queue = CandidateQueue::default();
        queue.push(origin, 0.0, distance(start, end) * min_weight);

        Self {
            registry,
            queue,
            end,
            arrival,
            min_weight,
            epsilon,
            expanded: 0,
            budget,
        }
    }

    /// Grants a new expansion budget. At least one node is always expanded
    /// after a resume, so that resuming can't stall the search.
    pub fn resume(&mut self, budget: usize) {
        self.expanded = 0;
        self.budget = budget.max(1);
    }

    /// Best known weighted distance to the arrival node.
    pub fn arrival_wdist(&self) -> Option<f64> {
        self.registry.get(self.arrival).wdist
    }

    pub fn has_candidates(&self) -> bool {
        self.queue.iter().any(|c| !self.is_outdated(c))
    }

    fn is_outdated(&self, c: &Candidate) -> bool {
        self.registry
            .get(c.node)
            .wdist
            .map_or(true, |current| c.wdist > current)
    }

    /// Expands nodes until the slice, or the whole budget, is used up,
    /// or until the search is over.
    pub fn run_slice<S: EdgeSource + ?Sized, C: CostModel>(
        &mut self,
        edges: &'a S,
        cost: &C,
        config: &Config,
    ) -> Slice {
        let mut in_slice: usize = 0;

        loop {
            let candidate = match self.queue.peek() {
                Some(c) => c,
                None => return Slice::Exhausted,
            };

            if self.is_outdated(&candidate) {
                self.queue.pop();
                continue;
            }

            // The candidate has the lowest score - and the score is a lower bound,
            // so no candidate can improve the known route.
            if self.arrival_wdist().is_some_and(|best| candidate.score > best) {
                return Slice::Exhausted;
            }

            if self.expanded >= self.budget {
                return Slice::Overflow;
            }

            if in_slice >= config.step_iteration {
                return Slice::Yield;
            }

            self.queue.pop();
            self.expand(candidate, edges, cost);
            self.expanded += 1;
            in_slice += 1;
        }
    }

    fn expand<S: EdgeSource + ?Sized, C: CostModel>(
        &mut self,
        candidate: Candidate,
        edges: &'a S,
        cost: &C,
    ) {
        let node = *self.registry.get(candidate.node);

        for edge in edges.edges_touching(node.at, self.epsilon) {
            if node.from.is_some_and(|from| ptr::eq(from, edge)) {
                continue;
            }

            let direction = cost.direction(edge);
            let forward =
                direction.allows_forward() && approx_eq(node.at, edge.first(), self.epsilon);
            let backward =
                direction.allows_backward() && approx_eq(node.at, edge.last(), self.epsilon);
            if !forward && !backward {
                continue;
            }

            let length = cost.length(edge);
            let step = length * cost.weight(edge);
            if !(length >= 0.0 && step >= 0.0 && step.is_finite()) {
                log::warn!(
                    "skipping edge {} with invalid cost (length {}, weighted {})",
                    edge.id,
                    length,
                    step
                );
                continue;
            }

            let wdist = candidate.wdist + step;
            let dist = node.dist + length;
            if forward {
                self.relax(edge.last(), wdist, dist, edge, candidate.node);
            }
            if backward {
                self.relax(edge.first(), wdist, dist, edge, candidate.node);
            }
        }
    }

    fn relax(&mut self, at: Point, wdist: f64, dist: f64, via: &'a Edge, prev: NodeId) {
        if let Some(id) = self.registry.upsert(at, wdist, dist, via, prev) {
            let h = distance(self.registry.get(id).at, self.end) * self.min_weight;
            self.queue.push(id, wdist, wdist + h);
        }
    }

    /// Returns the way to the candidate furthest away from the start (by weighted distance),
    /// for displaying progress of a running search.
    pub fn best_way(&self) -> Vec<&'a Edge> {
        self.queue
            .iter()
            .filter(|c| !self.is_outdated(c))
            .max_by(|a, b| a.wdist.total_cmp(&b.wdist).then_with(|| b.seq.cmp(&a.seq)))
            .map(|c| self.registry.route_to(c.node))
            .unwrap_or_default()
    }

    /// Builds the route to the arrival node from the current state.
    pub fn route(&self) -> Route<'a> {
        let arrival = self.registry.get(self.arrival);
        match arrival.wdist {
            Some(wdist) => Route {
                edges: self.registry.route_to(self.arrival),
                weighted_distance: wdist,
                distance: arrival.dist,
            },
            None => Route::not_found(),
        }
    }

    pub fn nodes(&self) -> usize {
        self.registry.len()
    }
}

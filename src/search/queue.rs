// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::registry::NodeId;

/// An entry of the [CandidateQueue]: a node waiting for expansion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub node: NodeId,

    /// Weighted distance of the node at the time it was pushed.
    pub wdist: f64,

    /// `wdist` plus a lower bound of the weighted distance to the destination.
    pub score: f64,

    /// Insertion order, used for breaking ties.
    pub seq: u64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores (and earlier insertions) are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Frontier of the search, popping candidates with the lowest score first.
///
/// Contrary to the textbook definition, a node may have multiple entries in the queue.
/// Entries with a `wdist` greater than the node's current `wdist` are outdated
/// and must be skipped by the caller.
#[derive(Debug, Clone, Default)]
pub(crate) struct CandidateQueue {
    heap: BinaryHeap<Candidate>,
    next_seq: u64,
}

impl CandidateQueue {
    pub fn push(&mut self, node: NodeId, wdist: f64, score: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Candidate {
            node,
            wdist,
            score,
            seq,
        });
    }

    pub fn peek(&self) -> Option<Candidate> {
        self.heap.peek().cloned()
    }

    pub fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop()
    }

    /// Iterates over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.heap.iter()
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{distance, Point};

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree)
/// over points tagged with an arbitrary `usize` (in a [Network](crate::Network) - the index
/// of the edge a point is an extremity of). It answers "what lies within a given distance
/// of this position" queries without checking every point.
///
/// Points equal on the splitting axis may land on either side of a pivot,
/// so both branches are searched whenever the query circle touches the axis.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: (Point, usize),
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Returns tags of all points at most `radius` away from `at`, in no particular order.
    pub fn find_within(&self, at: Point, radius: f64) -> Vec<usize> {
        let mut found = Vec::default();
        self.find_within_impl(at, radius, false, &mut found);
        found
    }

    fn find_within_impl(&self, at: Point, radius: f64, y_divides: bool, found: &mut Vec<usize>) {
        let (pivot, tag) = self.pivot;
        if distance(at, pivot) <= radius {
            found.push(tag);
        }

        let delta = if y_divides {
            at.y - pivot.y
        } else {
            at.x - pivot.x
        };

        if let Some(ref branch) = self.left {
            if delta <= radius {
                branch.find_within_impl(at, radius, !y_divides, found);
            }
        }

        if let Some(ref branch) = self.right {
            if delta >= -radius {
                branch.find_within_impl(at, radius, !y_divides, found);
            }
        }
    }

    /// Builds a k-d tree from a mutable slice of tagged points. Points will be reordered
    /// in the slice to facilitate building the tree.
    pub fn build(points: &mut [(Point, usize)]) -> Option<Self> {
        Self::build_impl(points, false)
    }

    fn build_impl(points: &mut [(Point, usize)], y_divides: bool) -> Option<Self> {
        match points.len() {
            0 => None,
            1 => Some(Self {
                pivot: points[0],
                left: None,
                right: None,
            }),
            _ => {
                if y_divides {
                    points.sort_by(|a, b| a.0.y.total_cmp(&b.0.y));
                } else {
                    points.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));
                }
                let median = points.len() / 2;
                let pivot = points[median];
                let (left, right_and_pivot) = points.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !y_divides).map(Box::new),
                    right: Self::build_impl(right, !y_divides).map(Box::new),
                })
            }
        }
    }
}

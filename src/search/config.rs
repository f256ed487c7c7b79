// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Default number of node expansions the [Router](crate::Router) may perform
/// before pausing with an overflow. See [Config::max_iteration].
pub const DEFAULT_MAX_ITERATION: usize = 20_000;

/// Default number of node expansions performed by a single [Router::tick](crate::Router::tick).
pub const DEFAULT_STEP_ITERATION: usize = 2_000;

/// Default distance under which two positions are considered to be the same node.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Tuning knobs of the [Router](crate::Router).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Limits how many nodes may be expanded before the search pauses itself with
    /// [Event::Pause](crate::Event::Pause) `{ overflow: true }`. Concluding that no route exists
    /// requires expanding all nodes accessible from the start, which can take very long on large
    /// networks. Every [Router::resume](crate::Router::resume) grants a fresh budget.
    pub max_iteration: usize,

    /// How many nodes are expanded in a single [Router::tick](crate::Router::tick)
    /// before control is returned to the caller. Zero is treated as one.
    pub step_iteration: usize,

    /// Positions closer than this are considered the same node.
    /// Must be a finite, non-negative number, otherwise [DEFAULT_EPSILON] is used.
    pub epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iteration: DEFAULT_MAX_ITERATION,
            step_iteration: DEFAULT_STEP_ITERATION,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Config {
    /// Replaces unusable values with ones the search can work with.
    pub(super) fn sanitized(self) -> Self {
        let mut c = self;

        if c.step_iteration == 0 {
            log::warn!("step_iteration of 0 is not allowed, using 1 instead");
            c.step_iteration = 1;
        }

        if !c.epsilon.is_finite() || c.epsilon < 0.0 {
            log::warn!(
                "invalid epsilon {}, using {} instead",
                c.epsilon,
                DEFAULT_EPSILON
            );
            c.epsilon = DEFAULT_EPSILON;
        }

        c
    }
}

/// Error conditions which may occur when starting a search with [Router::path](crate::Router::path)
/// or when running [find_route](crate::find_route).
///
/// The absence of a route is not an error - it is reported as an empty [Route](crate::Route).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A search is already running on this router.
    #[error("a search is already running")]
    Busy,

    /// There are no edges to snap the start or end positions onto.
    #[error("network has no edges")]
    EmptyNetwork,

    /// Route search has exceeded its limit of node expansions.
    /// Either the positions are really far apart, or no route exists.
    #[error("iteration limit exceeded")]
    IterationLimitExceeded,
}

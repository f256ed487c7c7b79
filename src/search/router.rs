// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;

use super::state::{SearchState, Slice};
use super::{Config, Event, PathError, Route};
use crate::{approx_eq, distance, CostModel, Edge, EdgeSource, Point};

/// Lifecycle of a [Router].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// No search is in progress; [Router::path] can be called.
    #[default]
    Idle,

    /// A search is in progress and advances with every [Router::tick].
    Running,

    /// A search was paused and can be continued with [Router::resume].
    Paused,
}

/// Finds least-cost routes over an [EdgeSource] with the
/// [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm).
///
/// The router never blocks for longer than [Config::step_iteration] node expansions:
/// after a search is started with [Router::path], the caller repeatedly calls
/// [Router::tick] (e.g. from an event loop) until an [Event::Finish] or an
/// [Event::Pause] is returned. Between ticks the search may be paused, resumed,
/// or inspected with [Router::best_way].
///
/// ```
/// use polyroute::{Edge, Event, Network, Point, Router, UniformCost};
///
/// let network = Network::from_edges([
///     Edge::new(1, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]),
///     Edge::new(2, vec![Point::new(10.0, 0.0), Point::new(10.0, 10.0)]),
/// ]);
///
/// let mut router = Router::new(&network, UniformCost);
/// router.path(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap();
///
/// let route = loop {
///     match router.tick() {
///         Some(Event::Finish(route)) => break route,
///         Some(_) => {}
///         None => unreachable!("search stopped without finishing"),
///     }
/// };
///
/// assert_eq!(route.weighted_distance, 20.0);
/// ```
#[derive(Debug)]
pub struct Router<'a, S: EdgeSource + ?Sized, C: CostModel> {
    edges: &'a S,
    cost: C,
    config: Config,
    status: Status,
    search: Option<SearchState<'a>>,
    events: VecDeque<Event<'a>>,
    finished: Vec<&'a Edge>,
}

impl<'a, S: EdgeSource + ?Sized, C: CostModel> Router<'a, S, C> {
    /// Creates a router with the [default](Config::default) configuration.
    pub fn new(edges: &'a S, cost: C) -> Self {
        Self::with_config(edges, cost, Config::default())
    }

    pub fn with_config(edges: &'a S, cost: C, config: Config) -> Self {
        Self {
            edges,
            cost,
            config: config.sanitized(),
            status: Status::Idle,
            search: None,
            events: VecDeque::default(),
            finished: Vec::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cost_model(&self) -> &C {
        &self.cost
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Starts a search from `start` to `end`, returning the snapped start and end positions.
    ///
    /// Both positions are snapped onto the closer extremity of their
    /// [closest edge](EdgeSource::closest_edge). Any previous (e.g. paused) search is discarded.
    /// The search itself doesn't advance until [Router::tick] is called; the first tick
    /// returns [Event::Start].
    ///
    /// If both positions snap onto the same node, no search is performed and the
    /// next ticks return [Event::Start] and an [Event::Finish] with an empty route.
    ///
    /// Fails with [PathError::Busy] if a search is [running](Status::Running),
    /// and with [PathError::EmptyNetwork] if there's nothing to snap onto.
    pub fn path(&mut self, start: Point, end: Point) -> Result<(Point, Point), PathError> {
        if self.status == Status::Running {
            return Err(PathError::Busy);
        }

        self.search = None;
        self.status = Status::Idle;
        self.events.clear();
        self.finished.clear();

        let start = self.snap(start)?;
        let end = self.snap(end)?;
        self.events.push_back(Event::Start { start, end });

        if approx_eq(start, end, self.config.epsilon) {
            log::debug!("start and end snap onto the same node {:?}", start);
            self.events.push_back(Event::Finish(Route::empty()));
            return Ok((start, end));
        }

        log::debug!(
            "starting search from {:?} to {:?} (straight-line distance {})",
            start,
            end,
            distance(start, end)
        );
        self.search = Some(SearchState::new(
            start,
            end,
            self.cost.min_weight(),
            self.config.epsilon,
            self.config.max_iteration,
        ));
        self.status = Status::Running;
        Ok((start, end))
    }

    /// Returns the extremity of the closest edge which is closer to `at`.
    fn snap(&self, at: Point) -> Result<Point, PathError> {
        let edge = self
            .edges
            .closest_edge(at)
            .ok_or(PathError::EmptyNetwork)?;

        let (first, last) = (edge.first(), edge.last());
        if distance(at, first) <= distance(at, last) {
            Ok(first)
        } else {
            Ok(last)
        }
    }

    /// Advances the search.
    ///
    /// Pending notifications ([Event::Start], [Event::Pause] caused by [Router::pause],
    /// the [Event::Finish] of a same-node search) are returned first. Otherwise, if the search
    /// is running, up to [Config::step_iteration] nodes are expanded, and
    /// [Event::Calculating], [Event::Pause] (on overflow) or [Event::Finish] is returned.
    ///
    /// Returns `None` if there's nothing to do - when idle or paused.
    pub fn tick(&mut self) -> Option<Event<'a>> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }

        if self.status != Status::Running {
            return None;
        }

        let search = self.search.as_mut()?;
        let event = match search.run_slice(self.edges, &self.cost, &self.config) {
            Slice::Yield => {
                log::trace!(
                    "expanded {} nodes, {} materialized",
                    search.expanded,
                    search.nodes()
                );
                Event::Calculating {
                    expanded: search.expanded,
                }
            }

            Slice::Overflow => {
                log::debug!(
                    "search paused after exceeding {} expansions",
                    self.config.max_iteration
                );
                self.status = Status::Paused;
                Event::Pause { overflow: true }
            }

            Slice::Exhausted => Event::Finish(self.finish()),
        };

        Some(event)
    }

    fn finish(&mut self) -> Route<'a> {
        let route = match self.search.take() {
            Some(search) => {
                let route = search.route();
                log::debug!(
                    "search finished with {} nodes: {} edges, weighted distance {}",
                    search.nodes(),
                    route.edges.len(),
                    route.weighted_distance
                );
                route
            }
            None => Route::not_found(),
        };

        self.status = Status::Idle;
        self.finished = route.edges.clone();
        route
    }

    /// Ticks until an [Event::Pause] or [Event::Finish] is produced and returns it.
    /// Returns `None` if the router is idle or paused.
    pub fn run(&mut self) -> Option<Event<'a>> {
        loop {
            match self.tick()? {
                e @ Event::Pause { .. } => return Some(e),
                e @ Event::Finish(_) => return Some(e),
                _ => {}
            }
        }
    }

    /// Pauses a running search; the next [Router::tick] returns
    /// [Event::Pause] `{ overflow: false }`. Does nothing if no search is running.
    pub fn pause(&mut self) {
        if self.status == Status::Running {
            log::debug!("search paused");
            self.status = Status::Paused;
            self.events.push_back(Event::Pause { overflow: false });
        }
    }

    /// Continues a paused search, with a fresh [Config::max_iteration] budget.
    /// At least one node is expanded after every resume, even if `max_iteration` is zero.
    /// A pending [Event::Pause] from [Router::pause] is dropped.
    ///
    /// Returns `false` (and does nothing) if there is no paused search with candidates left.
    pub fn resume(&mut self) -> bool {
        if self.status != Status::Paused {
            return false;
        }

        match self.search.as_mut() {
            Some(search) if search.has_candidates() => {
                log::debug!("search resumed");
                search.resume(self.config.max_iteration);
                self.events
                    .retain(|e| !matches!(e, Event::Pause { overflow: false }));
                self.status = Status::Running;
                true
            }
            _ => false,
        }
    }

    /// Returns the way to the frontier node furthest away from the start, for
    /// displaying progress of an ongoing search. After a search has finished,
    /// returns the found route.
    pub fn best_way(&self) -> Vec<&'a Edge> {
        match self.search {
            Some(ref search) => search.best_way(),
            None => self.finished.clone(),
        }
    }
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the least-cost route between two positions, without yielding.
///
/// Returns an empty [Route] if there is no route between the two positions.
///
/// [Config::max_iteration] limits how many nodes may be expanded during the search
/// before returning [PathError::IterationLimitExceeded].
pub fn find_route<'a, S: EdgeSource + ?Sized, C: CostModel>(
    edges: &'a S,
    cost: C,
    start: Point,
    end: Point,
    config: Config,
) -> Result<Route<'a>, PathError> {
    let mut router = Router::with_config(edges, cost, config);
    router.path(start, end)?;

    match router.run() {
        Some(Event::Finish(route)) => Ok(route),
        _ => Err(PathError::IterationLimitExceeded),
    }
}

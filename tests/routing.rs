// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::ptr;

use nanorand::{Rng, WyRand};
use polyroute::{Config, CostModel, Direction, Edge, Event, Network, Point, Route, Router};

/// Cost model reading `weight` and `direction` tags of randomly generated edges.
struct Tagged;

impl CostModel for Tagged {
    fn weight(&self, edge: &Edge) -> f64 {
        edge.tags
            .get("weight")
            .and_then(|w| w.parse().ok())
            .unwrap_or(1.0)
    }

    fn min_weight(&self) -> f64 {
        0.25
    }

    fn direction(&self, edge: &Edge) -> Direction {
        match edge.tags.get("direction").map(|d| d.as_str()) {
            Some("forward") => Direction::Forward,
            Some("backward") => Direction::Backward,
            Some("blocked") => Direction::Blocked,
            _ => Direction::Both,
        }
    }
}

fn lattice_point(rng: &mut WyRand, size: u32) -> Point {
    Point::new(
        rng.generate_range(0..size) as f64,
        rng.generate_range(0..size) as f64,
    )
}

/// Generates a network of straight or bent edges between points of a `size` x `size` lattice.
fn random_network(rng: &mut WyRand, size: u32, edges: usize) -> Network {
    let mut n = Network::default();
    let mut id: i64 = 0;

    while n.len() < edges {
        let a = lattice_point(rng, size);
        let b = lattice_point(rng, size);
        if a == b {
            continue;
        }

        let mut geometry = vec![a];
        if rng.generate_range(0_u32..3) == 0 {
            geometry.push(Point::new(a.x + 0.5, b.y + 0.5));
        }
        geometry.push(b);

        let weight = ["0.25", "0.5", "0.75", "1"][rng.generate_range(0_usize..4)];
        let direction = ["both", "both", "forward", "backward", "blocked"]
            [rng.generate_range(0_usize..5)];

        id += 1;
        n.add_edge(Edge::with_tags(
            id,
            geometry,
            HashMap::from_iter([
                ("weight".to_string(), weight.to_string()),
                ("direction".to_string(), direction.to_string()),
            ]),
        ));
    }

    n
}

fn key(p: Point) -> (i64, i64) {
    (p.x as i64, p.y as i64)
}

fn relax(best: &mut HashMap<(i64, i64), f64>, from: Point, to: Point, cost: f64) -> bool {
    let Some(&known_from) = best.get(&key(from)) else {
        return false;
    };

    let candidate = known_from + cost;
    if best.get(&key(to)).map_or(true, |&known_to| candidate < known_to) {
        best.insert(key(to), candidate);
        true
    } else {
        false
    }
}

/// Least weighted distance between two extremities, computed with Bellman-Ford.
fn brute_force(n: &Network, start: Point, end: Point) -> f64 {
    let mut best = HashMap::from_iter([(key(start), 0.0)]);

    loop {
        let mut changed = false;

        for e in n.iter() {
            let cost = e.length() * Tagged.weight(e);
            let direction = Tagged.direction(e);

            if direction.allows_forward() {
                changed |= relax(&mut best, e.first(), e.last(), cost);
            }
            if direction.allows_backward() {
                changed |= relax(&mut best, e.last(), e.first(), cost);
            }
        }

        if !changed {
            break;
        }
    }

    best.get(&key(end)).copied().unwrap_or(f64::INFINITY)
}

/// Follows the route from `start`, checking that consecutive edges connect
/// and are traversed in allowed directions. Returns the weighted distance of the route.
fn walk(route: &Route<'_>, start: Point, end: Point) -> f64 {
    let mut at = start;
    let mut total = 0.0;

    for e in &route.edges {
        let direction = Tagged.direction(e);
        at = if direction.allows_forward() && e.first() == at {
            e.last()
        } else if direction.allows_backward() && e.last() == at {
            e.first()
        } else {
            panic!("edge {} can't be traversed from {:?}", e.id, at);
        };
        total += e.length() * Tagged.weight(e);
    }

    assert_eq!(at, end);
    total
}

fn search<'a>(n: &'a Network, start: Point, end: Point, config: Config) -> (Point, Point, Route<'a>) {
    let mut router = Router::with_config(n, Tagged, config);
    let (start, end) = router.path(start, end).unwrap();
    match router.run() {
        Some(Event::Finish(route)) => (start, end, route),
        other => panic!("expected the search to finish, got {:?}", other),
    }
}

#[test]
fn finds_least_cost_routes() {
    for seed in 0..200 {
        let mut rng = WyRand::new_seed(seed);
        let n = random_network(&mut rng, 6, 30);
        let a = lattice_point(&mut rng, 6);
        let b = lattice_point(&mut rng, 6);

        let (start, end, route) = search(&n, a, b, Config::default());
        let expected = brute_force(&n, start, end);

        if expected.is_infinite() {
            assert!(!route.is_found(), "seed {}: found an impossible route", seed);
            assert!(route.edges.is_empty());
            continue;
        }

        assert!(route.is_found(), "seed {}: route not found", seed);
        assert!(
            (route.weighted_distance - expected).abs() < 1e-9,
            "seed {}: weighted distance {} != {}",
            seed,
            route.weighted_distance,
            expected
        );

        let walked = walk(&route, start, end);
        assert!((walked - route.weighted_distance).abs() < 1e-9, "seed {}", seed);

        let length: f64 = route.edges.iter().map(|e| e.length()).sum();
        assert!((length - route.distance).abs() < 1e-9, "seed {}", seed);
    }
}

#[test]
fn slicing_does_not_change_routes() {
    let sliced = Config {
        step_iteration: 1,
        ..Config::default()
    };

    for seed in 0..50 {
        let mut rng = WyRand::new_seed(seed);
        let n = random_network(&mut rng, 8, 60);
        let a = lattice_point(&mut rng, 8);
        let b = lattice_point(&mut rng, 8);

        let (_, _, once) = search(&n, a, b, Config::default());
        let (_, _, again) = search(&n, a, b, Config::default());
        let (_, _, stepped) = search(&n, a, b, sliced);

        for other in [&again, &stepped] {
            assert_eq!(once.edges.len(), other.edges.len(), "seed {}", seed);
            assert!(
                once.edges.iter().zip(&other.edges).all(|(x, y)| ptr::eq(*x, *y)),
                "seed {}: routes differ",
                seed
            );
            assert_eq!(once.weighted_distance, other.weighted_distance);
        }
    }
}

#[test]
fn overflowing_searches_resume_to_the_same_route() {
    let tight = Config {
        max_iteration: 3,
        step_iteration: 2,
        ..Config::default()
    };

    for seed in 0..50 {
        let mut rng = WyRand::new_seed(seed);
        let n = random_network(&mut rng, 8, 60);
        let a = lattice_point(&mut rng, 8);
        let b = lattice_point(&mut rng, 8);

        let (_, _, expected) = search(&n, a, b, Config::default());

        let mut router = Router::with_config(&n, Tagged, tight);
        router.path(a, b).unwrap();
        let route = loop {
            match router.run() {
                Some(Event::Pause { overflow: true }) => assert!(router.resume()),
                Some(Event::Finish(route)) => break route,
                other => panic!("seed {}: unexpected {:?}", seed, other),
            }
        };

        assert_eq!(route.weighted_distance, expected.weighted_distance, "seed {}", seed);
        assert!(route.edges.iter().zip(&expected.edges).all(|(x, y)| ptr::eq(*x, *y)));
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Point;

/// Calculates the straight-line (euclidean) distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Checks whether two points are considered to be the same location,
/// that is whether they are not further than `epsilon` apart.
#[inline]
pub fn approx_eq(a: Point, b: Point, epsilon: f64) -> bool {
    distance(a, b) <= epsilon
}

/// Returns the total length of a polyline. Repeated points contribute nothing.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}

/// Calculates the distance from `p` to the closest point of the segment `a`-`b`.
/// A degenerate segment (`a == b`) is treated as a single point.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Calculates the distance from `p` to the closest point of a polyline.
/// Returns [f64::INFINITY] for an empty polyline.
pub fn distance_to_polyline(p: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [single] => distance(p, *single),
        _ => points
            .windows(2)
            .map(|pair| distance_to_segment(p, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn point_distance() {
        assert_almost_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
        assert!(approx_eq(Point::new(1.0, 1.0), Point::new(1.0, 1.0 + 1e-7), 1e-6));
        assert!(!approx_eq(Point::new(1.0, 1.0), Point::new(1.0, 1.0 + 1e-5), 1e-6));
    }

    #[test]
    fn length_of_polyline() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
        ];
        assert_almost_eq!(polyline_length(&points), 15.0);
        assert_almost_eq!(polyline_length(&points[..1]), 0.0);
    }

    #[test]
    fn segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_almost_eq!(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
        assert_almost_eq!(distance_to_segment(Point::new(-3.0, 4.0), a, b), 5.0);
        assert_almost_eq!(distance_to_segment(Point::new(13.0, 4.0), a, b), 5.0);
        assert_almost_eq!(distance_to_segment(Point::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn polyline_distance() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert_almost_eq!(distance_to_polyline(Point::new(12.0, 5.0), &line), 2.0);
        assert_almost_eq!(distance_to_polyline(Point::new(5.0, -1.0), &line), 1.0);
        assert!(distance_to_polyline(Point::new(0.0, 0.0), &[]).is_infinite());
    }
}

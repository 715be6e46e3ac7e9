//! Douglas-Peucker polyline simplification
//!
//! Reduces a dense stroke to its dominant vertices. Used before shape
//! recognition and again before refinement.

use crate::types::Point;
use crate::validation::safe_div;

/// Simplify a polyline, keeping points further than `epsilon` from the chord
///
/// Inputs of two points or fewer are returned unchanged. The first and last
/// points are always kept exactly. With `epsilon == 0.0` only points lying
/// exactly on their chord are removed.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_distance = 0.0;
    let mut index = 0;
    for (i, point) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = perpendicular_distance(*point, first, last);
        if distance > max_distance {
            max_distance = distance;
            index = i;
        }
    }

    if max_distance > epsilon {
        let mut left = simplify(&points[..=index], epsilon);
        let right = simplify(&points[index..], epsilon);
        // The split point ends `left` and starts `right`
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Distance from `point` to the infinite line through `line_start` and `line_end`
///
/// Returns 0 when the line has zero length.
pub fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let direction = line_end - line_start;
    let numerator = direction.perp_dot(point - line_start).abs();
    safe_div(numerator, direction.length())
}

/// Total length of the polyline through `points`
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    #[test]
    fn test_short_input_unchanged() {
        assert!(simplify(&[], 15.0).is_empty());
        let two = pts(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(simplify(&two, 15.0), two);
    }

    #[test]
    fn test_near_straight_collapses_to_endpoints() {
        let jitter = [0.0, 3.0, -4.0, 5.0, -2.0, 4.0, -5.0, 1.0, 2.0, 0.0];
        let points: Vec<Point> = jitter
            .iter()
            .enumerate()
            .map(|(i, &dy)| DVec2::new(i as f64 * 20.0, dy))
            .collect();

        let simplified = simplify(&points, 15.0);
        assert_eq!(simplified, vec![points[0], points[9]]);
    }

    #[test]
    fn test_keeps_corner() {
        let points = pts(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (100.0, 50.0), (100.0, 100.0)]);
        let simplified = simplify(&points, 15.0);
        assert_eq!(simplified, pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]));
    }

    #[test]
    fn test_endpoints_preserved_and_length_bounded() {
        let points: Vec<Point> = (0..40)
            .map(|i| {
                let t = i as f64 * 0.3;
                DVec2::new(t * 25.0, (t * 1.7).sin() * 40.0)
            })
            .collect();

        for epsilon in [0.0, 1.0, 5.0, 15.0, 100.0] {
            let simplified = simplify(&points, epsilon);
            assert_eq!(simplified.first(), points.first());
            assert_eq!(simplified.last(), points.last());
            assert!(simplified.len() <= points.len());
        }
    }

    #[test]
    fn test_zero_epsilon_removes_only_collinear() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 1.0), (4.0, 2.0), (5.0, 2.5)]);
        let simplified = simplify(&points, 0.0);
        assert_eq!(simplified, pts(&[(0.0, 0.0), (2.0, 0.0), (4.0, 2.0), (5.0, 2.5)]));
    }

    #[test]
    fn test_idempotent() {
        let points: Vec<Point> = (0..64)
            .map(|i| {
                let a = i as f64 / 64.0 * std::f64::consts::TAU;
                DVec2::new(120.0 * a.cos(), 80.0 * a.sin())
            })
            .collect();

        let once = simplify(&points, 15.0);
        let twice = simplify(&once, 15.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_degenerate_line_distance_is_zero() {
        let p = DVec2::new(3.0, 4.0);
        assert_eq!(perpendicular_distance(p, DVec2::ONE, DVec2::ONE), 0.0);
        assert!((perpendicular_distance(p, DVec2::ZERO, DVec2::new(10.0, 0.0)) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_closed_loop_collapses() {
        // Chord of a closed loop has zero length, so every distance is 0
        let points = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 0.0)]);
        assert_eq!(simplify(&points, 15.0), pts(&[(0.0, 0.0), (0.0, 0.0)]));
    }

    #[test]
    fn test_path_length() {
        let points = pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert!((path_length(&points) - 11.0).abs() < 1e-12);
        assert_eq!(path_length(&points[..1]), 0.0);
    }
}

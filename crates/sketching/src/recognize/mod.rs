//! Shape recognition
//!
//! Classifies a stroke as one of the [`ShapeKind`]s. The stroke is first
//! simplified to its dominant vertices, then:
//! - sharp turns between consecutive vertices are counted as edges
//! - the average deviation of the vertex angles from a straight line gives
//!   the curvature
//! - edge count and curvature pick line, curve, triangle or rectangle
//! - anything else goes to the circle/oval detector in [`round`]
//!
//! Classification is a pure function of the input points.

mod ellipse;
mod round;

use glam::DVec2;
use scribble_config::RecognizerConfig;
use tracing::debug;

use crate::simplify::simplify;
use crate::types::{Point, ShapeKind};

pub use ellipse::{centroid, ellipse_axes, Covariance};
pub use round::{detect_round_shape, RoundMetrics};

/// Classify a stroke with the default thresholds
pub fn recognize(points: &[Point]) -> ShapeKind {
    ShapeRecognizer::default().recognize(points)
}

/// Angle in degrees between two direction vectors (0 = no turn, 180 = reversal)
///
/// Zero-length directions give 0.
pub fn turn_angle(incoming: DVec2, outgoing: DVec2) -> f64 {
    let magnitude = incoming.length() * outgoing.length();
    if magnitude <= 0.0 || !magnitude.is_finite() {
        return 0.0;
    }
    let cosine = (incoming.dot(outgoing) / magnitude).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}

/// Turn angle in degrees at `b` when travelling `a -> b -> c`
pub fn angle_between(a: Point, b: Point, c: Point) -> f64 {
    turn_angle(b - a, c - b)
}

/// Number of edges of a simplified polyline
///
/// Counting starts at 1 for the first segment; every interior vertex whose
/// turn angle is under `edge_turn_deg` adds one.
pub fn count_edges(points: &[Point], edge_turn_deg: f64) -> usize {
    1 + points
        .windows(3)
        .filter(|w| angle_between(w[0], w[1], w[2]).abs() < edge_turn_deg)
        .count()
}

/// Summed deviation of the interior angles from 180 degrees, averaged over
/// all points of the polyline
pub fn measure_curvature(points: &[Point]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let total: f64 = points
        .windows(3)
        .map(|w| (angle_between(w[0], w[1], w[2]) - 180.0).abs())
        .sum();
    total / points.len() as f64
}

/// Result of analyzing a stroke
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeAnalysis {
    /// Final classification
    pub kind: ShapeKind,
    /// Simplified vertices the classification was made on
    pub simplified: Vec<Point>,
    /// Edge count of the simplified vertices
    pub edges: usize,
    /// Average curvature of the simplified vertices
    pub curvature: f64,
    /// Round-shape measures, when the detector ran and the input was not degenerate
    pub round: Option<RoundMetrics>,
}

/// Stroke classifier
#[derive(Debug, Clone, Default)]
pub struct ShapeRecognizer {
    config: RecognizerConfig,
}

impl ShapeRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Classify a stroke
    pub fn recognize(&self, points: &[Point]) -> ShapeKind {
        self.analyze(points).kind
    }

    /// Classify a stroke and keep the intermediate measures
    pub fn analyze(&self, points: &[Point]) -> ShapeAnalysis {
        let simplified = simplify(points, self.config.simplify_epsilon);

        if points.len() < self.config.min_points {
            debug!(
                "ShapeRecognizer::analyze: {} points, need {}",
                points.len(),
                self.config.min_points
            );
            return ShapeAnalysis {
                kind: ShapeKind::Undefined,
                simplified,
                edges: 0,
                curvature: 0.0,
                round: None,
            };
        }

        let edges = count_edges(&simplified, self.config.edge_turn_deg);
        let curvature = measure_curvature(&simplified);
        debug!(
            "ShapeRecognizer::analyze: edges={} curvature={:.2} simplified={}",
            edges,
            curvature,
            simplified.len()
        );

        let mut round = None;
        let kind = if edges <= self.config.line_max_edges && curvature <= self.config.line_max_curvature {
            ShapeKind::Line
        } else if edges == 4 && curvature > self.config.line_max_curvature {
            // High curvature outranks the rectangle reading of four edges
            ShapeKind::Curve
        } else if edges == 3 {
            ShapeKind::Triangle
        } else if edges == 4 {
            ShapeKind::Rectangle
        } else {
            round = RoundMetrics::measure(&simplified, &self.config.round);
            match detect_round_shape(&simplified, &self.config.round) {
                kind @ (ShapeKind::Circle | ShapeKind::Oval | ShapeKind::Curve) => kind,
                _ => ShapeKind::Undefined,
            }
        };

        ShapeAnalysis {
            kind,
            simplified,
            edges,
            curvature,
            round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    fn ring(radius: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * TAU;
                DVec2::new(radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    #[test]
    fn test_turn_angle() {
        assert!(turn_angle(DVec2::X, DVec2::X).abs() < 1e-9);
        assert!((turn_angle(DVec2::X, DVec2::Y) - 90.0).abs() < 1e-9);
        assert!((turn_angle(DVec2::X, -DVec2::X) - 180.0).abs() < 1e-9);
        assert_eq!(turn_angle(DVec2::ZERO, DVec2::X), 0.0);
    }

    #[test]
    fn test_angle_between_coincident_points() {
        let p = DVec2::new(3.0, 3.0);
        assert_eq!(angle_between(p, p, DVec2::ZERO), 0.0);
    }

    #[test]
    fn test_count_edges_and_curvature() {
        let square = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 5.0)]);
        assert_eq!(count_edges(&square, 150.0), 4);
        // Three right angles, each 90 away from 180, over five points
        assert!((measure_curvature(&square) - 54.0).abs() < 1e-9);

        assert_eq!(count_edges(&square[..2], 150.0), 1);
        assert_eq!(measure_curvature(&square[..2]), 0.0);
        assert_eq!(measure_curvature(&[]), 0.0);
    }

    #[test]
    fn test_fewer_than_four_points_undefined() {
        assert_eq!(recognize(&[]), ShapeKind::Undefined);
        assert_eq!(recognize(&pts(&[(0.0, 0.0)])), ShapeKind::Undefined);
        // An exact equilateral triangle given as its three corners
        assert_eq!(
            recognize(&pts(&[(0.0, 0.0), (100.0, 0.0), (50.0, 86.6)])),
            ShapeKind::Undefined
        );
    }

    #[test]
    fn test_square_stroke_is_rectangle() {
        // Four equal sides drawn corner to corner, ending just short of the start
        let square = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 5.0)]);
        assert_eq!(recognize(&square), ShapeKind::Rectangle);
    }

    #[test]
    fn test_dense_square_stroke_is_rectangle() {
        let mut points = Vec::new();
        for t in (0..100).step_by(5) {
            points.push(DVec2::new(t as f64, 0.0));
        }
        for t in (0..100).step_by(5) {
            points.push(DVec2::new(100.0, t as f64));
        }
        for t in (0..100).step_by(5) {
            points.push(DVec2::new(100.0 - t as f64, 100.0));
        }
        for t in (0..95).step_by(5) {
            points.push(DVec2::new(0.0, 100.0 - t as f64));
        }
        assert_eq!(recognize(&points), ShapeKind::Rectangle);
    }

    #[test]
    fn test_triangle_stroke() {
        let triangle = pts(&[(0.0, 0.0), (100.0, 0.0), (50.0, 86.6), (2.0, 3.0)]);
        let analysis = ShapeRecognizer::default().analyze(&triangle);
        assert_eq!(analysis.edges, 3);
        assert_eq!(analysis.kind, ShapeKind::Triangle);
    }

    #[test]
    fn test_jittered_line() {
        let jitter = [0.0, 3.0, -4.0, 5.0, -2.0, 4.0, -5.0, 1.0, 2.0, 0.0];
        let points: Vec<Point> = jitter
            .iter()
            .enumerate()
            .map(|(i, &dy)| DVec2::new(i as f64 * 20.0, dy))
            .collect();

        let analysis = ShapeRecognizer::default().analyze(&points);
        assert_eq!(analysis.simplified.len(), 2);
        assert_eq!(analysis.kind, ShapeKind::Line);
    }

    #[test]
    fn test_large_circle() {
        let analysis = ShapeRecognizer::default().analyze(&ring(250.0, 64));
        assert_eq!(analysis.kind, ShapeKind::Circle);
        assert!(analysis.round.is_some());
    }

    #[test]
    fn test_small_circle_reads_as_rectangle() {
        // At epsilon 15 a radius-50 circle simplifies to four vertices
        let analysis = ShapeRecognizer::default().analyze(&ring(50.0, 64));
        assert_eq!(analysis.simplified.len(), 5);
        assert_eq!(analysis.kind, ShapeKind::Rectangle);
    }

    #[test]
    fn test_ellipse_is_oval() {
        let points: Vec<Point> = (0..64)
            .map(|i| {
                let a = i as f64 / 64.0 * TAU;
                DVec2::new(100.0 + 180.0 * a.cos(), 50.0 + 90.0 * a.sin())
            })
            .collect();
        assert_eq!(recognize(&points), ShapeKind::Oval);
    }

    #[test]
    fn test_half_circle_arc_is_curve() {
        // Four edges with a high average turn: curvature beats rectangle
        let points: Vec<Point> = (0..=40)
            .map(|i| {
                let a = i as f64 / 40.0 * std::f64::consts::PI;
                DVec2::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        let analysis = ShapeRecognizer::default().analyze(&points);
        assert_eq!(analysis.edges, 4);
        assert!(analysis.curvature > 60.0);
        assert_eq!(analysis.kind, ShapeKind::Curve);
    }

    #[test]
    fn test_deterministic() {
        let points = ring(120.0, 50);
        let first = ShapeRecognizer::default().analyze(&points);
        for _ in 0..5 {
            assert_eq!(ShapeRecognizer::default().analyze(&points), first);
        }
    }
}

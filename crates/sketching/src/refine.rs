//! Shape refinement
//!
//! Replaces a recognized stroke with an idealized path:
//! - lines snap to horizontal or vertical when close to an axis
//! - curves are resampled along a Catmull-Rom spline
//! - circles and ovals become an ellipse inscribed in the stroke's rotated
//!   bounding box
//! - polygons are closed when the stroke ends near where it started

use glam::{DAffine2, DVec2};
use scribble_config::RefinerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{ELLIPSE_KAPPA, LENGTH_EPSILON};
use crate::path::{Path, Rect};
use crate::recognize::{Covariance, ShapeRecognizer};
use crate::simplify::simplify;
use crate::types::{Point, ShapeKind};

/// Refine a stroke with the default settings
pub fn refine(kind: ShapeKind, points: &[Point]) -> Path {
    ShapeRefiner::default().refine(kind, points)
}

/// Classify and refine a stroke with the default settings
pub fn recognize_and_refine(points: &[Point]) -> RefinedShape {
    ShapeRefiner::default().recognize_and_refine(&ShapeRecognizer::default(), points)
}

/// An idealized shape ready to replace the live stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedShape {
    pub kind: ShapeKind,
    pub path: Path,
    /// Stroke width the renderer draws the path with
    pub outline_width: f64,
}

/// Minimal bounding box aligned with a point set's principal axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedBox {
    /// Box center in surface coordinates
    pub center: Point,
    /// Extent along the rotated x axis, never smaller than `height`
    pub width: f64,
    /// Extent along the rotated y axis
    pub height: f64,
    /// Rotation of the box's x axis in radians
    pub rotation: f64,
}

impl RotatedBox {
    /// Transform from the box's local frame (origin at its center) to the surface
    pub fn to_surface(&self) -> DAffine2 {
        DAffine2::from_angle_translation(self.rotation, self.center)
    }
}

/// Bounding box of the points in the frame of their principal axis
///
/// The points are rotated by the negative principal angle about their
/// centroid, boxed, and the box center is mapped back. Returns None for
/// fewer than three points.
pub fn rotated_bounding_box(points: &[Point]) -> Option<RotatedBox> {
    if points.len() < 3 {
        return None;
    }
    let covariance = Covariance::of(points)?;
    let angle = covariance.principal_angle();
    let origin = covariance.centroid;

    let to_local = DVec2::from_angle(-angle);
    let bounds = Rect::from_points(points.iter().map(|p| to_local.rotate(*p - origin)))?;
    let center = origin + DVec2::from_angle(angle).rotate(bounds.center());

    let (width, height, rotation) = if bounds.width() >= bounds.height() {
        (bounds.width(), bounds.height(), angle)
    } else {
        (bounds.height(), bounds.width(), angle + std::f64::consts::FRAC_PI_2)
    };

    Some(RotatedBox {
        center,
        width,
        height,
        rotation,
    })
}

/// Ellipse inscribed in a rotated box, as four cubic segments
pub fn ellipse_path(bounds: &RotatedBox) -> Path {
    let rx = bounds.width / 2.0;
    let ry = bounds.height / 2.0;
    let kx = rx * ELLIPSE_KAPPA;
    let ky = ry * ELLIPSE_KAPPA;

    let mut path = Path::new();
    path.move_to(DVec2::new(rx, 0.0));
    path.cubic_to(DVec2::new(0.0, ry), DVec2::new(rx, ky), DVec2::new(kx, ry));
    path.cubic_to(DVec2::new(-rx, 0.0), DVec2::new(-kx, ry), DVec2::new(-rx, ky));
    path.cubic_to(DVec2::new(0.0, -ry), DVec2::new(-rx, -ky), DVec2::new(-kx, -ry));
    path.cubic_to(DVec2::new(rx, 0.0), DVec2::new(kx, -ry), DVec2::new(rx, -ky));
    path.close();
    path.transformed(&bounds.to_surface())
}

/// Replace the last point with the first when the stroke almost closes
///
/// Only applies to three or more points; the gap must be strictly under
/// `distance`.
pub fn merge_close_points(points: &[Point], distance: f64) -> (Vec<Point>, bool) {
    let mut merged = points.to_vec();
    if merged.len() < 3 {
        return (merged, false);
    }
    let first = merged[0];
    let last = merged.len() - 1;
    if merged[last].distance(first) < distance {
        merged[last] = first;
        return (merged, true);
    }
    (merged, false)
}

/// Point on the Catmull-Rom segment from `p1` to `p2` at `t` in 0..=1
fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Shape refiner
#[derive(Debug, Clone, Default)]
pub struct ShapeRefiner {
    config: RefinerConfig,
}

impl ShapeRefiner {
    pub fn new(config: RefinerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RefinerConfig {
        &self.config
    }

    /// Simplify the raw stroke, then refine it as `kind`
    pub fn refine(&self, kind: ShapeKind, points: &[Point]) -> Path {
        let simplified = simplify(points, self.config.simplify_epsilon);
        self.refine_simplified(kind, &simplified)
    }

    /// Refine already simplified vertices as `kind`
    pub fn refine_simplified(&self, kind: ShapeKind, simplified: &[Point]) -> Path {
        let path = match kind {
            ShapeKind::Line => self.snapped_lines(simplified),
            ShapeKind::Curve => self.resampled_curve(simplified),
            ShapeKind::Circle | ShapeKind::Oval => match rotated_bounding_box(simplified) {
                Some(bounds) => ellipse_path(&bounds),
                None => self.polygon(simplified),
            },
            ShapeKind::Triangle | ShapeKind::Rectangle | ShapeKind::Undefined => {
                self.polygon(simplified)
            }
        };
        debug!(
            "ShapeRefiner::refine_simplified: {:?} from {} points -> {} commands",
            kind,
            simplified.len(),
            path.len()
        );
        path
    }

    /// Classify the stroke and refine it, reusing the recognizer's
    /// simplification when both use the same tolerance
    pub fn recognize_and_refine(&self, recognizer: &ShapeRecognizer, points: &[Point]) -> RefinedShape {
        let analysis = recognizer.analyze(points);
        let path = if recognizer.config().simplify_epsilon == self.config.simplify_epsilon {
            self.refine_simplified(analysis.kind, &analysis.simplified)
        } else {
            self.refine(analysis.kind, points)
        };
        RefinedShape {
            kind: analysis.kind,
            path,
            outline_width: self.config.outline_width,
        }
    }

    /// Straight segments, each snapped to an axis when within tolerance
    ///
    /// Each segment starts where the previous (possibly snapped) one ended.
    fn snapped_lines(&self, points: &[Point]) -> Path {
        let mut path = Path::new();
        let Some((&first, rest)) = points.split_first() else {
            return path;
        };
        let tolerance = self.config.snap_tolerance_deg;

        path.move_to(first);
        let mut current = first;
        for &target in rest {
            let direction = target - current;
            let angle = direction.y.atan2(direction.x).to_degrees().abs();
            let end = if angle < tolerance || angle > 180.0 - tolerance {
                DVec2::new(target.x, current.y)
            } else if (angle - 90.0).abs() < tolerance {
                DVec2::new(current.x, target.y)
            } else {
                target
            };
            path.line_to(end);
            current = end;
        }
        path
    }

    /// Catmull-Rom resampling with neighbors clamped at the ends
    fn resampled_curve(&self, points: &[Point]) -> Path {
        let mut path = Path::new();
        let Some(&first) = points.first() else {
            return path;
        };
        path.move_to(first);

        let last = points.len() - 1;
        for i in 0..last {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(last)];

            let length = p1.distance(p2);
            if length <= LENGTH_EPSILON {
                continue;
            }
            let steps = (length / self.config.curve_max_step).ceil().max(1.0) as usize;
            for step in 1..steps {
                let t = step as f64 / steps as f64;
                path.line_to(catmull_rom(p0, p1, p2, p3, t));
            }
            path.line_to(p2);
        }
        path
    }

    /// Straight segments, closed when the ends nearly meet
    fn polygon(&self, points: &[Point]) -> Path {
        let (merged, closed) = merge_close_points(points, self.config.merge_distance);
        let mut path = Path::polyline(&merged);
        if closed {
            path.close();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    fn ellipse_points(center: Point, rx: f64, ry: f64, rotation: f64, n: usize) -> Vec<Point> {
        let rotate = DVec2::from_angle(rotation);
        (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * TAU;
                center + rotate.rotate(DVec2::new(rx * a.cos(), ry * a.sin()))
            })
            .collect()
    }

    #[test]
    fn test_line_snaps_horizontal() {
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Line, &pts(&[(0.0, 0.0), (100.0, 10.0)]));
        assert_eq!(path.end_points(), pts(&[(0.0, 0.0), (100.0, 0.0)]));

        // Leftwards, close to 180 degrees
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Line, &pts(&[(100.0, 0.0), (0.0, 8.0)]));
        assert_eq!(path.end_points(), pts(&[(100.0, 0.0), (0.0, 0.0)]));
    }

    #[test]
    fn test_line_snaps_vertical_and_chains() {
        let points = pts(&[(0.0, 0.0), (100.0, 10.0), (105.0, 100.0)]);
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Line, &points);
        assert_eq!(
            path.end_points(),
            pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)])
        );
    }

    #[test]
    fn test_diagonal_line_not_snapped() {
        let points = pts(&[(0.0, 0.0), (100.0, 100.0)]);
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Line, &points);
        assert_eq!(path.end_points(), points);
    }

    #[test]
    fn test_curve_resampling() {
        let points = pts(&[(0.0, 0.0), (70.0, 0.0), (70.0, 35.0)]);
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Curve, &points);

        // 10 steps for the first segment, 5 for the second, plus the move
        assert_eq!(path.len(), 16);
        let ends = path.end_points();
        assert_eq!(ends[0], points[0]);
        assert_eq!(ends[10], points[1]);
        assert_eq!(ends[ends.len() - 1], points[2]);
    }

    #[test]
    fn test_curve_single_point() {
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Curve, &pts(&[(3.0, 4.0)]));
        assert_eq!(path.commands(), &[PathCommand::MoveTo(DVec2::new(3.0, 4.0))]);
        assert!(refine(ShapeKind::Curve, &[]).is_empty());
    }

    #[test]
    fn test_rotated_box_axis_aligned() {
        let center = DVec2::new(10.0, 20.0);
        let bounds = rotated_bounding_box(&ellipse_points(center, 90.0, 40.0, 0.0, 8)).unwrap();
        assert!((bounds.center - center).length() < 1e-6);
        assert!((bounds.width - 180.0).abs() < 1e-6);
        assert!((bounds.height - 80.0).abs() < 1e-6);
        assert!(bounds.rotation.abs() < 1e-6);

        let bounds = rotated_bounding_box(&ellipse_points(center, 40.0, 90.0, 0.0, 8)).unwrap();
        assert!((bounds.width - 180.0).abs() < 1e-6);
        assert!((bounds.height - 80.0).abs() < 1e-6);
        assert!((bounds.rotation.abs() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_box_follows_rotation() {
        let center = DVec2::new(-50.0, 75.0);
        let bounds = rotated_bounding_box(&ellipse_points(center, 90.0, 40.0, FRAC_PI_6, 8)).unwrap();
        assert!((bounds.center - center).length() < 1e-6);
        assert!((bounds.width - 180.0).abs() < 1e-6);
        assert!((bounds.height - 80.0).abs() < 1e-6);
        assert!((bounds.rotation.rem_euclid(PI) - FRAC_PI_6).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_box_needs_three_points() {
        assert!(rotated_bounding_box(&pts(&[(0.0, 0.0), (5.0, 5.0)])).is_none());
    }

    #[test]
    fn test_oval_becomes_ellipse() {
        let center = DVec2::new(10.0, 20.0);
        let points = ellipse_points(center, 90.0, 40.0, 0.0, 8);
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Oval, &points);

        assert_eq!(path.len(), 6);
        assert_eq!(path.commands()[5], PathCommand::Close);
        let start = path.end_points()[0];
        assert!((start - DVec2::new(100.0, 20.0)).length() < 1e-6);

        // Axis-aligned ellipse: the control hull is the box itself
        let bounds = path.bounding_box().unwrap();
        assert!((bounds.width() - 180.0).abs() < 1e-6);
        assert!((bounds.height() - 80.0).abs() < 1e-6);
        assert!((bounds.center() - center).length() < 1e-6);
    }

    #[test]
    fn test_round_shape_with_too_few_points_falls_back() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Circle, &points);
        assert_eq!(path, Path::polyline(&points));
    }

    #[test]
    fn test_polygon_closes_near_start() {
        let points = pts(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0), (10.0, 10.0)]);
        let path = ShapeRefiner::default().refine_simplified(ShapeKind::Triangle, &points);
        assert_eq!(
            path.end_points(),
            pts(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0), (0.0, 0.0)])
        );
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));
    }

    #[test]
    fn test_merge_is_strict() {
        // Exactly 50 apart stays open
        let points = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (30.0, 40.0)]);
        let (merged, closed) = merge_close_points(&points, 50.0);
        assert!(!closed);
        assert_eq!(merged, points);

        let (merged, closed) = merge_close_points(&points[..2], 500.0);
        assert!(!closed);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_recognize_and_refine_square() {
        let square = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 5.0)]);
        let shape = recognize_and_refine(&square);
        assert_eq!(shape.kind, ShapeKind::Rectangle);
        assert_eq!(shape.outline_width, 4.0);
        assert_eq!(
            shape.path.end_points(),
            pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn test_recognize_and_refine_circle() {
        let center = DVec2::new(300.0, 300.0);
        let shape = recognize_and_refine(&ellipse_points(center, 250.0, 250.0, 0.0, 64));
        assert_eq!(shape.kind, ShapeKind::Circle);
        assert_eq!(shape.path.len(), 6);
        let bounds = shape.path.bounding_box().unwrap();
        assert!((bounds.center() - center).length() < 25.0);
    }
}

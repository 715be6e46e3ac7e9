//! Circle / oval detector
//!
//! Works on the simplified stroke. Size-dependent measures are divided by a
//! normalization factor so the same thresholds hold for small and large
//! shapes.

use scribble_config::RoundShapeThresholds;
use tracing::debug;

use super::ellipse::{centroid, ellipse_axes};
use crate::path::Rect;
use crate::simplify::path_length;
use crate::types::{Point, ShapeKind};
use crate::validation::safe_div;

/// Measures the detector classifies on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundMetrics {
    /// Distance between first and last point, normalized
    pub start_end_gap: f64,
    /// Standard deviation of the filtered radial distances, normalized
    pub std_dev: f64,
    /// Variance of the filtered radial distances, normalized
    pub variance: f64,
    /// Major / minor axis of the covariance ellipse
    pub aspect_ratio: f64,
    /// Path length / bounding box diagonal
    pub path_ratio: f64,
}

impl RoundMetrics {
    /// Measure a point sequence
    ///
    /// Returns None for fewer than three points and for degenerate input
    /// (all points coincident or collinear) where the ratios are undefined.
    pub fn measure(points: &[Point], thresholds: &RoundShapeThresholds) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let center = centroid(points)?;
        let bounds = Rect::from_points(points.iter().copied())?;

        let size_factor = (bounds.width() + bounds.height()) / 2.0;
        let diagonal = bounds.diagonal();
        let length = path_length(points);
        let path_ratio = safe_div(length, diagonal);

        let (major, minor) = ellipse_axes(points);
        if minor <= 0.0 {
            return None;
        }
        let aspect_ratio = major / minor;

        // Pull every point halfway to the centroid before measuring, which
        // halves the influence of local wobble on the radial spread
        let distances: Vec<f64> = points
            .iter()
            .map(|p| ((*p + center) * 0.5).distance(center))
            .collect();
        let mean = distances.iter().sum::<f64>() / distances.len() as f64;
        let filtered: Vec<f64> = distances
            .into_iter()
            .filter(|d| (d - mean).abs() < mean * thresholds.radial_band)
            .collect();
        let variance = safe_div(
            filtered.iter().map(|d| (d - mean).powi(2)).sum::<f64>(),
            filtered.len() as f64,
        );
        let std_dev = variance.sqrt();

        let normalization = size_factor
            .max(diagonal)
            .max(length * thresholds.path_length_weight);
        if normalization <= 0.0 {
            return None;
        }

        let gap = points[0].distance(points[points.len() - 1]);

        Some(Self {
            start_end_gap: gap / normalization,
            std_dev: std_dev / normalization,
            variance: variance / normalization,
            aspect_ratio,
            path_ratio,
        })
    }

    /// Classify the measures; the first matching rule wins
    pub fn classify(&self, t: &RoundShapeThresholds) -> ShapeKind {
        if self.start_end_gap < t.circle_max_gap
            && self.std_dev < t.circle_max_std_dev
            && self.aspect_ratio < t.circle_max_aspect
            && self.path_ratio > t.circle_min_path_ratio
        {
            return ShapeKind::Circle;
        }

        if self.start_end_gap < t.oval_max_gap
            && self.std_dev < t.oval_max_std_dev
            && self.aspect_ratio > t.oval_min_aspect
            && self.aspect_ratio < t.oval_max_aspect
            && self.variance < t.oval_max_variance
            && self.path_ratio > t.oval_min_path_ratio
        {
            return ShapeKind::Oval;
        }

        if self.start_end_gap > t.reject_min_gap
            || self.std_dev > t.reject_min_std_dev
            || self.aspect_ratio > t.reject_min_aspect
            || self.path_ratio > t.reject_min_path_ratio
            || self.variance > t.reject_min_variance
        {
            return ShapeKind::Undefined;
        }

        if self.start_end_gap > t.curve_min_gap
            || self.std_dev > t.curve_min_std_dev
            || self.path_ratio < t.curve_max_path_ratio
        {
            return ShapeKind::Curve;
        }

        ShapeKind::Undefined
    }
}

/// Classify a simplified stroke as circle, oval, curve or undefined
pub fn detect_round_shape(points: &[Point], thresholds: &RoundShapeThresholds) -> ShapeKind {
    match RoundMetrics::measure(points, thresholds) {
        Some(metrics) => {
            let kind = metrics.classify(thresholds);
            debug!(
                "detect_round_shape: gap={:.3} std_dev={:.3} variance={:.3} aspect={:.3} path_ratio={:.3} -> {:?}",
                metrics.start_end_gap,
                metrics.std_dev,
                metrics.variance,
                metrics.aspect_ratio,
                metrics.path_ratio,
                kind
            );
            kind
        }
        None => {
            debug!("detect_round_shape: degenerate input ({} points)", points.len());
            ShapeKind::Undefined
        }
    }
}

//! Principal-component ellipse fitting
//!
//! Shared by the round-shape detector (axis lengths) and the refiner
//! (orientation of the rotated bounding box).

use glam::DVec2;

use crate::types::Point;

/// Covariance of a point set about its centroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covariance {
    pub centroid: Point,
    pub xx: f64,
    pub yy: f64,
    pub xy: f64,
}

impl Covariance {
    /// Population covariance of the points (None when there are none)
    pub fn of(points: &[Point]) -> Option<Self> {
        let centroid = centroid(points)?;
        let n = points.len() as f64;
        let (xx, yy, xy) = points.iter().fold((0.0, 0.0, 0.0), |(xx, yy, xy), p| {
            let d = *p - centroid;
            (xx + d.x * d.x, yy + d.y * d.y, xy + d.x * d.y)
        });
        Some(Self {
            centroid,
            xx: xx / n,
            yy: yy / n,
            xy: xy / n,
        })
    }

    /// Eigenvalues `(larger, smaller)` of the 2x2 covariance matrix
    ///
    /// A slightly negative discriminant from rounding is treated as zero.
    pub fn eigenvalues(&self) -> (f64, f64) {
        let trace = self.xx + self.yy;
        let det = self.xx * self.yy - self.xy * self.xy;
        let root = (trace * trace / 4.0 - det).max(0.0).sqrt();
        (trace / 2.0 + root, trace / 2.0 - root)
    }

    /// Angle in radians of the principal (largest-variance) direction
    ///
    /// Equivalent to the direction of the eigenvector `(xy, major - xx)`,
    /// but stable when the matrix is nearly diagonal. Isotropic point sets
    /// resolve to 0.
    pub fn principal_angle(&self) -> f64 {
        0.5 * (2.0 * self.xy).atan2(self.xx - self.yy)
    }
}

/// Mean of the points (None when there are none)
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<DVec2>() / points.len() as f64)
}

/// Major and minor axis lengths of the points' covariance ellipse
///
/// Each axis is `2 * sqrt(eigenvalue)`. The larger eigenvalue always maps to
/// the major axis, so `major >= minor`. Fewer than three points give `(0, 0)`.
pub fn ellipse_axes(points: &[Point]) -> (f64, f64) {
    if points.len() < 3 {
        return (0.0, 0.0);
    }
    let Some(covariance) = Covariance::of(points) else {
        return (0.0, 0.0);
    };
    let (first, second) = covariance.eigenvalues();
    let axis = |eigenvalue: f64| 2.0 * eigenvalue.max(0.0).sqrt();
    let (a, b) = (axis(first), axis(second));
    (a.max(b), a.min(b))
}

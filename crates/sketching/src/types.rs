use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D point in surface coordinates (y grows downwards).
pub type Point = DVec2;

/// One raw sample from the input layer for the active touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    /// Touch location in surface coordinates
    pub position: Point,
    /// Normalized force 0.0-1.0 (0 when the device reports no force)
    pub pressure: f64,
    /// Event timestamp in seconds
    pub timestamp: f64,
    /// Distance / time since the previous sample, in units per second
    pub velocity: f64,
}

impl TouchSample {
    /// Create a sample at the given position with no pressure or velocity
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            pressure: 0.0,
            timestamp: 0.0,
            velocity: 0.0,
        }
    }

    /// Set the normalized pressure
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    /// Set the velocity in units per second
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the timestamp in seconds
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// One point of a stroke with its computed ink half-width.
///
/// The position never changes after construction. The half-width is always
/// finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    position: Point,
    half_width: f64,
}

impl SamplePoint {
    /// Create a sample point, clamping the half-width to a valid value
    pub fn new(position: Point, half_width: f64) -> Self {
        let half_width = if half_width.is_finite() {
            half_width.max(0.0)
        } else {
            0.0
        };
        Self {
            position,
            half_width,
        }
    }

    /// Position in surface coordinates
    pub fn position(&self) -> Point {
        self.position
    }

    /// Half of the local ink thickness
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Full local ink thickness
    pub fn width(&self) -> f64 {
        self.half_width * 2.0
    }
}

/// Per-point width data for GPU upload.
///
/// Field order is arranged for 4-byte alignment with no padding.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct StrokeVertex {
    pub x: f32,
    pub y: f32,
    pub half_width: f32,
}

impl From<&SamplePoint> for StrokeVertex {
    fn from(point: &SamplePoint) -> Self {
        Self {
            x: point.position.x as f32,
            y: point.position.y as f32,
            half_width: point.half_width as f32,
        }
    }
}

/// Shape classification of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShapeKind {
    Line,
    Curve,
    Triangle,
    Rectangle,
    Circle,
    Oval,
    #[default]
    Undefined,
}

impl ShapeKind {
    /// Whether the shape refines into an ellipse
    pub fn is_round(self) -> bool {
        matches!(self, ShapeKind::Circle | ShapeKind::Oval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_point_clamps_half_width() {
        let origin = DVec2::ZERO;
        assert_eq!(SamplePoint::new(origin, -3.0).half_width(), 0.0);
        assert_eq!(SamplePoint::new(origin, f64::NAN).half_width(), 0.0);
        assert_eq!(SamplePoint::new(origin, f64::INFINITY).half_width(), 0.0);
        assert_eq!(SamplePoint::new(origin, 2.5).width(), 5.0);
    }

    #[test]
    fn test_stroke_vertex_layout() {
        assert_eq!(std::mem::size_of::<StrokeVertex>(), 12);

        let points = [
            SamplePoint::new(DVec2::new(1.0, 2.0), 0.5),
            SamplePoint::new(DVec2::new(3.0, 4.0), 1.5),
        ];
        let vertices: Vec<StrokeVertex> = points.iter().map(StrokeVertex::from).collect();
        let floats: &[f32] = bytemuck::cast_slice(&vertices);
        assert_eq!(floats, &[1.0, 2.0, 0.5, 3.0, 4.0, 1.5]);
    }

    #[test]
    fn test_shape_kind_default() {
        assert_eq!(ShapeKind::default(), ShapeKind::Undefined);
        assert!(ShapeKind::Oval.is_round());
        assert!(!ShapeKind::Rectangle.is_round());
    }
}

//! Drawing-command paths shared by the ribbon builder and the shape refiner
//!
//! A [`Path`] is a plain value: an ordered list of [`PathCommand`]s in
//! surface coordinates. The rendering layer consumes it as-is.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use crate::types::Point;

/// A single drawing command
///
/// Arc angles are in radians, measured from the +x axis in y-down surface
/// coordinates. `clockwise: true` sweeps with increasing angle (visually
/// clockwise on screen), `clockwise: false` with decreasing angle. The arc
/// starts at `center + radius * (cos start, sin start)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadCurveTo {
        to: Point,
        control: Point,
    },
    CubicCurveTo {
        to: Point,
        control1: Point,
        control2: Point,
    },
    ArcTo {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    },
    Close,
}

impl PathCommand {
    /// Point where the pen rests after this command (None for `Close`)
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::QuadCurveTo { to, .. } | PathCommand::CubicCurveTo { to, .. } => Some(to),
            PathCommand::ArcTo {
                center,
                radius,
                end_angle,
                ..
            } => Some(center + radius * DVec2::from_angle(end_angle)),
            PathCommand::Close => None,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Smallest rectangle containing all points (None if there are none)
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }
}

/// An ordered sequence of drawing commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight segments through the points, starting with a `MoveTo`
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
    }

    pub fn move_to(&mut self, p: Point) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn quad_to(&mut self, to: Point, control: Point) {
        self.commands.push(PathCommand::QuadCurveTo { to, control });
    }

    pub fn cubic_to(&mut self, to: Point, control1: Point, control2: Point) {
        self.commands.push(PathCommand::CubicCurveTo {
            to,
            control1,
            control2,
        });
    }

    pub fn arc_to(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) {
        self.commands.push(PathCommand::ArcTo {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// End points of all commands in order, skipping `Close`
    pub fn end_points(&self) -> Vec<Point> {
        self.commands.iter().filter_map(PathCommand::end_point).collect()
    }

    /// Bounding box of the path
    ///
    /// Curves contribute their control points (a conservative hull, like a
    /// CoreGraphics `boundingBox`); arcs contribute their exact extent.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut points = Vec::with_capacity(self.commands.len() * 3);
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
                PathCommand::QuadCurveTo { to, control } => {
                    points.push(control);
                    points.push(to);
                }
                PathCommand::CubicCurveTo {
                    to,
                    control1,
                    control2,
                } => {
                    points.push(control1);
                    points.push(control2);
                    points.push(to);
                }
                PathCommand::ArcTo {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    clockwise,
                } => arc_extent(center, radius, start_angle, end_angle, clockwise, &mut points),
                PathCommand::Close => {}
            }
        }
        Rect::from_points(points)
    }

    /// Apply a similarity transform (rotation, uniform scale, translation,
    /// optional reflection) to every command
    pub fn transformed(&self, transform: &DAffine2) -> Self {
        let x_axis = transform.matrix2.x_axis;
        let rotation = x_axis.y.atan2(x_axis.x);
        let det = transform.matrix2.determinant();
        let scale = det.abs().sqrt();
        let mirrored = det < 0.0;

        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(transform.transform_point2(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(transform.transform_point2(p)),
                PathCommand::QuadCurveTo { to, control } => PathCommand::QuadCurveTo {
                    to: transform.transform_point2(to),
                    control: transform.transform_point2(control),
                },
                PathCommand::CubicCurveTo {
                    to,
                    control1,
                    control2,
                } => PathCommand::CubicCurveTo {
                    to: transform.transform_point2(to),
                    control1: transform.transform_point2(control1),
                    control2: transform.transform_point2(control2),
                },
                PathCommand::ArcTo {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    clockwise,
                } => {
                    let map_angle = |angle: f64| {
                        if mirrored {
                            rotation - angle
                        } else {
                            rotation + angle
                        }
                    };
                    PathCommand::ArcTo {
                        center: transform.transform_point2(center),
                        radius: radius * scale,
                        start_angle: map_angle(start_angle),
                        end_angle: map_angle(end_angle),
                        clockwise: clockwise != mirrored,
                    }
                }
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Self { commands }
    }
}

/// Signed sweep of an arc: positive for increasing angle
fn arc_sweep(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    if clockwise {
        (end_angle - start_angle).rem_euclid(TAU)
    } else {
        -(start_angle - end_angle).rem_euclid(TAU)
    }
}

/// Push the arc's end points and every axis extreme it passes through
fn arc_extent(
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    clockwise: bool,
    out: &mut Vec<Point>,
) {
    out.push(center + radius * DVec2::from_angle(start_angle));
    out.push(center + radius * DVec2::from_angle(end_angle));

    let sweep = arc_sweep(start_angle, end_angle, clockwise).abs();
    for quadrant in 0..4 {
        let angle = quadrant as f64 * FRAC_PI_2;
        let offset = if clockwise {
            (angle - start_angle).rem_euclid(TAU)
        } else {
            (start_angle - angle).rem_euclid(TAU)
        };
        if offset <= sweep {
            out.push(center + radius * DVec2::from_angle(angle));
        }
    }
}

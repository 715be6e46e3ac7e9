//! Variable-width ribbon outline for live stroke rendering
//!
//! Each sample is pushed out to a left and a right edge point along the
//! perpendicular of its local tangent, and the closed outline is built from
//! the two edges: a round cap at the start, quadratic segments along the
//! left edge, a round cap at the end and cubic segments back along the right
//! edge.
//!
//! Building is pure: the same samples always give the same path, and calls
//! on different threads share no state.

use glam::DVec2;
use scribble_config::RibbonConfig;

use crate::constants::LENGTH_EPSILON;
use crate::path::Path;
use crate::recognize::turn_angle;
use crate::types::{Point, SamplePoint};

/// Build the ribbon outline of a stroke with the default corner thresholds
///
/// Fewer than two usable samples give an empty path.
pub fn build_ribbon(points: &[SamplePoint], tension: f64) -> Path {
    RibbonBuilder::new(RibbonConfig {
        tension,
        ..Default::default()
    })
    .build(points)
}

/// Left and right edge points of a stroke, one pair per usable sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonEdges {
    pub left: Vec<Point>,
    pub right: Vec<Point>,
}

impl RibbonEdges {
    /// Total number of edge points on both sides
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Ribbon outline builder
#[derive(Debug, Clone, Default)]
pub struct RibbonBuilder {
    config: RibbonConfig,
}

impl RibbonBuilder {
    pub fn new(config: RibbonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    /// Build the closed outline path
    pub fn build(&self, points: &[SamplePoint]) -> Path {
        let edges = self.edge_points(points);
        let mut path = Path::new();
        if edges.len() <= 2 {
            return path;
        }

        let tension = if self.config.tension.is_finite() && self.config.tension > 0.0 {
            self.config.tension
        } else {
            RibbonConfig::default().tension
        };

        let left = &edges.left;
        let right: Vec<Point> = edges.right.iter().rev().copied().collect();

        // Start cap: from the first right point around to the first left point
        let start = right[right.len() - 1];
        path.move_to(start);
        add_cap(&mut path, start, left[0]);

        let derivatives = central_derivatives(left);
        for i in 1..left.len() {
            let control = left[i - 1] + derivatives[i - 1] / tension;
            path.quad_to(left[i], control);
        }

        add_cap(&mut path, left[left.len() - 1], right[0]);

        let derivatives = central_derivatives(&right);
        for i in 1..right.len() {
            let control1 = right[i - 1] + derivatives[i - 1] / tension;
            let control2 = right[i] - derivatives[i] / tension;
            path.cubic_to(right[i], control1, control2);
        }

        path.close();
        path
    }

    /// Offset every sample to its left and right edge points
    ///
    /// Neighbors are clamped at the ends of the stroke. When the turn at a
    /// sample is nearly straight or folds back sharply, the anchor moves to
    /// the midpoint of its neighbors, which rounds off jitter and spikes.
    /// Samples whose neighbors coincide have no tangent and are skipped.
    pub fn edge_points(&self, points: &[SamplePoint]) -> RibbonEdges {
        let mut edges = RibbonEdges::default();
        if points.len() < 2 {
            return edges;
        }

        for (i, sample) in points.iter().enumerate() {
            let current = sample.position();
            let prev = points[i.saturating_sub(1)].position();
            let next = points[(i + 1).min(points.len() - 1)].position();

            let incoming = current - prev;
            let outgoing = next - current;
            let anchor = if incoming.length() > LENGTH_EPSILON && outgoing.length() > LENGTH_EPSILON {
                let turn = turn_angle(incoming, outgoing);
                if turn < self.config.corner_min_deg || turn > self.config.corner_max_deg {
                    (prev + next) * 0.5
                } else {
                    current
                }
            } else {
                current
            };

            let tangent = next - prev;
            let length = tangent.length();
            if length <= LENGTH_EPSILON {
                continue;
            }
            let perpendicular = DVec2::new(-tangent.y, tangent.x) / length;
            let offset = perpendicular * sample.half_width();

            edges.left.push(anchor + offset);
            edges.right.push(anchor - offset);
        }

        edges
    }
}

/// Half the difference between each point's clamped neighbors
fn central_derivatives(points: &[Point]) -> Vec<DVec2> {
    let last = points.len().saturating_sub(1);
    (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(last)];
            (next - prev) * 0.5
        })
        .collect()
}

/// Semicircular cap from `from` to `to`, bulging away from the stroke body
fn add_cap(path: &mut Path, from: Point, to: Point) {
    let center = (from + to) * 0.5;
    let radius = to.distance(center);
    let start_angle = (from.y - center.y).atan2(from.x - center.x);
    let end_angle = (to.y - center.y).atan2(to.x - center.x);
    path.arc_to(center, radius, start_angle, end_angle, false);
}

//! Stroke lifecycle for the stroke pipeline

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::path::Path;
use crate::refine::RefinedShape;
use crate::types::TouchSample;
use crate::validation::{sanitize_sample, validate_sample, velocity_between};

use super::{FinishedStroke, RibbonJob, RibbonResult, SessionError, StrokePipeline, StrokeState, StrokeUpdate};

impl StrokePipeline {
    /// Begin a stroke at the touch-down sample
    ///
    /// A stroke already in progress is discarded.
    pub fn begin_stroke(&mut self, sample: TouchSample) -> Result<(), SessionError> {
        let sample = accept(sample)?;
        if self.is_stroking() {
            debug!("begin_stroke: discarding unfinished stroke of {} points", self.points.len());
        }

        self.pen.begin_stroke();
        self.points.clear();
        self.points.push(self.pen.sample(&sample));
        self.last_touch = Some(sample);
        self.live_path = Path::new();
        self.refined = None;
        self.generation += 1;
        self.state = StrokeState::Drawing;
        debug!(
            "begin_stroke: ({:.1}, {:.1}) generation={}",
            sample.position.x, sample.position.y, self.generation
        );
        Ok(())
    }

    /// Continue the stroke with a touch-move sample
    ///
    /// Samples within the minimum movement of the previous touch do not
    /// extend the stroke. Otherwise the point is appended and a ribbon job
    /// for the new snapshot is returned.
    pub fn stroke_to(&mut self, sample: TouchSample) -> Result<StrokeUpdate, SessionError> {
        let previous = match (self.is_stroking(), self.last_touch) {
            (true, Some(previous)) => previous,
            _ => {
                debug!("stroke_to: no active stroke, ignoring");
                return Err(SessionError::NotStarted);
            }
        };
        let mut sample = accept(sample)?;
        self.last_touch = Some(sample);

        if previous.position.distance(sample.position) <= self.config.session.min_movement {
            let hold_ready =
                self.state == StrokeState::Drawing && self.points.len() >= self.config.session.min_hold_points;
            return Ok(StrokeUpdate::Stationary { hold_ready });
        }

        if sample.velocity <= 0.0 {
            sample.velocity = velocity_between(
                previous.position,
                previous.timestamp,
                sample.position,
                sample.timestamp,
            );
        }
        let point = self.pen.sample(&sample);
        self.points.push(point);
        self.generation += 1;

        if self.state == StrokeState::Held {
            debug!("stroke_to: movement after hold, dropping refined shape");
            self.state = StrokeState::Drawing;
            self.refined = None;
        }

        Ok(StrokeUpdate::Rebuild(RibbonJob::new(
            self.generation,
            Arc::from(self.points.as_slice()),
            self.ribbon.clone(),
        )))
    }

    /// Apply a finished ribbon build
    ///
    /// Returns false, leaving the live path untouched, when the result is
    /// for an older generation or the stroke is no longer being drawn.
    pub fn apply_ribbon(&mut self, result: RibbonResult) -> bool {
        if result.generation != self.generation || self.state != StrokeState::Drawing {
            trace!(
                "apply_ribbon: discarding generation {} (current {}, {:?})",
                result.generation,
                self.generation,
                self.state
            );
            return false;
        }
        self.live_path = result.path;
        true
    }

    /// The finger was held still since `generation`
    ///
    /// Recognizes and refines the stroke, replacing the live path. Does
    /// nothing for a stale generation or a stroke that is not being drawn.
    pub fn hold_elapsed(&mut self, generation: u64) -> Option<&RefinedShape> {
        if generation != self.generation
            || self.state != StrokeState::Drawing
            || self.points.len() < self.config.session.min_hold_points
        {
            trace!("hold_elapsed: ignoring generation {} (current {})", generation, self.generation);
            return None;
        }

        let positions: Vec<_> = self.points.iter().map(|p| p.position()).collect();
        let shape = self.refiner.recognize_and_refine(&self.recognizer, &positions);
        debug!(
            "hold_elapsed: {} points recognized as {:?}",
            positions.len(),
            shape.kind
        );

        self.live_path = shape.path.clone();
        self.state = StrokeState::Held;
        self.refined = Some(shape);
        self.refined.as_ref()
    }

    /// End the current stroke
    ///
    /// The final path is the refined shape if the stroke was held, otherwise
    /// a ribbon rebuilt from the full buffer. The buffer is cleared.
    pub fn end_stroke(&mut self) -> Result<FinishedStroke, SessionError> {
        if !self.is_stroking() {
            debug!("end_stroke: no active stroke");
            return Err(SessionError::NotStarted);
        }

        let vertices = self.vertices();
        let (path, shape, outline_width) = match self.refined.take() {
            Some(refined) => (refined.path, Some(refined.kind), Some(refined.outline_width)),
            None => (self.ribbon.build(&self.points), None, None),
        };
        let bounds = path.bounding_box();
        let position = bounds.map(|b| b.center());

        debug!(
            "end_stroke: {} points, {} commands, shape={:?}",
            self.points.len(),
            path.len(),
            shape
        );

        self.reset(StrokeState::Ended);
        Ok(FinishedStroke {
            path,
            bounds,
            position,
            shape,
            outline_width,
            vertices,
        })
    }

    /// Cancel the current stroke without producing a path
    pub fn cancel_stroke(&mut self) {
        if self.is_stroking() {
            debug!("cancel_stroke: dropping {} points", self.points.len());
        }
        self.reset(StrokeState::Idle);
    }

    fn reset(&mut self, state: StrokeState) {
        self.pen.end_stroke();
        self.points.clear();
        self.last_touch = None;
        self.live_path = Path::new();
        self.refined = None;
        self.generation += 1;
        self.state = state;
    }
}

/// Validate and clamp a sample, logging the ones that are dropped
fn accept(sample: TouchSample) -> Result<TouchSample, SessionError> {
    if let Err(e) = validate_sample(&sample) {
        warn!("Dropping touch sample: {}", e);
        return Err(e.into());
    }
    Ok(sanitize_sample(&sample))
}

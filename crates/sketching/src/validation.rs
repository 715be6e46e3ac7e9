use crate::types::{Point, TouchSample};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Non-finite sample position: ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },
    #[error("Non-finite sample timestamp: {0}")]
    NonFiniteTimestamp(f64),
}

/// Validate a touch sample before it enters a stroke
///
/// Pressure and velocity are not rejected here; [`sanitize_sample`] maps
/// them into range instead.
pub fn validate_sample(sample: &TouchSample) -> Result<(), ValidationError> {
    if !sample.position.is_finite() {
        return Err(ValidationError::NonFinitePosition {
            x: sample.position.x,
            y: sample.position.y,
        });
    }
    if !sample.timestamp.is_finite() {
        return Err(ValidationError::NonFiniteTimestamp(sample.timestamp));
    }
    Ok(())
}

/// Clamp pressure to 0..=1 and velocity to a finite non-negative value
pub fn sanitize_sample(sample: &TouchSample) -> TouchSample {
    TouchSample {
        pressure: clamp_pressure(sample.pressure),
        velocity: if sample.velocity.is_finite() {
            sample.velocity.max(0.0)
        } else {
            0.0
        },
        ..*sample
    }
}

/// Clamp a pressure ratio into 0..=1, mapping NaN to 0
pub fn clamp_pressure(pressure: f64) -> f64 {
    if pressure.is_nan() {
        0.0
    } else {
        pressure.clamp(0.0, 1.0)
    }
}

/// Divide, resolving a zero or non-finite result to 0
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() { value } else { 0.0 }
}

/// Speed between two samples in units per second (0 if time did not advance)
pub fn velocity_between(previous: Point, previous_time: f64, current: Point, current_time: f64) -> f64 {
    let elapsed = current_time - previous_time;
    if elapsed > 0.0 {
        safe_div(previous.distance(current), elapsed)
    } else {
        0.0
    }
}

//! Pen width model
//!
//! Turns touch samples into [`SamplePoint`]s: the raw ink width comes from
//! pressure when the device reports it and from speed otherwise, and each
//! new width is blended with the previous point's width so the outline does
//! not jitter between samples.

use scribble_config::PenConfig;
use tracing::trace;

use crate::types::{SamplePoint, TouchSample};
use crate::validation::clamp_pressure;

/// Full ink width for the given pressure (0.0-1.0) and speed
///
/// Pressure wins when it is positive. Without pressure, slow strokes are
/// drawn thick and fast strokes thin, with a linear falloff in between.
pub fn raw_width(config: &PenConfig, pressure: f64, speed: f64) -> f64 {
    let pressure = clamp_pressure(pressure);
    if pressure > 0.0 {
        return config.base_width * (1.0 + pressure * config.pressure_gain);
    }

    let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    let ratio = if speed < config.slow_speed {
        config.slow_ratio
    } else if speed < config.fast_speed {
        let band = config.fast_speed - config.slow_speed;
        config.medium_ratio - (speed - config.slow_speed) / band * config.medium_ratio_drop
    } else {
        config.fast_ratio
    };
    config.base_width * ratio
}

/// Pen engine that produces smoothed sample points for one stroke at a time
#[derive(Debug, Clone)]
pub struct PenEngine {
    /// Current pen configuration
    config: PenConfig,
    /// Half-width of the previous point (None if stroke not started)
    last_half_width: Option<f64>,
}

impl PenEngine {
    /// Create a new pen engine with the given configuration
    pub fn new(config: PenConfig) -> Self {
        Self {
            config,
            last_half_width: None,
        }
    }

    /// Get the current configuration
    pub fn config(&self) -> &PenConfig {
        &self.config
    }

    /// Replace the configuration, taking effect from the next sample
    pub fn set_config(&mut self, config: PenConfig) {
        self.config = config;
    }

    /// Start a new stroke
    pub fn begin_stroke(&mut self) {
        self.last_half_width = None;
    }

    /// Convert a touch sample into a stroke point
    ///
    /// The first point of a stroke keeps its raw width; later points use
    /// `smoothing * previous + (1 - smoothing) * raw`.
    pub fn sample(&mut self, sample: &TouchSample) -> SamplePoint {
        let raw_half_width = raw_width(&self.config, sample.pressure, sample.velocity) / 2.0;
        let half_width = match self.last_half_width {
            Some(previous) => {
                previous * self.config.smoothing + raw_half_width * (1.0 - self.config.smoothing)
            }
            None => raw_half_width,
        };

        let point = SamplePoint::new(sample.position, half_width);
        trace!(
            "PenEngine::sample: ({:.1}, {:.1}) raw={:.2} smoothed={:.2}",
            sample.position.x,
            sample.position.y,
            raw_half_width,
            point.half_width()
        );
        self.last_half_width = Some(point.half_width());
        point
    }

    /// End the current stroke
    pub fn end_stroke(&mut self) {
        self.last_half_width = None;
    }
}

impl Default for PenEngine {
    fn default() -> Self {
        Self::new(PenConfig::default())
    }
}

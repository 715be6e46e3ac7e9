//! Shared configuration for Scribble
//!
//! This crate provides the single source of truth for the stroke engine's
//! tuning values: the pen width model, ribbon construction, shape recognition
//! thresholds, shape refinement and the live stroke session timings.
//!
//! The recognition thresholds are empirical. They are kept here, away from
//! the control flow in the `sketching` crate, so they can be recalibrated
//! without touching the algorithms.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default ribbon spline tension (control points use `derivative / tension`)
pub const DEFAULT_TENSION: f64 = 2.0;

/// Default Douglas-Peucker tolerance used before recognition and refinement
pub const DEFAULT_SIMPLIFY_EPSILON: f64 = 15.0;

/// Weight of the previous point's width when smoothing a new sample
pub const DEFAULT_WIDTH_SMOOTHING: f64 = 0.85;

/// Minimum touch movement (in surface units) for a sample to extend a stroke
pub const DEFAULT_MIN_MOVEMENT: f64 = 1.0;

/// How long the finger must stay still before the stroke is recognized
pub const DEFAULT_HOLD_DURATION_MS: u64 = 1000;

/// Maximum distance between resampled points of a refined curve
pub const DEFAULT_CURVE_MAX_STEP: f64 = 7.0;

/// Start/end distance under which a refined polygon is closed
pub const DEFAULT_MERGE_DISTANCE: f64 = 50.0;

/// Stroke width the renderer applies to a refined shape outline
pub const DEFAULT_OUTLINE_WIDTH: f64 = 4.0;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Pen width model: maps pressure and speed to an ink width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenConfig {
    /// Base ink width in surface units
    pub base_width: f64,
    /// Extra width per unit of pressure (`base * (1 + pressure * gain)`)
    pub pressure_gain: f64,
    /// Below this speed the pen draws at `slow_ratio`
    pub slow_speed: f64,
    /// Above this speed the pen draws at `fast_ratio`
    pub fast_speed: f64,
    /// Width ratio for slow strokes
    pub slow_ratio: f64,
    /// Width ratio at `slow_speed`, falling linearly by `medium_ratio_drop`
    pub medium_ratio: f64,
    /// Total ratio drop across the medium speed band
    pub medium_ratio_drop: f64,
    /// Width ratio for fast strokes
    pub fast_ratio: f64,
    /// Weight of the previous width in the exponential blend
    pub smoothing: f64,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            base_width: 1.0,
            pressure_gain: 1.2,
            slow_speed: 200.0,
            fast_speed: 600.0,
            slow_ratio: 3.0,
            medium_ratio: 1.5,
            medium_ratio_drop: 0.5,
            fast_ratio: 0.7,
            smoothing: DEFAULT_WIDTH_SMOOTHING,
        }
    }
}

/// Live ribbon outline construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonConfig {
    /// Spline tension, larger values pull control points closer to anchors
    pub tension: f64,
    /// Turn angles below this (degrees) anchor on the neighbors' midpoint
    pub corner_min_deg: f64,
    /// Turn angles above this (degrees) anchor on the neighbors' midpoint
    pub corner_max_deg: f64,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            tension: DEFAULT_TENSION,
            corner_min_deg: 30.0,
            corner_max_deg: 150.0,
        }
    }
}

/// Thresholds of the circle/oval detector
///
/// All gap, deviation and variance values are compared after division by
/// the normalization factor `max(size_factor, diagonal, path_length_weight *
/// path_length)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundShapeThresholds {
    /// Radial distances further than this fraction from the mean are dropped
    pub radial_band: f64,
    /// Weight of the path length in the normalization factor
    pub path_length_weight: f64,

    pub circle_max_gap: f64,
    pub circle_max_std_dev: f64,
    pub circle_max_aspect: f64,
    pub circle_min_path_ratio: f64,

    pub oval_max_gap: f64,
    pub oval_max_std_dev: f64,
    pub oval_min_aspect: f64,
    pub oval_max_aspect: f64,
    pub oval_max_variance: f64,
    pub oval_min_path_ratio: f64,

    pub reject_min_gap: f64,
    pub reject_min_std_dev: f64,
    pub reject_min_aspect: f64,
    pub reject_min_path_ratio: f64,
    pub reject_min_variance: f64,

    pub curve_min_gap: f64,
    pub curve_min_std_dev: f64,
    pub curve_max_path_ratio: f64,
}

impl Default for RoundShapeThresholds {
    fn default() -> Self {
        Self {
            radial_band: 0.2,
            path_length_weight: 0.2,

            circle_max_gap: 1.0,
            circle_max_std_dev: 10.0,
            circle_max_aspect: 1.1,
            circle_min_path_ratio: 2.0,

            oval_max_gap: 1.0,
            oval_max_std_dev: 20.0,
            oval_min_aspect: 1.1,
            oval_max_aspect: 3.5,
            oval_max_variance: 5.5,
            oval_min_path_ratio: 1.8,

            reject_min_gap: 2.0,
            reject_min_std_dev: 30.0,
            reject_min_aspect: 2.0,
            reject_min_path_ratio: 3.5,
            reject_min_variance: 5.5,

            curve_min_gap: 1.0,
            curve_min_std_dev: 30.0,
            curve_max_path_ratio: 2.0,
        }
    }
}

/// Shape classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Douglas-Peucker tolerance applied before classification
    pub simplify_epsilon: f64,
    /// Strokes with fewer raw points are never classified
    pub min_points: usize,
    /// Turns sharper than this (angle magnitude under it, degrees) count as edges
    pub edge_turn_deg: f64,
    /// Maximum edge count of a line
    pub line_max_edges: usize,
    /// Maximum average curvature of a line, also the curve/rectangle split
    pub line_max_curvature: f64,
    /// Circle/oval detector thresholds
    pub round: RoundShapeThresholds,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            simplify_epsilon: DEFAULT_SIMPLIFY_EPSILON,
            min_points: 4,
            edge_turn_deg: 150.0,
            line_max_edges: 2,
            line_max_curvature: 60.0,
            round: RoundShapeThresholds::default(),
        }
    }
}

/// Shape refinement settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConfig {
    /// Douglas-Peucker tolerance applied to the refinement input
    pub simplify_epsilon: f64,
    /// Line segments within this many degrees of an axis snap to it
    pub snap_tolerance_deg: f64,
    /// Maximum distance between resampled curve points
    pub curve_max_step: f64,
    /// Start/end distance under which polygons are closed
    pub merge_distance: f64,
    /// Stroke width for rendering the refined outline
    pub outline_width: f64,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            simplify_epsilon: DEFAULT_SIMPLIFY_EPSILON,
            snap_tolerance_deg: 15.0,
            curve_max_step: DEFAULT_CURVE_MAX_STEP,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            outline_width: DEFAULT_OUTLINE_WIDTH,
        }
    }
}

/// Live stroke session timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Movements at or below this distance do not extend the stroke
    pub min_movement: f64,
    /// Stillness required before recognition runs
    pub hold_duration_ms: u64,
    /// Minimum buffered points before the hold timer may be armed
    pub min_hold_points: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_movement: DEFAULT_MIN_MOVEMENT,
            hold_duration_ms: DEFAULT_HOLD_DURATION_MS,
            min_hold_points: 2,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pen: PenConfig,
    pub ribbon: RibbonConfig,
    pub recognizer: RecognizerConfig,
    pub refiner: RefinerConfig,
    pub session: SessionConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ribbon.tension > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "ribbon.tension",
                reason: format!("must be positive, got {}", self.ribbon.tension),
            });
        }
        if !(0.0..=1.0).contains(&self.pen.smoothing) {
            return Err(ConfigError::InvalidValue {
                field: "pen.smoothing",
                reason: format!("must be within 0..=1, got {}", self.pen.smoothing),
            });
        }
        if self.pen.base_width < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pen.base_width",
                reason: format!("must not be negative, got {}", self.pen.base_width),
            });
        }
        if !(self.refiner.curve_max_step > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "refiner.curve_max_step",
                reason: format!("must be positive, got {}", self.refiner.curve_max_step),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.ribbon.tension, DEFAULT_TENSION);
        assert_eq!(config.recognizer.simplify_epsilon, 15.0);
        assert_eq!(config.refiner.merge_distance, 50.0);
        assert_eq!(config.session.hold_duration_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_round_thresholds_match_tuning() {
        let round = RoundShapeThresholds::default();
        assert_eq!(round.circle_max_aspect, 1.1);
        assert_eq!(round.oval_max_aspect, 3.5);
        assert_eq!(round.oval_max_variance, 5.5);
        assert_eq!(round.reject_min_std_dev, 30.0);
        assert_eq!(round.curve_max_path_ratio, 2.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "refiner": { "merge_distance": 20.0 } }"#).unwrap();
        assert_eq!(config.refiner.merge_distance, 20.0);
        assert_eq!(config.refiner.curve_max_step, DEFAULT_CURVE_MAX_STEP);
        assert_eq!(config.recognizer, RecognizerConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = EngineConfig::default();
        config.recognizer.round.circle_max_aspect = 1.2;
        let json = config.to_json_string().unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_tension_rejected() {
        let result = EngineConfig::from_json_str(r#"{ "ribbon": { "tension": 0.0 } }"#);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "ribbon.tension",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}

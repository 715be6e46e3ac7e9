//! Live stroke pipeline
//!
//! This module owns the state of the stroke being drawn and connects:
//! - Input handling (touch samples via `begin_stroke`, `stroke_to`, `end_stroke`)
//! - Pen engine (smoothed ink widths)
//! - Ribbon builder (live outline, built off the owning thread as a [`RibbonJob`])
//! - Shape recognizer and refiner (after the finger is held still)
//!
//! The pipeline itself is synchronous and single-owner. Every change to the
//! stroke bumps a generation counter; ribbon results and hold timeouts carry
//! the generation they were started for and are dropped when it is stale.

mod job;
mod stroke;

use scribble_config::EngineConfig;
use thiserror::Error;

use crate::path::{Path, Rect};
use crate::pen::PenEngine;
use crate::recognize::ShapeRecognizer;
use crate::refine::{RefinedShape, ShapeRefiner};
use crate::ribbon::RibbonBuilder;
use crate::types::{Point, SamplePoint, ShapeKind, StrokeVertex, TouchSample};
use crate::validation::ValidationError;

pub use job::{RibbonJob, RibbonResult};

/// Error type for stroke session operations
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("No active stroke - call begin_stroke() first")]
    NotStarted,
    #[error("Sample rejected: {0}")]
    InvalidSample(#[from] ValidationError),
}

/// Lifecycle of the current stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    /// No stroke has been started
    #[default]
    Idle,
    /// Finger down, samples are being added
    Drawing,
    /// The finger was held still and the stroke was replaced by a refined shape
    Held,
    /// The stroke was finalized
    Ended,
}

/// What a new touch sample did to the stroke
#[derive(Debug, Clone)]
pub enum StrokeUpdate {
    /// The touch did not move far enough to extend the stroke
    Stationary {
        /// Whether a hold timer may be armed now
        hold_ready: bool,
    },
    /// A point was added; the live outline should be rebuilt
    Rebuild(RibbonJob),
}

/// A completed stroke, ready to be handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedStroke {
    /// Final outline or refined shape
    pub path: Path,
    /// Bounding box of `path` (None when the path is empty)
    pub bounds: Option<Rect>,
    /// Center of `bounds`, where the stroke's layer is positioned
    pub position: Option<Point>,
    /// Recognized shape when the stroke was refined
    pub shape: Option<ShapeKind>,
    /// Outline width to stroke a refined path with
    pub outline_width: Option<f64>,
    /// Per-point width data of the raw stroke
    pub vertices: Vec<StrokeVertex>,
}

/// Stroke pipeline for one drawing surface
///
/// This struct manages the stroke workflow:
/// 1. Input comes in via `begin_stroke`, `stroke_to`, `end_stroke`
/// 2. The pen engine turns samples into smoothed stroke points
/// 3. Each new point produces a ribbon job; its result is applied with
///    `apply_ribbon` if still current
/// 4. A hold timeout (`hold_elapsed`) swaps the outline for a refined shape
/// 5. `end_stroke` produces the final path
pub struct StrokePipeline {
    pub(crate) config: EngineConfig,
    pub(crate) pen: PenEngine,
    pub(crate) ribbon: RibbonBuilder,
    pub(crate) recognizer: ShapeRecognizer,
    pub(crate) refiner: ShapeRefiner,
    pub(crate) state: StrokeState,
    /// Stroke buffer (append-only while drawing)
    pub(crate) points: Vec<SamplePoint>,
    /// Previous accepted touch, moved or not
    pub(crate) last_touch: Option<TouchSample>,
    pub(crate) generation: u64,
    /// Path currently shown for the stroke
    pub(crate) live_path: Path,
    pub(crate) refined: Option<RefinedShape>,
}

impl StrokePipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pen: PenEngine::new(config.pen.clone()),
            ribbon: RibbonBuilder::new(config.ribbon.clone()),
            recognizer: ShapeRecognizer::new(config.recognizer.clone()),
            refiner: ShapeRefiner::new(config.refiner.clone()),
            config,
            state: StrokeState::Idle,
            points: Vec::new(),
            last_touch: None,
            generation: 0,
            live_path: Path::new(),
            refined: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> StrokeState {
        self.state
    }

    /// Generation of the current stroke contents
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Points buffered for the current stroke
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Path currently shown for the stroke
    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    /// Refined shape, if the stroke was held
    pub fn refined(&self) -> Option<&RefinedShape> {
        self.refined.as_ref()
    }

    /// Per-point width data of the current stroke for GPU upload
    pub fn vertices(&self) -> Vec<StrokeVertex> {
        self.points.iter().map(StrokeVertex::from).collect()
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        matches!(self.state, StrokeState::Drawing | StrokeState::Held)
    }
}

impl Default for StrokePipeline {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

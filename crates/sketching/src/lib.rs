//! Scribble sketching engine - stroke geometry and shape recognition
//!
//! This crate turns a stream of touch samples into ink:
//! - [`types::SamplePoint`] - A stroke point with its smoothed ink half-width
//! - [`types::StrokeVertex`] - Per-point width data (GPU-compatible with bytemuck)
//! - [`pen`] - Width model from pressure and speed
//! - [`path`] - Drawing-command paths handed to the renderer
//! - [`ribbon`] - Variable-width outline of a live stroke
//! - [`simplify`] - Douglas-Peucker polyline simplification
//! - [`recognize`] - Classification into lines, curves, polygons and round shapes
//! - [`refine`] - Idealized replacement paths for recognized shapes
//! - [`pipeline`] - Stroke state machine with stale-result handling
//! - [`surface`] - Tokio driver for off-thread builds and the hold timer
//! - [`validation`] - Sample checks and safe arithmetic

pub mod constants;
pub mod path;
pub mod pen;
pub mod pipeline;
pub mod recognize;
pub mod refine;
pub mod ribbon;
pub mod simplify;
pub mod surface;
pub mod types;
pub mod validation;

pub use constants::*;
pub use path::*;
pub use pen::*;
pub use pipeline::*;
pub use recognize::*;
pub use refine::*;
pub use ribbon::*;
pub use simplify::*;
pub use surface::*;
pub use types::*;
pub use validation::*;

//! Off-thread ribbon builds

use std::sync::Arc;

use crate::path::Path;
use crate::ribbon::RibbonBuilder;
use crate::types::SamplePoint;

/// Snapshot of a stroke to build a ribbon outline from
///
/// Owns everything it needs, so it can be moved to a worker thread while
/// the pipeline keeps accepting samples.
#[derive(Debug, Clone)]
pub struct RibbonJob {
    generation: u64,
    points: Arc<[SamplePoint]>,
    builder: RibbonBuilder,
}

impl RibbonJob {
    pub(crate) fn new(generation: u64, points: Arc<[SamplePoint]>, builder: RibbonBuilder) -> Self {
        Self {
            generation,
            points,
            builder,
        }
    }

    /// Stroke generation the snapshot was taken at
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Build the outline
    pub fn run(&self) -> RibbonResult {
        RibbonResult {
            generation: self.generation,
            path: self.builder.build(&self.points),
        }
    }
}

/// Finished ribbon outline, tagged with the generation it was built for
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonResult {
    pub generation: u64,
    pub path: Path,
}

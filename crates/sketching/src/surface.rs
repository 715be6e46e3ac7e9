//! Async drawing surface driver
//!
//! Wraps a [`StrokePipeline`] for use from a Tokio runtime. Ribbon builds
//! run on the blocking pool and the hold timer on a spawned task; both
//! report back over an unbounded channel, and their results are applied
//! only on the task that owns the surface (`next_update` / `drain_updates`).
//!
//! All touch methods must be called from within a Tokio runtime.

use std::time::Duration;

use scribble_config::EngineConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::path::Path;
use crate::pipeline::{FinishedStroke, RibbonJob, RibbonResult, SessionError, StrokePipeline, StrokeUpdate};
use crate::refine::RefinedShape;
use crate::types::TouchSample;

/// Completion reported by background work
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    RibbonBuilt(RibbonResult),
    HoldElapsed { generation: u64 },
}

/// Visible change produced by applying a [`SurfaceEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceUpdate {
    /// The live outline was replaced
    LivePath(Path),
    /// The stroke was replaced by a refined shape
    Refined(RefinedShape),
    /// The event was stale and had no effect
    Discarded,
}

/// Pending hold timeout for one stroke generation
struct HoldTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl HoldTimer {
    fn arm(generation: u64, duration: Duration, events: mpsc::UnboundedSender<SurfaceEvent>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = events.send(SurfaceEvent::HoldElapsed { generation });
        });
        Self { generation, handle }
    }

    fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    fn cancel(self) {
        self.handle.abort();
    }
}

/// Drawing surface for one active touch
pub struct DrawingSurface {
    pipeline: StrokePipeline,
    events_tx: mpsc::UnboundedSender<SurfaceEvent>,
    events_rx: mpsc::UnboundedReceiver<SurfaceEvent>,
    hold_timer: Option<HoldTimer>,
    hold_duration: Duration,
}

impl DrawingSurface {
    /// Create a surface with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let hold_duration = Duration::from_millis(config.session.hold_duration_ms);
        Self {
            pipeline: StrokePipeline::new(config),
            events_tx,
            events_rx,
            hold_timer: None,
            hold_duration,
        }
    }

    /// Get reference to the stroke pipeline
    pub fn pipeline(&self) -> &StrokePipeline {
        &self.pipeline
    }

    /// Path currently shown for the stroke
    pub fn live_path(&self) -> &Path {
        self.pipeline.live_path()
    }

    /// Whether a hold timeout is pending
    pub fn hold_armed(&self) -> bool {
        self.hold_timer.as_ref().is_some_and(HoldTimer::is_pending)
    }

    /// Finger down: start a new stroke
    pub fn touch_down(&mut self, sample: TouchSample) -> Result<(), SessionError> {
        self.cancel_hold_timer();
        self.pipeline.begin_stroke(sample)
    }

    /// Finger moved
    ///
    /// Qualifying movement cancels the hold timer and starts a ribbon
    /// build. A stationary touch arms the hold timer when the stroke is
    /// ready and no timer is pending.
    pub fn touch_moved(&mut self, sample: TouchSample) -> Result<(), SessionError> {
        match self.pipeline.stroke_to(sample)? {
            StrokeUpdate::Stationary { hold_ready } => {
                if hold_ready && !self.hold_armed() {
                    let generation = self.pipeline.generation();
                    debug!("touch_moved: arming hold timer for generation {}", generation);
                    self.hold_timer = Some(HoldTimer::arm(
                        generation,
                        self.hold_duration,
                        self.events_tx.clone(),
                    ));
                }
            }
            StrokeUpdate::Rebuild(job) => {
                self.cancel_hold_timer();
                self.spawn_ribbon(job);
            }
        }
        Ok(())
    }

    /// Finger lifted: finalize the stroke
    ///
    /// Ribbon builds still in flight are discarded when they arrive.
    pub fn touch_up(&mut self) -> Result<FinishedStroke, SessionError> {
        self.cancel_hold_timer();
        self.pipeline.end_stroke()
    }

    /// Touch cancelled by the system: drop the stroke
    pub fn touch_cancelled(&mut self) {
        self.cancel_hold_timer();
        self.pipeline.cancel_stroke();
    }

    /// Wait for the next background completion and apply it
    pub async fn next_update(&mut self) -> Option<SurfaceUpdate> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Apply every completion that has already arrived
    pub fn drain_updates(&mut self) -> Vec<SurfaceUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            updates.push(self.apply(event));
        }
        updates
    }

    fn apply(&mut self, event: SurfaceEvent) -> SurfaceUpdate {
        match event {
            SurfaceEvent::RibbonBuilt(result) => {
                if self.pipeline.apply_ribbon(result) {
                    SurfaceUpdate::LivePath(self.pipeline.live_path().clone())
                } else {
                    SurfaceUpdate::Discarded
                }
            }
            SurfaceEvent::HoldElapsed { generation } => {
                if self
                    .hold_timer
                    .as_ref()
                    .is_some_and(|timer| timer.generation == generation)
                {
                    self.hold_timer = None;
                }
                match self.pipeline.hold_elapsed(generation) {
                    Some(shape) => SurfaceUpdate::Refined(shape.clone()),
                    None => SurfaceUpdate::Discarded,
                }
            }
        }
    }

    fn spawn_ribbon(&self, job: RibbonJob) {
        let events = self.events_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = job.run();
            let _ = events.send(SurfaceEvent::RibbonBuilt(result));
        });
    }

    fn cancel_hold_timer(&mut self) {
        if let Some(timer) = self.hold_timer.take() {
            trace!("Cancelling hold timer for generation {}", timer.generation);
            timer.cancel();
        }
    }
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

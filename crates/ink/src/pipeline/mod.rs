//! Complete ink pipeline
//!
//! This module connects:
//! - The stroke log (canonical history, undo/redo flags)
//! - Per-author curve fitting and stepping
//! - The rasterizer and the shared canvas
//! - Dirty rectangle tracking for incremental redisplay
//!
//! Every mutating call runs to completion before the next one; the pipeline
//! is `&mut`-driven and holds no locks. Hosts that need threads wrap the
//! whole pipeline in one mutex.

mod render;
mod stroke;
mod surface_ops;
mod undo;

use std::collections::HashMap;
use std::sync::Arc;

use ballpoint_config::{CanvasConfig, InkSettings};

use crate::error::InkError;
use crate::log::{Snapshot, StrokeLog};
use crate::raster::{Patch, PatchAccumulator};
use crate::surface::InkSurface;
use crate::texture::InkTexture;
use crate::types::{AuthorId, Pen, Point, Rgb};

use render::StrokeRenderer;

/// Result of a begin/extend/end call
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeUpdate {
    /// Position of the stroke in the global log
    pub index: usize,
    /// Region to redisplay, if a segment was drawn
    pub patch: Option<Patch>,
}

/// The operations a host drives the engine through.
pub trait InkEngine {
    fn begin_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError>;
    fn extend_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError>;
    fn end_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError>;
    /// Returns a full-canvas patch when something changed
    fn undo(&mut self, author: &AuthorId) -> Result<Option<Patch>, InkError>;
    fn redo(&mut self, author: &AuthorId) -> Result<Option<Patch>, InkError>;
    fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<Patch, InkError>;
    fn take_snapshot(&self) -> Snapshot;
}

/// Ink pipeline for one shared canvas
pub struct InkPipeline {
    pub(crate) renderer: StrokeRenderer,
    pub(crate) log: StrokeLog,
    /// Selected pen per author, applied to their next stroke
    pub(crate) pens: HashMap<AuthorId, Pen>,
    pub(crate) patches: PatchAccumulator,
    pub(crate) paper: Rgb,
}

impl InkPipeline {
    /// Create a pipeline drawing with `texture`, which may be shared with
    /// other pipelines.
    pub fn new(canvas: CanvasConfig, settings: InkSettings, texture: Arc<InkTexture>) -> Self {
        let [r, g, b] = canvas.paper;
        let paper = Rgb::new(r, g, b);
        Self {
            renderer: StrokeRenderer::new(
                InkSurface::new(canvas.width, canvas.height, paper),
                texture,
                settings,
            ),
            log: StrokeLog::new(),
            pens: HashMap::new(),
            patches: PatchAccumulator::new(settings.patch_margin),
            paper,
        }
    }

    /// Default canvas and settings with a freshly built texture
    pub fn with_defaults() -> Self {
        let settings = InkSettings::default();
        let texture = Arc::new(InkTexture::initialized(&settings));
        Self::new(CanvasConfig::default(), settings, texture)
    }

    /// Seed every author's grain from `seed` instead of entropy.
    ///
    /// Makes rendering reproducible, including across full redraws.
    pub fn with_grain_seed(mut self, seed: u64) -> Self {
        self.renderer.grain_seed = Some(seed);
        self.renderer.curves.clear();
        self
    }

    /// Get the surface width
    pub fn width(&self) -> u32 {
        self.renderer.surface.width
    }

    /// Get the surface height
    pub fn height(&self) -> u32 {
        self.renderer.surface.height
    }

    pub fn surface(&self) -> &InkSurface {
        &self.renderer.surface
    }

    pub fn texture(&self) -> &Arc<InkTexture> {
        &self.renderer.texture
    }

    pub fn settings(&self) -> &InkSettings {
        &self.renderer.settings
    }

    pub fn paper(&self) -> Rgb {
        self.paper
    }

    /// Get reference to stroke log
    pub fn log(&self) -> &StrokeLog {
        &self.log
    }

    /// Mutable log access, for registering listeners
    pub fn log_mut(&mut self) -> &mut StrokeLog {
        &mut self.log
    }

    /// Pen the author's next stroke will use
    pub fn pen(&self, author: &AuthorId) -> Pen {
        self.pens.get(author).copied().unwrap_or_default()
    }
}

impl std::fmt::Debug for InkPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InkPipeline")
            .field("surface", &self.renderer.surface)
            .field("log", &self.log)
            .field("authors", &self.renderer.curves.len())
            .finish()
    }
}

impl InkEngine for InkPipeline {
    fn begin_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError> {
        InkPipeline::begin_stroke(self, author, point)
    }

    fn extend_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError> {
        InkPipeline::extend_stroke(self, author, point)
    }

    fn end_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError> {
        InkPipeline::end_stroke(self, author, point)
    }

    fn undo(&mut self, author: &AuthorId) -> Result<Option<Patch>, InkError> {
        InkPipeline::undo(self, author)
    }

    fn redo(&mut self, author: &AuthorId) -> Result<Option<Patch>, InkError> {
        InkPipeline::redo(self, author)
    }

    fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<Patch, InkError> {
        InkPipeline::load_snapshot(self, snapshot)
    }

    fn take_snapshot(&self) -> Snapshot {
        InkPipeline::take_snapshot(self)
    }
}

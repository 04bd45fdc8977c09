//! Canvas, grain texture and per-author curve states
//!
//! Kept apart from the log so a full redraw can walk the log while
//! drawing into the canvas.

use std::collections::HashMap;
use std::sync::Arc;

use ballpoint_config::InkSettings;

use crate::curve::{BezierSegment, CurveState, SegmentBounds};
use crate::error::InkError;
use crate::raster::Rasterizer;
use crate::surface::InkSurface;
use crate::texture::InkTexture;
use crate::types::{AuthorId, Pen, Point, Rgb, Stroke};

pub(crate) struct StrokeRenderer {
    pub(crate) surface: InkSurface,
    pub(crate) texture: Arc<InkTexture>,
    pub(crate) curves: HashMap<AuthorId, CurveState>,
    pub(crate) settings: InkSettings,
    /// Seeds grain per author when set; entropy otherwise
    pub(crate) grain_seed: Option<u64>,
}

impl StrokeRenderer {
    pub(crate) fn new(surface: InkSurface, texture: Arc<InkTexture>, settings: InkSettings) -> Self {
        Self {
            surface,
            texture,
            curves: HashMap::new(),
            settings,
            grain_seed: None,
        }
    }

    /// Drawing needs the grain table
    pub(crate) fn ensure_ready(&self) -> Result<(), InkError> {
        if self.texture.is_initialized() {
            Ok(())
        } else {
            Err(InkError::NotInitialized)
        }
    }

    /// Curve state for `author`, created on first use
    pub(crate) fn curve_mut(&mut self, author: &AuthorId) -> &mut CurveState {
        let settings = &self.settings;
        let grain_seed = self.grain_seed;
        self.curves.entry(author.clone()).or_insert_with(|| match grain_seed {
            Some(seed) => CurveState::with_seed(settings, author_seed(seed, author)),
            None => CurveState::new(settings),
        })
    }

    /// Drop every curve state and repaint the paper
    pub(crate) fn reset(&mut self, paper: Rgb) {
        self.surface.clear(paper);
        self.curves.clear();
    }

    pub(crate) fn begin(&mut self, author: &AuthorId, pen: Pen, point: Point) {
        let curve = self.curve_mut(author);
        curve.set_pen(pen);
        curve.begin_stroke(point);
    }

    /// Feed a sample to the author's curve. Hidden strokes keep fitting
    /// and spacing but leave the canvas untouched.
    pub(crate) fn extend(
        &mut self,
        author: &AuthorId,
        point: Point,
        visible: bool,
    ) -> Result<Option<SegmentBounds>, InkError> {
        match self.curve_mut(author).extend_stroke(point) {
            Some(segment) => self.draw(author, &segment, visible),
            None => Ok(None),
        }
    }

    pub(crate) fn end(
        &mut self,
        author: &AuthorId,
        point: Point,
        visible: bool,
    ) -> Result<Option<SegmentBounds>, InkError> {
        match self.curve_mut(author).end_stroke(point) {
            Some(segment) => self.draw(author, &segment, visible),
            None => Ok(None),
        }
    }

    /// Step one segment and, if `visible`, stamp it with the author's pen
    fn draw(
        &mut self,
        author: &AuthorId,
        segment: &BezierSegment,
        visible: bool,
    ) -> Result<Option<SegmentBounds>, InkError> {
        let curve = self.curves.entry(author.clone()).or_insert_with(|| CurveState::new(&self.settings));
        let steps = curve.step_segment(segment);
        if !visible {
            return Ok(None);
        }
        let (pen, rng) = curve.pen_and_rng();
        Rasterizer::new(&self.texture).draw_steps(&mut self.surface, rng, pen, &steps)?;
        Ok(Some(segment.bounds()))
    }

    /// Feed a logged stroke through the fitter with its own pen.
    ///
    /// Closed strokes need two points to draw anything. An open stroke is
    /// replayed without its end so live input can continue it. Hidden
    /// strokes only rebuild the curve state.
    pub(crate) fn replay(&mut self, stroke: &Stroke, open: bool) -> Result<usize, InkError> {
        let points = &stroke.points;
        let Some((first, rest)) = points.split_first() else {
            return Ok(0);
        };
        if !open && rest.is_empty() {
            return Ok(0);
        }

        let visible = stroke.done;
        self.begin(&stroke.author, stroke.pen(), *first);
        let mut segments = 0;
        let (middle, last) = match (open, rest.split_last()) {
            (false, Some((last, middle))) => (middle, Some(*last)),
            _ => (rest, None),
        };
        for point in middle {
            if self.extend(&stroke.author, *point, visible)?.is_some() {
                segments += 1;
            }
        }
        if let Some(point) = last {
            if self.end(&stroke.author, point, visible)?.is_some() {
                segments += 1;
            }
        }
        Ok(segments)
    }
}

/// FNV-1a of the author id mixed into the base seed, so each author's grain
/// is reproducible across full redraws
fn author_seed(seed: u64, author: &AuthorId) -> u64 {
    author
        .as_str()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
        })
        ^ seed
}

//! Persistence, pen selection and event dispatch for the ink pipeline

use tracing::{debug, info, warn};

use crate::error::InkError;
use crate::events::{InkEvent, InkNotification, InkOutcome};
use crate::log::Snapshot;
use crate::raster::Patch;
use crate::surface::InkSurface;
use crate::types::{AuthorId, Point, Rgb};
use crate::validation::validate_nib;

use super::{InkPipeline, StrokeUpdate};

impl InkPipeline {
    /// Copy the canvas extent and the full log
    pub fn take_snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.width(),
            self.height(),
            self.log.strokes().to_vec(),
            self.log.total_strokes(),
        )
    }

    /// Replace the log with `snapshot` and repaint.
    ///
    /// The snapshot is validated before anything changes. A different extent
    /// reallocates the canvas.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<Patch, InkError> {
        self.renderer.ensure_ready()?;
        snapshot.validate()?;

        if snapshot.width != self.width() || snapshot.height != self.height() {
            self.renderer.surface = InkSurface::new(snapshot.width, snapshot.height, self.paper);
        }
        info!(
            "load_snapshot: {}x{}, {} strokes ({} finished)",
            snapshot.width,
            snapshot.height,
            snapshot.global.len(),
            snapshot.total_strokes
        );
        self.log.replace(snapshot.global, snapshot.total_strokes);
        self.draw_all()
    }

    /// Parse a persisted envelope and load it
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<Patch, InkError> {
        let snapshot = Snapshot::from_json(json)?;
        self.load_snapshot(snapshot)
    }

    /// Current state as a persisted envelope
    pub fn snapshot_json(&self) -> Result<String, InkError> {
        Ok(self.take_snapshot().to_json()?)
    }

    /// Select the pen color for `author` from a hex string.
    ///
    /// On a malformed string the previous color stays selected.
    pub fn set_color(&mut self, author: &AuthorId, hex: &str) -> Result<Rgb, InkError> {
        let color = Rgb::from_hex(hex).inspect_err(|err| {
            warn!("set_color: keeping previous color for {}: {}", author, err);
        })?;
        self.pens.entry(author.clone()).or_default().color = color;
        debug!("set_color: {} -> {}", author, color.to_hex());
        Ok(color)
    }

    /// Select the nib multiplier for `author`
    pub fn set_nib(&mut self, author: &AuthorId, nib: f64) -> Result<(), InkError> {
        validate_nib(nib)?;
        self.pens.entry(author.clone()).or_default().nib = nib;
        debug!("set_nib: {} -> {}", author, nib);
        Ok(())
    }

    /// Use every `sample_rate`-th raw sample for fitting (minimum 1).
    ///
    /// Applies to strokes in progress as well as new ones.
    pub fn set_sample_rate(&mut self, sample_rate: u64) {
        let sample_rate = sample_rate.max(1);
        self.renderer.settings.sample_rate = sample_rate;
        for curve in self.renderer.curves.values_mut() {
            curve.set_sample_rate(sample_rate);
        }
        debug!("set_sample_rate: {}", sample_rate);
    }

    /// Apply one event and report what it produced.
    ///
    /// Pointer events yield a notification carrying the stroke's global
    /// index plus the patch of any segment drawn. Undo, redo and draw-all
    /// yield a full-canvas patch and a `DrawAll` notification when the log
    /// changed.
    pub fn handle(&mut self, event: InkEvent) -> Result<InkOutcome, InkError> {
        let mut outcome = InkOutcome::default();
        match event {
            InkEvent::PointerDown {
                x,
                y,
                p,
                author_id,
                color,
                nib,
            } => {
                if let Some(nib) = nib {
                    self.set_nib(&author_id, nib)?;
                }
                if let Some(color) = color {
                    self.pens.entry(author_id.clone()).or_default().color = color;
                }
                let update = self.begin_stroke(&author_id, Point::new(x, y, p))?;
                push_update(&mut outcome, update, |index| InkNotification::BeginStroke {
                    x,
                    y,
                    p,
                    author_id,
                    index,
                });
            }
            InkEvent::PointerMove { x, y, p, author_id } => {
                let update = self.extend_stroke(&author_id, Point::new(x, y, p))?;
                push_update(&mut outcome, update, |index| InkNotification::ExtendStroke {
                    x,
                    y,
                    p,
                    author_id,
                    index,
                });
            }
            InkEvent::PointerUp { x, y, p, author_id } => {
                let update = self.end_stroke(&author_id, Point::new(x, y, p))?;
                push_update(&mut outcome, update, |index| InkNotification::EndStroke {
                    x,
                    y,
                    p,
                    author_id,
                    index,
                });
            }
            InkEvent::Undo { author_id } => {
                if let Some(patch) = self.undo(&author_id)? {
                    outcome.notifications.push(InkNotification::DrawAll);
                    outcome.patches.push(patch);
                }
            }
            InkEvent::Redo { author_id } => {
                if let Some(patch) = self.redo(&author_id)? {
                    outcome.notifications.push(InkNotification::DrawAll);
                    outcome.patches.push(patch);
                }
            }
            InkEvent::DrawAll => {
                outcome.patches.push(self.draw_all()?);
            }
            InkEvent::ColorSelected { author_id, color } => {
                self.set_color(&author_id, &color)?;
            }
            InkEvent::NibSelected { author_id, nib } => {
                self.set_nib(&author_id, nib)?;
            }
        }
        Ok(outcome)
    }
}

fn push_update(
    outcome: &mut InkOutcome,
    update: StrokeUpdate,
    notification: impl FnOnce(usize) -> InkNotification,
) {
    outcome.notifications.push(notification(update.index));
    outcome.patches.extend(update.patch);
}

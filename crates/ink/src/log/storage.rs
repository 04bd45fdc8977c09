//! Append-only stroke storage with per-author undo/redo.

use std::collections::HashMap;

use tracing::debug;

use crate::error::InkError;
use crate::types::{AuthorId, Pen, Point, Stroke};

use super::events::StrokeLogEvent;

/// The canonical stroke history.
///
/// `global` holds every stroke in creation order and is only ever appended
/// to; undo/redo flip `done` flags in place. The per-author lists are a
/// secondary index of positions into `global`, never copies, and are rebuilt
/// from it when a snapshot is loaded.
pub struct StrokeLog {
    global: Vec<Stroke>,
    by_author: HashMap<AuthorId, Vec<usize>>,
    /// Open stroke per author, between begin and end
    active: HashMap<AuthorId, usize>,
    total_strokes: u64,
    #[allow(clippy::type_complexity)]
    event_listeners: Vec<Box<dyn Fn(&StrokeLogEvent) + Send + Sync>>,
}

impl std::fmt::Debug for StrokeLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeLog")
            .field("stroke_count", &self.global.len())
            .field("author_count", &self.by_author.len())
            .field("total_strokes", &self.total_strokes)
            .field("listener_count", &self.event_listeners.len())
            .finish()
    }
}

impl Default for StrokeLog {
    fn default() -> Self {
        Self {
            global: Vec::new(),
            by_author: HashMap::new(),
            active: HashMap::new(),
            total_strokes: 0,
            event_listeners: Vec::new(),
        }
    }
}

impl StrokeLog {
    /// Create a new empty stroke log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted strokes.
    ///
    /// Per-author lists are derived from `global`; no stroke is open.
    pub fn from_parts(global: Vec<Stroke>, total_strokes: u64) -> Self {
        let mut log = Self {
            global,
            total_strokes,
            ..Self::default()
        };
        log.reindex();
        log
    }

    /// Swap in persisted strokes, keeping registered listeners.
    pub fn replace(&mut self, global: Vec<Stroke>, total_strokes: u64) {
        self.global = global;
        self.total_strokes = total_strokes;
        self.active.clear();
        self.reindex();
        self.emit_event(StrokeLogEvent::Replaced {
            strokes: self.global.len(),
        });
    }

    fn reindex(&mut self) {
        self.by_author.clear();
        for (index, stroke) in self.global.iter().enumerate() {
            self.by_author
                .entry(stroke.author.clone())
                .or_default()
                .push(index);
        }
    }

    /// Open a visible stroke for `author`. Returns its global index.
    pub fn begin(&mut self, author: &AuthorId, pen: Pen, point: Point) -> usize {
        let index = self.global.len();
        self.global.push(Stroke::begin(author.clone(), pen, point));
        self.by_author.entry(author.clone()).or_default().push(index);
        if let Some(previous) = self.active.insert(author.clone(), index) {
            debug!("StrokeLog::begin: {} left stroke {} open", author, previous);
        }

        self.emit_event(StrokeLogEvent::StrokeBegun {
            author: author.clone(),
            index,
        });
        index
    }

    /// Append a point to the open stroke of `author`.
    pub fn extend(&mut self, author: &AuthorId, point: Point) -> Result<usize, InkError> {
        let index = self.active_index(author)?;
        self.global[index].points.push(point);
        Ok(index)
    }

    /// Append the final point and close the stroke.
    pub fn end(&mut self, author: &AuthorId, point: Point) -> Result<usize, InkError> {
        let index = self.active_index(author)?;
        self.active.remove(author);
        self.global[index].points.push(point);
        self.total_strokes += 1;

        self.emit_event(StrokeLogEvent::StrokeEnded {
            author: author.clone(),
            index,
        });
        Ok(index)
    }

    fn active_index(&self, author: &AuthorId) -> Result<usize, InkError> {
        self.active
            .get(author)
            .copied()
            .ok_or_else(|| InkError::NoActiveStroke {
                author: author.clone(),
            })
    }

    /// Hide the most recent visible stroke of `author`.
    ///
    /// Returns the global index that changed, or None when nothing is left
    /// to undo.
    pub fn undo(&mut self, author: &AuthorId) -> Option<usize> {
        let strokes = self.by_author.get(author)?;
        let index = strokes
            .iter()
            .rev()
            .copied()
            .find(|&i| self.global[i].done)?;

        self.global[index].done = false;
        self.emit_event(StrokeLogEvent::VisibilityChanged {
            author: author.clone(),
            index,
            done: false,
        });
        Some(index)
    }

    /// Re-show the stroke just after the last visible one of `author`.
    ///
    /// Scans from the newest stroke for the nearest hidden stroke whose
    /// predecessor is visible. A visible stroke met before any such boundary
    /// means there is nothing to redo. If every stroke is hidden the first
    /// one is shown again.
    pub fn redo(&mut self, author: &AuthorId) -> Option<usize> {
        let strokes = self.by_author.get(author)?;
        let done = |k: usize| self.global[strokes[k]].done;

        let position = match strokes.len() {
            0 => None,
            1 => (!done(0)).then_some(0),
            len => {
                let mut found = Some(0);
                for k in (1..len).rev() {
                    if done(k) {
                        found = None;
                        break;
                    }
                    if done(k - 1) {
                        found = Some(k);
                        break;
                    }
                }
                found
            }
        }?;

        let index = strokes[position];
        self.global[index].done = true;
        self.emit_event(StrokeLogEvent::VisibilityChanged {
            author: author.clone(),
            index,
            done: true,
        });
        Some(index)
    }

    /// Every stroke, in creation order
    pub fn strokes(&self) -> &[Stroke] {
        &self.global
    }

    pub fn stroke(&self, index: usize) -> Option<&Stroke> {
        self.global.get(index)
    }

    /// Global indices of the strokes of `author`, oldest first
    pub fn author_strokes(&self, author: &AuthorId) -> &[usize] {
        self.by_author.get(author).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `done` flags of `author`'s strokes, oldest first
    pub fn done_flags(&self, author: &AuthorId) -> Vec<bool> {
        self.author_strokes(author)
            .iter()
            .map(|&i| self.global[i].done)
            .collect()
    }

    /// Global index of the open stroke of `author`
    pub fn active_index_of(&self, author: &AuthorId) -> Option<usize> {
        self.active.get(author).copied()
    }

    pub fn is_active(&self, author: &AuthorId) -> bool {
        self.active.contains_key(author)
    }

    /// Strokes finished since the canvas was created
    pub fn total_strokes(&self) -> u64 {
        self.total_strokes
    }

    pub fn len(&self) -> usize {
        self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    /// Register an event listener for replication hooks.
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(&StrokeLogEvent) + Send + Sync + 'static,
    {
        self.event_listeners.push(Box::new(listener));
    }

    fn emit_event(&self, event: StrokeLogEvent) {
        for listener in &self.event_listeners {
            listener(&event);
        }
    }
}

//! Dirty rectangles for incremental redisplay

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::SegmentBounds;
use crate::types::AuthorId;

/// Pixel rectangle touched by a draw, inclusive on both ends.
///
/// `author` is `None` for canvas-wide redraws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,
}

impl Patch {
    /// Segment bounds grown by `margin` on every side
    pub fn from_bounds(bounds: SegmentBounds, margin: i32, author: Option<AuthorId>) -> Self {
        Self {
            min_x: bounds.min_x.saturating_sub(margin),
            min_y: bounds.min_y.saturating_sub(margin),
            max_x: bounds.max_x.saturating_add(margin),
            max_y: bounds.max_y.saturating_add(margin),
            author_id: author,
        }
    }

    /// Whole canvas
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: last_pixel(width),
            max_y: last_pixel(height),
            author_id: None,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    /// Intersect with the canvas. None if nothing is left.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Patch> {
        let clipped = Patch {
            min_x: self.min_x.max(0),
            min_y: self.min_y.max(0),
            max_x: self.max_x.min(last_pixel(width)),
            max_y: self.max_y.min(last_pixel(height)),
            author_id: self.author_id.clone(),
        };
        (clipped.min_x <= clipped.max_x && clipped.min_y <= clipped.max_y).then_some(clipped)
    }

    /// Smallest patch covering both; keeps the author only if they agree
    pub fn union(&self, other: &Patch) -> Patch {
        Patch {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            author_id: if self.author_id == other.author_id {
                self.author_id.clone()
            } else {
                None
            },
        }
    }

    /// Whether `viewer` needs to redisplay this patch.
    ///
    /// A viewer's own incremental strokes are already on screen, so they are
    /// skipped unless `force` is set (undo/redo, full redraw).
    pub fn should_present(&self, viewer: &AuthorId, force: bool) -> bool {
        force || self.author_id.as_ref() != Some(viewer)
    }
}

/// Index of the last pixel along a side, saturating at `i32::MAX`
fn last_pixel(extent: u32) -> i32 {
    i32::try_from(extent).map_or(i32::MAX, |e| e - 1)
}

/// Collects patches between presentation passes
#[derive(Debug, Clone)]
pub struct PatchAccumulator {
    margin: i32,
    pending: Vec<Patch>,
}

impl PatchAccumulator {
    pub fn new(margin: i32) -> Self {
        Self {
            margin,
            pending: Vec::new(),
        }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// Patch for one segment draw, without recording it
    pub fn patch_for(&self, bounds: SegmentBounds, author: &AuthorId) -> Patch {
        Patch::from_bounds(bounds, self.margin, Some(author.clone()))
    }

    /// Record a segment draw and return its patch
    pub fn mark_segment(&mut self, bounds: SegmentBounds, author: &AuthorId) -> Patch {
        let patch = self.patch_for(bounds, author);
        debug!(
            "mark_segment: {} ({}, {})..({}, {})",
            author, patch.min_x, patch.min_y, patch.max_x, patch.max_y
        );
        self.pending.push(patch.clone());
        patch
    }

    pub fn push(&mut self, patch: Patch) {
        self.pending.push(patch);
    }

    /// Get all pending patches and clear the list
    pub fn take(&mut self) -> Vec<Patch> {
        std::mem::take(&mut self.pending)
    }

    /// Bounding patch over everything pending
    pub fn union(&self) -> Option<Patch> {
        let mut iter = self.pending.iter();
        let first = iter.next()?.clone();
        Some(iter.fold(first, |acc, p| acc.union(p)))
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

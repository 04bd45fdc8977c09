//! Event payloads exchanged with the host and the session-sync layer.
//!
//! Both enums use the adjacently tagged form, e.g.
//! `{"type": "pointerMove", "data": {"x": 1.0, "y": 2.0, "p": 0.5, "authorId": "v1"}}`.

use serde::{Deserialize, Serialize};

use crate::raster::Patch;
use crate::types::{AuthorId, Point, Rgb};

/// Input delivered to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum InkEvent {
    /// Pen down. `color` and `nib` update the author's pen first.
    PointerDown {
        x: f64,
        y: f64,
        p: f64,
        #[serde(alias = "viewId")]
        author_id: AuthorId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Rgb>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nib: Option<f64>,
    },
    PointerMove {
        x: f64,
        y: f64,
        p: f64,
        #[serde(alias = "viewId")]
        author_id: AuthorId,
    },
    PointerUp {
        x: f64,
        y: f64,
        p: f64,
        #[serde(alias = "viewId")]
        author_id: AuthorId,
    },
    Undo {
        #[serde(alias = "viewId")]
        author_id: AuthorId,
    },
    Redo {
        #[serde(alias = "viewId")]
        author_id: AuthorId,
    },
    /// Repaint everything from the log
    DrawAll,
    /// Hex color from a picker, `RRGGBB` or `#RRGGBB`
    ColorSelected {
        #[serde(alias = "viewId")]
        author_id: AuthorId,
        color: String,
    },
    NibSelected {
        #[serde(alias = "viewId")]
        author_id: AuthorId,
        nib: f64,
    },
}

impl InkEvent {
    /// Author the event acts for, if any
    pub fn author(&self) -> Option<&AuthorId> {
        match self {
            InkEvent::PointerDown { author_id, .. }
            | InkEvent::PointerMove { author_id, .. }
            | InkEvent::PointerUp { author_id, .. }
            | InkEvent::Undo { author_id }
            | InkEvent::Redo { author_id }
            | InkEvent::ColorSelected { author_id, .. }
            | InkEvent::NibSelected { author_id, .. } => Some(author_id),
            InkEvent::DrawAll => None,
        }
    }

    /// Pen sample carried by pointer events
    pub fn point(&self) -> Option<Point> {
        match *self {
            InkEvent::PointerDown { x, y, p, .. }
            | InkEvent::PointerMove { x, y, p, .. }
            | InkEvent::PointerUp { x, y, p, .. } => Some(Point::new(x, y, p)),
            _ => None,
        }
    }
}

/// Published after the log changes.
///
/// `index` is the stroke's position in the global log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum InkNotification {
    BeginStroke {
        x: f64,
        y: f64,
        p: f64,
        author_id: AuthorId,
        index: usize,
    },
    ExtendStroke {
        x: f64,
        y: f64,
        p: f64,
        author_id: AuthorId,
        index: usize,
    },
    EndStroke {
        x: f64,
        y: f64,
        p: f64,
        author_id: AuthorId,
        index: usize,
    },
    /// Visibility changed somewhere; every view must repaint from the log
    DrawAll,
}

/// What handling one event produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InkOutcome {
    pub notifications: Vec<InkNotification>,
    pub patches: Vec<Patch>,
}

impl InkOutcome {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.patches.is_empty()
    }
}

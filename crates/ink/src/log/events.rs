//! Events emitted as the stroke log changes, for replication hooks.

use crate::types::AuthorId;

/// Stroke lifecycle changes, delivered to listeners registered on the log.
///
/// These let a session-sync layer mirror the log without coupling to the
/// pipeline. `index` is the stroke's position in the global log.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeLogEvent {
    /// A stroke was opened by `author`.
    StrokeBegun { author: AuthorId, index: usize },
    /// The open stroke of `author` received its final point.
    StrokeEnded { author: AuthorId, index: usize },
    /// Undo or redo flipped a stroke's visibility.
    VisibilityChanged {
        author: AuthorId,
        index: usize,
        done: bool,
    },
    /// The whole log was replaced from a snapshot.
    Replaced { strokes: usize },
}

//! Stroke history for the ballpoint canvas.
//!
//! This module provides:
//! - [`StrokeLog`] - Append-only global log with per-author undo/redo
//! - [`StrokeLogEvent`] - Events for replication hooks
//! - [`Snapshot`] - Versioned persisted form of the log
//!
//! ## Visibility
//!
//! Strokes are never removed. Undo hides an author's newest visible stroke;
//! redo shows the hidden stroke right after that author's last visible one.
//! A full redraw replays `global` in order and skips hidden strokes, so the
//! canvas always reflects the current flags regardless of how authors'
//! strokes interleave.

mod events;
mod snapshot;
mod storage;

pub use events::StrokeLogEvent;
pub use snapshot::Snapshot;
pub use storage::StrokeLog;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InkError;
    use crate::types::{AuthorId, Pen, Point};

    fn pt(x: f64) -> Point {
        Point::new(x, 0.0, 0.5)
    }

    fn log_with(author: &AuthorId, strokes: usize) -> StrokeLog {
        let mut log = StrokeLog::new();
        for i in 0..strokes {
            log.begin(author, Pen::default(), pt(i as f64));
            log.end(author, pt(i as f64 + 1.0)).unwrap();
        }
        log
    }

    #[test]
    fn test_begin_extend_end() {
        let a = AuthorId::from("a");
        let mut log = StrokeLog::new();

        assert_eq!(log.begin(&a, Pen::default(), pt(0.0)), 0);
        assert!(log.is_active(&a));
        assert_eq!(log.extend(&a, pt(1.0)).unwrap(), 0);
        assert_eq!(log.end(&a, pt(2.0)).unwrap(), 0);

        assert!(!log.is_active(&a));
        assert_eq!(log.total_strokes(), 1);
        assert_eq!(log.strokes()[0].points.len(), 3);
        assert!(log.strokes()[0].done);
    }

    #[test]
    fn test_extend_without_begin() {
        let a = AuthorId::from("a");
        let mut log = StrokeLog::new();
        assert!(matches!(
            log.extend(&a, pt(0.0)),
            Err(InkError::NoActiveStroke { .. })
        ));
        assert!(matches!(
            log.end(&a, pt(0.0)),
            Err(InkError::NoActiveStroke { .. })
        ));
        assert_eq!(log.total_strokes(), 0);
    }

    #[test]
    fn test_interleaved_authors() {
        let a = AuthorId::from("a");
        let b = AuthorId::from("b");
        let mut log = StrokeLog::new();

        log.begin(&a, Pen::default(), pt(0.0));
        log.begin(&b, Pen::default(), pt(10.0));
        log.extend(&a, pt(1.0)).unwrap();
        log.end(&b, pt(11.0)).unwrap();
        log.end(&a, pt(2.0)).unwrap();

        assert_eq!(log.author_strokes(&a), &[0]);
        assert_eq!(log.author_strokes(&b), &[1]);
        assert_eq!(log.strokes()[0].points.len(), 3);
        assert_eq!(log.strokes()[1].points.len(), 2);
    }

    #[test]
    fn test_undo_redo_sequence() {
        let a = AuthorId::from("a");
        let mut log = log_with(&a, 3);
        assert_eq!(log.done_flags(&a), vec![true, true, true]);

        assert_eq!(log.undo(&a), Some(2));
        assert_eq!(log.done_flags(&a), vec![true, true, false]);
        assert_eq!(log.undo(&a), Some(1));
        assert_eq!(log.done_flags(&a), vec![true, false, false]);
        assert_eq!(log.redo(&a), Some(1));
        assert_eq!(log.done_flags(&a), vec![true, true, false]);
        assert_eq!(log.redo(&a), Some(2));
        assert_eq!(log.done_flags(&a), vec![true, true, true]);
        assert_eq!(log.redo(&a), None);
        assert_eq!(log.done_flags(&a), vec![true, true, true]);
    }

    #[test]
    fn test_undo_everything_then_redo_from_start() {
        let a = AuthorId::from("a");
        let mut log = log_with(&a, 3);
        while log.undo(&a).is_some() {}
        assert_eq!(log.done_flags(&a), vec![false, false, false]);

        assert_eq!(log.redo(&a), Some(0));
        assert_eq!(log.done_flags(&a), vec![true, false, false]);
    }

    #[test]
    fn test_single_stroke_redo() {
        let a = AuthorId::from("a");
        let mut log = log_with(&a, 1);
        assert_eq!(log.redo(&a), None);
        assert_eq!(log.undo(&a), Some(0));
        assert_eq!(log.redo(&a), Some(0));
        assert_eq!(log.done_flags(&a), vec![true]);
    }

    #[test]
    fn test_undo_redo_unknown_author_is_noop() {
        let mut log = log_with(&AuthorId::from("a"), 2);
        let ghost = AuthorId::from("ghost");
        assert_eq!(log.undo(&ghost), None);
        assert_eq!(log.redo(&ghost), None);
    }

    #[test]
    fn test_undo_only_touches_own_strokes() {
        let a = AuthorId::from("a");
        let b = AuthorId::from("b");
        let mut log = StrokeLog::new();
        log.begin(&a, Pen::default(), pt(0.0));
        log.end(&a, pt(1.0)).unwrap();
        log.begin(&b, Pen::default(), pt(0.0));
        log.end(&b, pt(1.0)).unwrap();

        assert_eq!(log.undo(&a), Some(0));
        assert!(!log.strokes()[0].done);
        assert!(log.strokes()[1].done);
    }

    #[test]
    fn test_from_parts_rebuilds_index() {
        let a = AuthorId::from("a");
        let b = AuthorId::from("b");
        let mut source = StrokeLog::new();
        for author in [&a, &b, &a] {
            source.begin(author, Pen::default(), pt(0.0));
            source.end(author, pt(1.0)).unwrap();
        }

        let log = StrokeLog::from_parts(source.strokes().to_vec(), 3);
        assert_eq!(log.author_strokes(&a), &[0, 2]);
        assert_eq!(log.author_strokes(&b), &[1]);
        assert_eq!(log.total_strokes(), 3);
        assert!(!log.is_active(&a));
    }

    #[test]
    fn test_stroke_log_event_listener() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut log = StrokeLog::new();
        let event_count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&event_count);

        log.add_event_listener(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let a = AuthorId::from("a");
        log.begin(&a, Pen::default(), pt(0.0));
        log.extend(&a, pt(1.0)).unwrap();
        log.end(&a, pt(2.0)).unwrap();
        log.undo(&a);

        // begin, end, undo; extends are silent
        assert_eq!(event_count.load(Ordering::SeqCst), 3);
    }
}

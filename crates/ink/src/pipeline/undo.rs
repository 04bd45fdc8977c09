//! Undo/redo and full redraw for the ink pipeline
//!
//! Toggling visibility can expose or hide ink anywhere under later strokes,
//! so both undo and redo repaint the whole canvas from the log instead of
//! restoring a region.

use tracing::{debug, info};

use crate::error::InkError;
use crate::raster::Patch;
use crate::types::AuthorId;

use super::InkPipeline;

impl InkPipeline {
    /// Hide the newest visible stroke of `author`.
    ///
    /// Returns the full-canvas patch, or None when there was nothing to undo.
    pub fn undo(&mut self, author: &AuthorId) -> Result<Option<Patch>, InkError> {
        self.renderer.ensure_ready()?;

        let Some(index) = self.log.undo(author) else {
            debug!("undo: nothing to undo for {}", author);
            return Ok(None);
        };
        info!("undo: {} hid stroke {}", author, index);
        self.draw_all().map(Some)
    }

    /// Show the stroke after the last visible one of `author`
    pub fn redo(&mut self, author: &AuthorId) -> Result<Option<Patch>, InkError> {
        self.renderer.ensure_ready()?;

        let Some(index) = self.log.redo(author) else {
            debug!("redo: nothing to redo for {}", author);
            return Ok(None);
        };
        info!("redo: {} restored stroke {}", author, index);
        self.draw_all().map(Some)
    }

    /// Repaint the canvas from the log.
    ///
    /// Clears to paper, drops every curve state and replays visible strokes
    /// in creation order, each with its own pen. Strokes still open are
    /// replayed without an end so their authors can keep drawing; an open
    /// stroke that was undone is fitted but not drawn.
    pub fn draw_all(&mut self) -> Result<Patch, InkError> {
        self.renderer.ensure_ready()?;

        self.renderer.reset(self.paper);
        self.patches.clear();

        let mut replayed = 0;
        let mut segments = 0;
        for (index, stroke) in self.log.strokes().iter().enumerate() {
            let open = self.log.active_index_of(&stroke.author) == Some(index);
            // A hidden open stroke still needs its curve state for live input
            if !stroke.done && !open {
                continue;
            }
            segments += self.renderer.replay(stroke, open)?;
            if stroke.done {
                replayed += 1;
            }
        }

        debug!(
            "draw_all: replayed {} of {} strokes ({} segments)",
            replayed,
            self.log.len(),
            segments
        );

        let patch = Patch::full(self.width(), self.height());
        self.patches.push(patch.clone());
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::pipeline;
    use super::*;
    use crate::types::Point;

    fn stroke(pipeline: &mut InkPipeline, author: &AuthorId, y: f64) {
        pipeline.begin_stroke(author, Point::new(5.0, y, 0.8)).unwrap();
        for i in 1..10 {
            pipeline
                .extend_stroke(author, Point::new(5.0 + i as f64 * 4.0, y, 0.8))
                .unwrap();
        }
        pipeline.end_stroke(author, Point::new(50.0, y, 0.8)).unwrap();
    }

    fn row_is_blank(pipeline: &InkPipeline, y: u32) -> bool {
        (0..pipeline.width()).all(|x| pipeline.surface().get_pixel(x, y) == Some([240, 235, 219, 255]))
    }

    #[test]
    fn test_undo_clears_ink() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        stroke(&mut pipeline, &a, 20.0);
        assert!(!row_is_blank(&pipeline, 20));

        let patch = pipeline.undo(&a).unwrap().expect("stroke to undo");
        assert_eq!(patch, Patch::full(64, 64));
        assert!(row_is_blank(&pipeline, 20));

        pipeline.redo(&a).unwrap().expect("stroke to redo");
        assert!(!row_is_blank(&pipeline, 20));
    }

    #[test]
    fn test_undo_with_nothing_is_noop() {
        let mut pipeline = pipeline();
        assert_eq!(pipeline.undo(&AuthorId::from("a")).unwrap(), None);
        assert_eq!(pipeline.redo(&AuthorId::from("a")).unwrap(), None);
    }

    #[test]
    fn test_undo_leaves_other_authors() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        let b = AuthorId::from("b");
        stroke(&mut pipeline, &a, 20.0);
        stroke(&mut pipeline, &b, 40.0);

        pipeline.undo(&a).unwrap();
        assert!(row_is_blank(&pipeline, 20));
        assert!(!row_is_blank(&pipeline, 40));
    }

    #[test]
    fn test_seeded_rendering_is_reproducible() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        stroke(&mut pipeline, &a, 20.0);
        let before = pipeline.surface().as_bytes().to_vec();

        // Same grain seed and texture cursor start give the same pixels
        let mut fresh = super::super::tests::pipeline();
        stroke(&mut fresh, &a, 20.0);
        assert_eq!(fresh.surface().as_bytes(), &before[..]);
    }

    #[test]
    fn test_draw_all_keeps_open_stroke_drawable() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        pipeline.begin_stroke(&a, Point::new(5.0, 30.0, 0.5)).unwrap();
        pipeline.extend_stroke(&a, Point::new(9.0, 30.0, 0.5)).unwrap();

        pipeline.draw_all().unwrap();
        assert!(pipeline.is_stroking(&a));
        for i in 2..8 {
            pipeline
                .extend_stroke(&a, Point::new(5.0 + i as f64 * 4.0, 30.0, 0.5))
                .unwrap();
        }
        pipeline.end_stroke(&a, Point::new(40.0, 30.0, 0.5)).unwrap();
        assert!(!row_is_blank(&pipeline, 30));
    }

    fn reddest_on_row(pipeline: &InkPipeline, y: u32) -> [u8; 4] {
        (0..pipeline.width())
            .filter_map(|x| pipeline.surface().get_pixel(x, y))
            .min_by_key(|px| px[1])
            .unwrap()
    }

    #[test]
    fn test_undo_open_stroke_stops_ink() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        pipeline.set_color(&a, "#FF0000").unwrap();
        pipeline.begin_stroke(&a, Point::new(5.0, 30.0, 0.6)).unwrap();
        pipeline.extend_stroke(&a, Point::new(6.5, 30.0, 0.6)).unwrap();

        assert!(pipeline.undo(&a).unwrap().is_some());
        assert_eq!(pipeline.log().done_flags(&a), vec![false]);
        assert!(pipeline.is_stroking(&a));

        for i in 2..30 {
            let update = pipeline
                .extend_stroke(&a, Point::new(5.0 + i as f64 * 1.5, 30.0, 0.6))
                .unwrap();
            assert_eq!(update.patch, None);
        }
        pipeline.end_stroke(&a, Point::new(50.0, 30.0, 0.6)).unwrap();
        assert!(row_is_blank(&pipeline, 30));

        // A full redraw agrees with what was drawn incrementally
        let incremental = pipeline.surface().as_bytes().to_vec();
        pipeline.draw_all().unwrap();
        assert_eq!(pipeline.surface().as_bytes(), &incremental[..]);

        // Redo shows the whole stroke in its own color
        pipeline.redo(&a).unwrap().expect("stroke to redo");
        let px = reddest_on_row(&pipeline, 30);
        assert!(px[1] < 200, "no ink on row: {px:?}");
        assert!(px[0] > px[1] + 30, "ink is not red: {px:?}");
    }

    #[test]
    fn test_redo_open_stroke_continues_with_own_pen() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        pipeline.set_color(&a, "#FF0000").unwrap();
        pipeline.begin_stroke(&a, Point::new(5.0, 30.0, 0.6)).unwrap();
        pipeline.extend_stroke(&a, Point::new(6.5, 30.0, 0.6)).unwrap();

        pipeline.undo(&a).unwrap();
        for i in 2..6 {
            pipeline
                .extend_stroke(&a, Point::new(5.0 + i as f64 * 1.5, 30.0, 0.6))
                .unwrap();
        }
        pipeline.redo(&a).unwrap().expect("stroke to redo");
        assert!(pipeline.is_stroking(&a));

        for i in 6..30 {
            pipeline
                .extend_stroke(&a, Point::new(5.0 + i as f64 * 1.5, 30.0, 0.6))
                .unwrap();
        }
        pipeline.end_stroke(&a, Point::new(50.0, 30.0, 0.6)).unwrap();

        let px = reddest_on_row(&pipeline, 30);
        assert!(px[1] < 200, "no ink on row: {px:?}");
        assert!(px[0] > px[1] + 30, "ink is not red: {px:?}");
    }
}

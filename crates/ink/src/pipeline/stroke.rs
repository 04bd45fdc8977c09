//! Stroke handling for the ink pipeline

use tracing::debug;

use crate::error::InkError;
use crate::raster::Patch;
use crate::types::{AuthorId, Point};
use crate::validation::validate_point;

use super::{InkPipeline, StrokeUpdate};

impl InkPipeline {
    /// Begin a stroke for `author` with their selected pen.
    ///
    /// Records the stroke in the log and seeds the author's curve state.
    /// Nothing is drawn until enough samples arrive.
    pub fn begin_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError> {
        self.renderer.ensure_ready()?;
        validate_point(point)?;

        let pen = self.pen(author);
        let index = self.log.begin(author, pen, point);
        self.renderer.begin(author, pen, point);

        debug!(
            "begin_stroke: {} #{} at ({:.1}, {:.1}) p={:.2} color={} nib={}",
            author,
            index,
            point.x,
            point.y,
            point.p,
            pen.color.to_hex(),
            pen.nib
        );
        Ok(StrokeUpdate { index, patch: None })
    }

    /// Continue the open stroke of `author`.
    ///
    /// If the stroke was undone while open, the point is logged but nothing
    /// is drawn until it is redone.
    pub fn extend_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError> {
        self.renderer.ensure_ready()?;
        validate_point(point)?;

        let index = self.log.extend(author, point)?;
        let visible = self.is_visible(index);
        let patch = self
            .renderer
            .extend(author, point, visible)?
            .map(|bounds| self.patches.mark_segment(bounds, author));
        Ok(StrokeUpdate { index, patch })
    }

    /// Finish the open stroke of `author`, drawing its tail
    pub fn end_stroke(&mut self, author: &AuthorId, point: Point) -> Result<StrokeUpdate, InkError> {
        self.renderer.ensure_ready()?;
        validate_point(point)?;

        let index = self.log.end(author, point)?;
        let visible = self.is_visible(index);
        let patch = self
            .renderer
            .end(author, point, visible)?
            .map(|bounds| self.patches.mark_segment(bounds, author));

        debug!(
            "end_stroke: {} #{} ({} points, total {})",
            author,
            index,
            self.log.stroke(index).map(|s| s.points.len()).unwrap_or(0),
            self.log.total_strokes()
        );
        Ok(StrokeUpdate { index, patch })
    }

    fn is_visible(&self, index: usize) -> bool {
        self.log.stroke(index).is_some_and(|stroke| stroke.done)
    }

    /// Check if `author` has a stroke in progress
    pub fn is_stroking(&self, author: &AuthorId) -> bool {
        self.log.is_active(author)
    }

    /// Get all pending patches and clear the list
    pub fn take_patches(&mut self) -> Vec<Patch> {
        self.patches.take()
    }

    /// Check if any patches are waiting for redisplay
    pub fn has_pending_patches(&self) -> bool {
        self.patches.has_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::pipeline;
    use super::*;

    fn pt(x: f64) -> Point {
        Point::new(x, 20.0, 0.5)
    }

    #[test]
    fn test_pipeline_stroke() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");

        pipeline.begin_stroke(&a, pt(10.0)).unwrap();
        assert!(pipeline.is_stroking(&a));
        for x in [12.0, 14.0, 16.0, 18.0, 20.0, 22.0] {
            pipeline.extend_stroke(&a, pt(x)).unwrap();
        }
        let update = pipeline.end_stroke(&a, pt(24.0)).unwrap();

        assert_eq!(update.index, 0);
        assert!(!pipeline.is_stroking(&a));
        assert!(pipeline.has_pending_patches());
        assert_eq!(pipeline.log().strokes()[0].points.len(), 8);

        // Ink landed on the stroke's row
        let row_darkest = (10..25u32)
            .map(|x| pipeline.surface().get_pixel(x, 20).unwrap()[0])
            .min()
            .unwrap();
        assert!(row_darkest < 240);
    }

    #[test]
    fn test_extend_without_begin() {
        let mut pipeline = pipeline();
        let result = pipeline.extend_stroke(&AuthorId::from("a"), pt(0.0));
        assert!(matches!(result, Err(InkError::NoActiveStroke { .. })));
        assert!(pipeline.log().is_empty());
    }

    #[test]
    fn test_own_patches_tagged_with_author() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        pipeline.begin_stroke(&a, pt(0.0)).unwrap();
        pipeline.end_stroke(&a, pt(15.0)).unwrap();

        let patches = pipeline.take_patches();
        assert_eq!(patches.len(), 1);
        assert!(!patches[0].should_present(&a, false));
        assert!(patches[0].should_present(&AuthorId::from("b"), false));
        assert!(!pipeline.has_pending_patches());
    }

    #[test]
    fn test_concurrent_authors_keep_separate_curves() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");
        let b = AuthorId::from("b");

        pipeline.begin_stroke(&a, Point::new(5.0, 5.0, 0.5)).unwrap();
        pipeline.begin_stroke(&b, Point::new(5.0, 50.0, 0.5)).unwrap();
        for i in 1..8 {
            let x = 5.0 + i as f64 * 3.0;
            pipeline.extend_stroke(&a, Point::new(x, 5.0, 0.5)).unwrap();
            pipeline.extend_stroke(&b, Point::new(x, 50.0, 0.5)).unwrap();
        }
        pipeline.end_stroke(&a, Point::new(30.0, 5.0, 0.5)).unwrap();
        pipeline.end_stroke(&b, Point::new(30.0, 50.0, 0.5)).unwrap();

        for patch in pipeline.take_patches() {
            let author = patch.author_id.clone().unwrap();
            if author == a {
                assert!(patch.max_y < 30);
            } else {
                assert!(patch.min_y > 30);
            }
        }
    }

    #[test]
    fn test_rejects_unusable_points() {
        let mut pipeline = pipeline();
        let a = AuthorId::from("a");

        let result = pipeline.begin_stroke(&a, Point::new(f64::NAN, 1.0, 0.5));
        assert!(matches!(result, Err(InkError::Validation(_))));
        assert!(pipeline.log().is_empty());

        pipeline.begin_stroke(&a, pt(10.0)).unwrap();
        for bad in [
            Point::new(1e200, 1e200, 0.5),
            Point::new(10.0, f64::INFINITY, 0.5),
            Point::new(10.0, 20.0, f64::NAN),
        ] {
            assert!(matches!(
                pipeline.extend_stroke(&a, bad),
                Err(InkError::Validation(_))
            ));
            assert!(matches!(
                pipeline.end_stroke(&a, bad),
                Err(InkError::Validation(_))
            ));
        }
        assert_eq!(pipeline.log().strokes()[0].points.len(), 1);
        assert!(pipeline.is_stroking(&a));

        // The stroke still round-trips through a snapshot
        pipeline.end_stroke(&a, pt(30.0)).unwrap();
        let snapshot = pipeline.take_snapshot();
        assert!(pipeline.load_snapshot(snapshot).is_ok());
    }
}

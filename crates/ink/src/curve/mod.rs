//! Incremental curve fitting for one author's stroke
//!
//! Raw samples are decimated by the sample rate, smoothed with a
//! three-point temporal filter, and fitted with look-ahead cubic Béziers:
//! every new filtered point completes the segment before it. This keeps the
//! ink close behind the pen while still producing tangent-continuous curves.

mod bezier;

use ballpoint_config::InkSettings;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::types::{Pen, Point};

pub use bezier::{BezierSegment, SegmentBounds, StepSampler};

/// Per-author fitting state.
///
/// Ephemeral: never persisted, and rebuilt from scratch on a full redraw.
/// Owns the random source for that author's grain so a seeded state renders
/// reproducibly.
#[derive(Debug, Clone)]
pub struct CurveState {
    raw: Vec<Point>,
    sampled: Vec<Point>,
    filtered: Vec<Point>,
    last_control: Option<Point>,
    step_offset: f64,
    point_counter: u64,
    pen: Pen,
    sample_rate: u64,
    filter_weight: f64,
    neighbour_weight: f64,
    sampler: StepSampler,
    rng: StdRng,
}

impl CurveState {
    /// Fresh state with entropy-seeded grain
    pub fn new(settings: &InkSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Fresh state with reproducible grain
    pub fn with_seed(settings: &InkSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: &InkSettings, rng: StdRng) -> Self {
        Self {
            raw: Vec::new(),
            sampled: Vec::new(),
            filtered: Vec::new(),
            last_control: None,
            step_offset: 0.0,
            point_counter: 0,
            pen: Pen::default(),
            sample_rate: settings.sample_rate.max(1),
            filter_weight: settings.filter_weight,
            neighbour_weight: settings.filter_weight_inverse(),
            sampler: StepSampler::new(settings.step_interval),
            rng,
        }
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn set_sample_rate(&mut self, sample_rate: u64) {
        self.sample_rate = sample_rate.max(1);
    }

    /// Start a stroke at `point`
    pub fn begin_stroke(&mut self, point: Point) {
        self.point_counter += 1;

        self.raw.clear();
        self.sampled.clear();
        self.filtered.clear();
        self.raw.push(point);
        self.sampled.push(point);
        self.filtered.push(point);

        self.step_offset = self.sampler.interval();
    }

    /// Add a sample. Returns the segment that became drawable, if any.
    pub fn extend_stroke(&mut self, point: Point) -> Option<BezierSegment> {
        self.point_counter += 1;
        self.raw.push(point);

        if self.point_counter % self.sample_rate != 0 {
            return None;
        }

        self.sampled.push(point);
        let len = self.sampled.len();
        if len >= 3 {
            let filtered = self.filter(
                self.sampled[len - 3],
                self.sampled[len - 2],
                self.sampled[len - 1],
            );
            self.filtered.push(filtered);
        }

        self.next_segment()
    }

    /// Finish the stroke at `point`, which is kept unfiltered so the tail is
    /// not cut short. Returns the final segment, if any.
    pub fn end_stroke(&mut self, point: Point) -> Option<BezierSegment> {
        self.raw.push(point);
        self.sampled.push(point);
        self.filtered.push(point);

        let segment = match self.filtered.len() {
            0 | 1 => None,
            2 => {
                // Too short for a look-ahead: draw the chord segment alone
                let segment =
                    BezierSegment::look_ahead(self.filtered[0], self.filtered[1], None, self.last_control);
                self.last_control = Some(segment.p2);
                Some(segment)
            }
            _ => self.next_segment(),
        };

        // Tangent continuity ends with the stroke
        self.last_control = None;
        segment
    }

    /// Fit the segment ending at the next-to-last filtered point, using the
    /// last one as look-ahead.
    fn next_segment(&mut self) -> Option<BezierSegment> {
        let len = self.filtered.len();
        if len < 3 {
            return None;
        }
        let segment = BezierSegment::look_ahead(
            self.filtered[len - 3],
            self.filtered[len - 2],
            Some(self.filtered[len - 1]),
            self.last_control,
        );
        self.last_control = Some(segment.p2);
        debug!(
            "CurveState::next_segment: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            segment.p0.x, segment.p0.y, segment.p3.x, segment.p3.y
        );
        Some(segment)
    }

    /// Pull the middle sample toward the midpoint of its neighbours
    fn filter(&self, first: Point, mid: Point, last: Point) -> Point {
        let neighbours = first.midpoint(last);
        mid * self.filter_weight + neighbours * self.neighbour_weight
    }

    /// Step along `segment`, carrying spacing across segment boundaries
    pub fn step_segment(&mut self, segment: &BezierSegment) -> Vec<Point> {
        self.sampler.sample(segment, &mut self.step_offset)
    }

    /// Split borrow used while rasterizing: the pen and the grain source
    pub(crate) fn pen_and_rng(&mut self) -> (Pen, &mut StdRng) {
        (self.pen, &mut self.rng)
    }

    pub fn raw_points(&self) -> &[Point] {
        &self.raw
    }

    pub fn sampled_points(&self) -> &[Point] {
        &self.sampled
    }

    pub fn filtered_points(&self) -> &[Point] {
        &self.filtered
    }

    pub fn last_control_point(&self) -> Option<Point> {
        self.last_control
    }

    pub fn step_offset(&self) -> f64 {
        self.step_offset
    }

    pub fn point_counter(&self) -> u64 {
        self.point_counter
    }
}

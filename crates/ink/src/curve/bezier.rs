//! Look-ahead cubic Bézier segments and arc-length stepping

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    LEAD_CONTROL_FRACTION, LOOK_AHEAD_TANGENT, MAX_SEGMENT_STEPS, TRAIL_CONTROL_FRACTION,
};
use crate::types::Point;

/// Cubic segment between two filtered points.
///
/// Pressure is carried as a third coordinate, so it is interpolated along
/// the curve exactly like position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSegment {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

/// Integer pixel bounds of a segment's control polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BezierSegment {
    /// Fit the segment `pt0 -> pt1`.
    ///
    /// The leading control point mirrors the previous segment's trailing
    /// control point through `pt0` when there is one; otherwise it sits a
    /// third of the way along the chord. The trailing control point uses the
    /// look-ahead point `pt2` to estimate the tangent at `pt1`, or two thirds
    /// of the chord without it.
    pub fn look_ahead(
        pt0: Point,
        pt1: Point,
        pt2: Option<Point>,
        last_control: Option<Point>,
    ) -> Self {
        let p0 = pt0;
        let p3 = pt1;

        let p1 = match last_control {
            Some(control) => p0.mirror(control),
            None => p0.lerp(p3, LEAD_CONTROL_FRACTION),
        };

        let p2 = match pt2 {
            Some(next) => p3 - ((p3 - p0) + (next - p3)) * LOOK_AHEAD_TANGENT,
            None => p0.lerp(p3, TRAIL_CONTROL_FRACTION),
        };

        Self { p0, p1, p2, p3 }
    }

    /// Polynomial coefficients (A, B, C) with `P(t) = ((A t + B) t + C) t + p0`
    fn coefficients(&self) -> (Point, Point, Point) {
        let (p0, p1, p2, p3) = (self.p0, self.p1, self.p2, self.p3);
        let a = p3 - p2 * 3.0 + p1 * 3.0 - p0;
        let b = p2 * 3.0 - p1 * 6.0 + p0 * 3.0;
        let c = p1 * 3.0 - p0 * 3.0;
        (a, b, c)
    }

    /// Point on the curve, pressure included
    pub fn point_at(&self, t: f64) -> Point {
        let (a, b, c) = self.coefficients();
        ((a * t + b) * t + c) * t + self.p0
    }

    /// Planar tangent dP/dt
    pub fn derivative_at(&self, t: f64) -> DVec2 {
        let (a, b, c) = self.coefficients();
        let d = (a * (3.0 * t) + b * 2.0) * t + c;
        d.xy()
    }

    /// Planar length of the control polygon, an upper bound on arc length
    pub fn control_polygon_length(&self) -> f64 {
        self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3)
    }

    /// Floor/ceil of the control polygon's extent
    pub fn bounds(&self) -> SegmentBounds {
        let pts = [self.p0, self.p1, self.p2, self.p3];
        let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        SegmentBounds {
            min_x: min_x.floor() as i32,
            min_y: min_y.floor() as i32,
            max_x: max_x.ceil() as i32,
            max_y: max_y.ceil() as i32,
        }
    }
}

/// Walks a segment at (approximately) even arc-length intervals.
#[derive(Debug, Clone, Copy)]
pub struct StepSampler {
    interval: f64,
}

impl StepSampler {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(f64::EPSILON),
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Sample `segment`, continuing the spacing left over in `step_offset`.
    ///
    /// The parameter advances by `interval / |dP/dt|`, a first-order arc
    /// length estimate. On return `step_offset` holds the distance from the
    /// last step to the segment end, or grows by the chord length if the
    /// segment was too short to take any step. A segment whose speed or
    /// length is not a usable finite number takes no steps.
    pub fn sample(&self, segment: &BezierSegment, step_offset: &mut f64) -> Vec<Point> {
        let mut steps = Vec::new();
        let chord = segment.p0.distance(segment.p3);

        let (_, _, c) = segment.coefficients();
        let start_speed = c.xy().length();
        let start_speed = if start_speed > f64::EPSILON {
            start_speed
        } else {
            // Control point on top of p0: fall back to the chord
            chord
        };

        let polygon = segment.control_polygon_length();
        if start_speed.is_finite() && start_speed > f64::EPSILON && polygon.is_finite() {
            let limit = (polygon / self.interval * 4.0 + 4.0).min(MAX_SEGMENT_STEPS as f64) as usize;

            // A carried-over offset larger than the interval means a step is
            // already due: take it at the segment start
            let mut t = ((self.interval - *step_offset) / start_speed).max(0.0);
            while t <= 1.0 && steps.len() < limit {
                steps.push(segment.point_at(t));

                let speed = segment.derivative_at(t).length();
                let speed = if speed > f64::EPSILON { speed } else { chord };
                if !speed.is_finite() || speed <= f64::EPSILON {
                    break;
                }
                let next = t + self.interval / speed;
                // Increment lost to rounding: t would never reach 1
                if next <= t {
                    break;
                }
                t = next;
            }
        }

        match steps.last() {
            None if chord.is_finite() => *step_offset += chord,
            None => {}
            Some(last) => *step_offset = last.distance(segment.p3),
        }

        steps
    }
}

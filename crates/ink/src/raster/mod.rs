//! Ink stamping
//!
//! Every step point along a fitted segment stamps a 5x5 pixel window.
//! Coverage inside the window comes from the distance to the step center
//! against a pressure-driven width, then gets broken up by the shared grain
//! texture and a per-pixel starvation draw before blending.

mod patch;

use rand::Rng;

use crate::constants::{STAMP_OFFSET, STAMP_SIZE};
use crate::error::InkError;
use crate::surface::InkSurface;
use crate::texture::InkTexture;
use crate::types::{Pen, Point};

pub use patch::{Patch, PatchAccumulator};

/// Pressure bands: (lower bound, upper bound, width at lower, width at upper)
const WIDTH_BANDS: [(f64, f64, f64, f64); 5] = [
    (0.0, 0.2, -3.50, -3.20),
    (0.2, 0.45, -3.20, -2.50),
    (0.45, 0.8, -2.50, -1.70),
    (0.8, 0.95, -1.70, -1.55),
    (0.95, 1.0, -1.55, -1.30),
];

/// Grain multiplier at zero and full pressure
const GRAIN_RANGE: (f64, f64) = (0.8, 0.95);

/// Map pressure to the signed width offset used by the stamp.
///
/// More negative means a wider mark. Pressure is clamped to [0, 1] first;
/// Bézier interpolation can overshoot either end.
pub fn pressure_curve(p: f64) -> f64 {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let (lo, hi, from, to) = WIDTH_BANDS
        .iter()
        .copied()
        .find(|&(_, hi, _, _)| p < hi)
        .unwrap_or(WIDTH_BANDS[WIDTH_BANDS.len() - 1]);
    from + (p - lo) / (hi - lo) * (to - from)
}

/// Antialiased coverage of a pixel `dist` away from the step center.
///
/// Solid inside `width`, falling off hyperbolically outside. Always in [0, 1].
pub fn stamp_alpha(dist: f64, width: f64) -> f64 {
    let alpha = if dist < width {
        1.0
    } else {
        1.5 / (dist - width) - 0.425
    };
    if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) }
}

/// Pressure-dependent grain, zeroed at random to mimic ink starvation.
///
/// Lighter strokes skip more often: the chance of a skip is
/// `max(0, 1 - 1 / (2 (1 - p^5)))`.
pub fn grain_factor<R: Rng + ?Sized>(p: f64, rng: &mut R) -> f64 {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let grain = GRAIN_RANGE.0 + p * (GRAIN_RANGE.1 - GRAIN_RANGE.0);
    let keep = 1.0 - p.powi(5);
    if (rng.r#gen::<f64>() * keep * 2.0).floor() == 1.0 {
        0.0
    } else {
        grain
    }
}

/// Stamps step points into a surface using a shared grain texture
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer<'t> {
    texture: &'t InkTexture,
}

impl<'t> Rasterizer<'t> {
    pub fn new(texture: &'t InkTexture) -> Self {
        Self { texture }
    }

    /// Stamp every step of one segment.
    ///
    /// Refuses to touch the surface at all if the texture was never
    /// initialized.
    pub fn draw_steps<R: Rng + ?Sized>(
        &self,
        surface: &mut InkSurface,
        rng: &mut R,
        pen: Pen,
        steps: &[Point],
    ) -> Result<(), InkError> {
        if !self.texture.is_initialized() {
            return Err(InkError::NotInitialized);
        }
        for step in steps {
            self.draw_step(surface, rng, pen, *step)?;
        }
        Ok(())
    }

    /// Stamp the 5x5 window around one step point.
    ///
    /// Columns outer, rows inner: the order in which texture samples and
    /// grain draws are consumed. Pixels off the canvas still consume both.
    pub fn draw_step<R: Rng + ?Sized>(
        &self,
        surface: &mut InkSurface,
        rng: &mut R,
        pen: Pen,
        step: Point,
    ) -> Result<(), InkError> {
        let width = pressure_curve(step.p) * pen.nib;
        let left = step.x.round() as i64 - STAMP_OFFSET;
        let top = step.y.round() as i64 - STAMP_OFFSET;

        for i in left..left + STAMP_SIZE {
            let dx = step.x - i as f64;
            for j in top..top + STAMP_SIZE {
                let dy = step.y - j as f64;
                let dist = (dx * dx + dy * dy).sqrt();

                let mut alpha = stamp_alpha(dist, width);
                alpha *= self.texture.sample_next()?;
                alpha *= grain_factor(step.p, rng);

                surface.blend_rgb(i, j, pen.color, alpha);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn texture() -> InkTexture {
        let texture = InkTexture::new(1000, 9);
        texture.init().unwrap();
        texture
    }

    #[test]
    fn test_pressure_curve_breakpoints() {
        assert!((pressure_curve(0.0) + 3.5).abs() < 1e-12);
        assert!((pressure_curve(0.2) + 3.2).abs() < 1e-12);
        assert!((pressure_curve(0.45) + 2.5).abs() < 1e-12);
        assert!((pressure_curve(0.8) + 1.7).abs() < 1e-12);
        assert!((pressure_curve(0.95) + 1.55).abs() < 1e-12);
        assert!((pressure_curve(1.0) + 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_pressure_curve_continuous() {
        for &edge in &[0.2, 0.45, 0.8, 0.95] {
            let below = pressure_curve(edge - 1e-9);
            let above = pressure_curve(edge + 1e-9);
            assert!((below - above).abs() < 1e-6, "jump at {edge}");
        }
    }

    #[test]
    fn test_pressure_curve_clamps() {
        assert_eq!(pressure_curve(-4.0), pressure_curve(0.0));
        assert_eq!(pressure_curve(7.0), pressure_curve(1.0));
        assert_eq!(pressure_curve(f64::NAN), pressure_curve(0.0));
    }

    #[test]
    fn test_stamp_alpha_clamped() {
        for &(dist, width) in &[
            (0.0, -3.5),
            (0.5, -1.3),
            (3.0, -3.5),
            (1.0, 1.0),
            (0.0, 2.0),
            (100.0, -1.0),
            (-1.0, -1.0),
            (f64::INFINITY, f64::INFINITY),
        ] {
            let a = stamp_alpha(dist, width);
            assert!((0.0..=1.0).contains(&a), "alpha {a} for {dist}/{width}");
        }
        // Inside the core
        assert_eq!(stamp_alpha(0.5, 1.0), 1.0);
        // Far away
        assert_eq!(stamp_alpha(50.0, -1.5), 0.0);
    }

    #[test]
    fn test_grain_factor_full_pressure_never_starves() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            assert!((grain_factor(1.0, &mut rng) - 0.95).abs() < 1e-12);
        }
    }

    #[test]
    fn test_grain_factor_light_pressure_starves_sometimes() {
        let mut rng = StdRng::seed_from_u64(5);
        let starved = (0..2000)
            .filter(|_| grain_factor(0.0, &mut rng) == 0.0)
            .count();
        // About half at zero pressure
        assert!(starved > 800 && starved < 1200, "starved {starved}");
    }

    #[test]
    fn test_draw_before_init_fails() {
        let texture = InkTexture::new(10, 1);
        let raster = Rasterizer::new(&texture);
        let mut surface = InkSurface::new(10, 10, Rgb::new(255, 255, 255));
        let mut rng = StdRng::seed_from_u64(1);

        let result = raster.draw_steps(
            &mut surface,
            &mut rng,
            Pen::default(),
            &[Point::new(5.0, 5.0, 0.5)],
        );
        assert!(matches!(result, Err(InkError::NotInitialized)));
        assert!(surface.pixels().iter().all(|&px| px == [255, 255, 255, 255]));
    }

    #[test]
    fn test_step_stays_in_window() {
        let texture = texture();
        let raster = Rasterizer::new(&texture);
        let mut surface = InkSurface::new(20, 20, Rgb::new(255, 255, 255));
        let mut rng = StdRng::seed_from_u64(1);

        raster
            .draw_step(&mut surface, &mut rng, Pen::default(), Point::new(10.0, 10.0, 1.0))
            .unwrap();

        for y in 0..20u32 {
            for x in 0..20u32 {
                let inside = (8..13).contains(&x) && (8..13).contains(&y);
                let px = surface.get_pixel(x, y).unwrap();
                if !inside {
                    assert_eq!(px, [255, 255, 255, 255], "ink leaked to ({x}, {y})");
                }
            }
        }
        // Darkened somewhere in the window
        let window_min = (8..13u32)
            .flat_map(|x| (8..13u32).map(move |y| (x, y)))
            .map(|(x, y)| surface.get_pixel(x, y).unwrap()[0])
            .min()
            .unwrap();
        assert!(window_min < 255);
    }

    #[test]
    fn test_step_consumes_25_texture_samples() {
        let texture = texture();
        let raster = Rasterizer::new(&texture);
        let mut surface = InkSurface::new(4, 4, Rgb::new(255, 255, 255));
        let mut rng = StdRng::seed_from_u64(1);

        // Mostly off canvas: samples are still consumed
        raster
            .draw_step(&mut surface, &mut rng, Pen::default(), Point::new(0.0, 0.0, 0.5))
            .unwrap();
        assert_eq!(texture.cursor(), 25);
    }
}

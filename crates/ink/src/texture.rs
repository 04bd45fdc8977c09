//! Ink grain texture
//!
//! A table of coverage multipliers sampled from a procedurally generated
//! grayscale grain image. Every stamped pixel consumes the next entry, so the
//! grain runs continuously across strokes and authors instead of restarting
//! per stroke. One instance is built at startup and shared by reference with
//! every rasterizer call; the read cursor is its only mutable state.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use ballpoint_config::InkSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::InkError;

/// Side of the generated grain image in pixels.
const GRAIN_IMAGE_SIZE: usize = 128;

/// Lattice cells per side for the coarse (blotch) noise layer.
const GRAIN_LATTICE: usize = 16;

/// Lowest coverage a sample can carry; keeps strokes from breaking up entirely.
const MIN_COVERAGE: f64 = 0.55;

pub struct InkTexture {
    samples: OnceLock<Box<[f32]>>,
    cursor: AtomicUsize,
    len: usize,
    seed: u64,
}

impl std::fmt::Debug for InkTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InkTexture")
            .field("len", &self.len)
            .field("initialized", &self.is_initialized())
            .field("cursor", &self.cursor())
            .finish()
    }
}

impl InkTexture {
    /// Create an uninitialized texture; `init` must run before any draw.
    pub fn new(len: usize, seed: u64) -> Self {
        Self {
            samples: OnceLock::new(),
            cursor: AtomicUsize::new(0),
            len: len.max(1),
            seed,
        }
    }

    pub fn from_settings(settings: &InkSettings) -> Self {
        Self::new(settings.texture_samples, settings.texture_seed)
    }

    /// Create and initialize in one go.
    pub fn initialized(settings: &InkSettings) -> Self {
        let texture = Self::from_settings(settings);
        // Freshly constructed, so this cannot be a second init
        let _ = texture.init();
        texture
    }

    /// Build the sample table. Fails if called twice.
    pub fn init(&self) -> Result<(), InkError> {
        if self.samples.get().is_some() {
            return Err(InkError::AlreadyInitialized);
        }
        let table = build_sample_table(self.len, self.seed);
        self.samples
            .set(table)
            .map_err(|_| InkError::AlreadyInitialized)?;
        debug!("InkTexture::init: {} grain samples (seed {:#x})", self.len, self.seed);
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.samples.get().is_some()
    }

    /// Advance the shared cursor and return the coverage sample under it.
    pub fn sample_next(&self) -> Result<f64, InkError> {
        let samples = self.samples.get().ok_or(InkError::NotInitialized)?;
        let len = samples.len();
        let previous = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| Some((c + 1) % len))
            .unwrap_or(0);
        Ok(samples[(previous + 1) % len] as f64)
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw table (None before init)
    pub fn samples(&self) -> Option<&[f32]> {
        self.samples.get().map(|s| &s[..])
    }
}

/// Generate the grain image, then read `len` coverage values from random
/// locations in it.
fn build_sample_table(len: usize, seed: u64) -> Box<[f32]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let image = generate_grain_image(&mut rng);

    (0..len)
        .map(|_| {
            let x = rng.gen_range(0..GRAIN_IMAGE_SIZE);
            let y = rng.gen_range(0..GRAIN_IMAGE_SIZE);
            let gray = image[y * GRAIN_IMAGE_SIZE + x] as f64;
            (MIN_COVERAGE + (1.0 - MIN_COVERAGE) * gray).clamp(0.0, 1.0) as f32
        })
        .collect()
}

/// Grayscale grain in [0, 1]: smooth blotches from a bilinear value-noise
/// lattice mixed with per-pixel speckle.
fn generate_grain_image(rng: &mut StdRng) -> Vec<f32> {
    let lattice_side = GRAIN_LATTICE + 1;
    let lattice: Vec<f64> = (0..lattice_side * lattice_side)
        .map(|_| rng.r#gen::<f64>())
        .collect();
    let cell = GRAIN_IMAGE_SIZE as f64 / GRAIN_LATTICE as f64;

    let mut image = Vec::with_capacity(GRAIN_IMAGE_SIZE * GRAIN_IMAGE_SIZE);
    for py in 0..GRAIN_IMAGE_SIZE {
        for px in 0..GRAIN_IMAGE_SIZE {
            let gx = px as f64 / cell;
            let gy = py as f64 / cell;
            let (ix, iy) = (gx.floor() as usize, gy.floor() as usize);
            let (fx, fy) = (smoothstep(gx.fract()), smoothstep(gy.fract()));

            let at = |x: usize, y: usize| lattice[y * lattice_side + x];
            let top = at(ix, iy) + (at(ix + 1, iy) - at(ix, iy)) * fx;
            let bottom = at(ix, iy + 1) + (at(ix + 1, iy + 1) - at(ix, iy + 1)) * fx;
            let blotch = top + (bottom - top) * fy;

            let speckle = rng.r#gen::<f64>();
            image.push((0.6 * blotch + 0.4 * speckle).clamp(0.0, 1.0) as f32);
        }
    }
    image
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_before_init_fails() {
        let texture = InkTexture::new(16, 1);
        assert!(!texture.is_initialized());
        assert!(matches!(texture.sample_next(), Err(InkError::NotInitialized)));
    }

    #[test]
    fn test_init_twice_fails() {
        let texture = InkTexture::new(16, 1);
        texture.init().unwrap();
        assert!(matches!(texture.init(), Err(InkError::AlreadyInitialized)));
    }

    #[test]
    fn test_samples_in_unit_range() {
        let texture = InkTexture::new(10_000, 7);
        texture.init().unwrap();
        let samples = texture.samples().unwrap();
        assert_eq!(samples.len(), 10_000);
        assert!(samples.iter().all(|&s| (0.0..=1.0).contains(&s)));
        // Grain, not a flat fill
        let min = samples.iter().cloned().fold(f32::MAX, f32::min);
        let max = samples.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max - min > 0.1);
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = InkTexture::new(500, 42);
        let b = InkTexture::new(500, 42);
        a.init().unwrap();
        b.init().unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_cursor_wraps() {
        let texture = InkTexture::new(4, 3);
        texture.init().unwrap();
        let table: Vec<f64> = texture.samples().unwrap().iter().map(|&s| s as f64).collect();

        let read: Vec<f64> = (0..8).map(|_| texture.sample_next().unwrap()).collect();
        assert_eq!(read[0], table[1]);
        assert_eq!(read[3], table[0]);
        assert_eq!(&read[..4], &read[4..]);
        assert_eq!(texture.cursor(), 0);
    }
}

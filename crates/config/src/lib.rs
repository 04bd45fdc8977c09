//! Shared configuration for ballpoint
//!
//! This crate provides the single source of truth for stroke tuning
//! (sampling, filtering, step spacing), the default canvas extent and
//! paper color, and the uniform display scale used by hosts.

use serde::{Deserialize, Serialize};

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 800;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 800;

/// Paper color the canvas is cleared to (RGB)
pub const DEFAULT_PAPER: [u8; 3] = [240, 235, 219];

/// Arc length between consecutive ink stamps
pub const DEFAULT_STEP_INTERVAL: f64 = 0.3;

/// Every Nth raw sample feeds the curve fitter
pub const DEFAULT_SAMPLE_RATE: u64 = 2;

/// Weight of the original sample against the neighbour midpoint
pub const DEFAULT_FILTER_WEIGHT: f64 = 0.5;

/// Pixels added around a segment's bounds to cover antialiasing falloff
pub const DEFAULT_PATCH_MARGIN: i32 = 5;

/// Number of grain samples in the ink texture table
pub const DEFAULT_TEXTURE_SAMPLES: usize = 100_000;

/// Seed for the ink texture generator. Every peer must use the same one.
pub const DEFAULT_TEXTURE_SEED: u64 = 0x0b41_1901_2014;

/// Stroke fitting and rasterization tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkSettings {
    /// Target arc length between stamps
    pub step_interval: f64,
    /// Raw-sample decimation factor (1 = use every sample)
    pub sample_rate: u64,
    /// Temporal filter weight in [0, 1]
    pub filter_weight: f64,
    /// Dirty rectangle margin in pixels
    pub patch_margin: i32,
    /// Grain table length
    pub texture_samples: usize,
    /// Grain table seed
    pub texture_seed: u64,
}

impl Default for InkSettings {
    fn default() -> Self {
        Self {
            step_interval: DEFAULT_STEP_INTERVAL,
            sample_rate: DEFAULT_SAMPLE_RATE,
            filter_weight: DEFAULT_FILTER_WEIGHT,
            patch_margin: DEFAULT_PATCH_MARGIN,
            texture_samples: DEFAULT_TEXTURE_SAMPLES,
            texture_seed: DEFAULT_TEXTURE_SEED,
        }
    }
}

impl InkSettings {
    /// Defaults, overridden by `BALLPOINT_SAMPLE_RATE` and
    /// `BALLPOINT_STEP_INTERVAL` when they hold usable values.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(rate) = std::env::var("BALLPOINT_SAMPLE_RATE")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&r| r >= 1)
        {
            settings.sample_rate = rate;
        }
        if let Some(interval) = std::env::var("BALLPOINT_STEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|&i| i.is_finite() && i > 0.0)
        {
            settings.step_interval = interval;
        }
        settings
    }

    /// Same settings with a different decimation factor (clamped to >= 1)
    pub fn with_sample_rate(mut self, sample_rate: u64) -> Self {
        self.sample_rate = sample_rate.max(1);
        self
    }

    /// Complement of the filter weight, applied to the neighbour midpoint
    pub fn filter_weight_inverse(&self) -> f64 {
        1.0 - self.filter_weight
    }
}

/// Canvas extent and paper color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Paper color (RGB)
    pub paper: [u8; 3],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            paper: DEFAULT_PAPER,
        }
    }
}

impl CanvasConfig {
    /// Create a canvas config with the given dimensions and default paper
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            paper: DEFAULT_PAPER,
        }
    }
}

/// Uniform scale and centering used to present the canvas in a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Uniform scale factor
    pub scale: f64,
    /// Horizontal margin in window pixels
    pub offset_x: f64,
    /// Vertical margin in window pixels
    pub offset_y: f64,
}

impl Viewport {
    /// Fit a canvas inside a window, keeping its aspect ratio.
    ///
    /// `zoom` multiplies the fitted scale; the result stays centred.
    pub fn fit(window_w: f64, window_h: f64, canvas_w: u32, canvas_h: u32, zoom: f64) -> Self {
        let (cw, ch) = (canvas_w.max(1) as f64, canvas_h.max(1) as f64);
        let scale = (window_w / cw).min(window_h / ch) * zoom;
        Self {
            scale,
            offset_x: (window_w - scale * cw) / 2.0,
            offset_y: (window_h - scale * ch) / 2.0,
        }
    }

    /// Scaled canvas size in whole window pixels
    pub fn scaled_size(&self, canvas_w: u32, canvas_h: u32) -> (u32, u32) {
        (
            (canvas_w as f64 * self.scale).round().max(1.0) as u32,
            (canvas_h as f64 * self.scale).round().max(1.0) as u32,
        )
    }
}

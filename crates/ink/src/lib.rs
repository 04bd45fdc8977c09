//! Ballpoint ink engine - pressure-sensitive pen strokes on a shared canvas
//!
//! This crate provides the rendering core and stroke history:
//! - [`types::Point`], [`types::Stroke`] - Pen samples and logged strokes
//! - [`texture::InkTexture`] - Shared grain table, initialized once
//! - [`curve`] - Temporal filtering, look-ahead Bézier fitting, arc-length stepping
//! - [`raster`] - Antialiased, grain-modulated ink stamps and dirty rectangles
//! - [`log`] - Append-only stroke log with per-author undo/redo and snapshots
//! - [`events`] - Tagged event and notification payloads
//! - [`pipeline`] - [`InkPipeline`] behind the [`InkEngine`] capability trait

pub mod constants;
pub mod curve;
pub mod error;
pub mod events;
pub mod log;
pub mod pipeline;
pub mod raster;
pub mod surface;
pub mod texture;
pub mod types;
pub mod validation;

pub use constants::*;
pub use curve::*;
pub use error::*;
pub use events::*;
pub use log::*;
pub use pipeline::*;
pub use raster::*;
pub use surface::*;
pub use texture::*;
pub use types::*;
pub use validation::*;

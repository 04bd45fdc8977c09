use thiserror::Error;

use crate::constants::{MAX_CANVAS_EXTENT, MAX_COORDINATE};
use crate::types::{Point, Stroke};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must be 6 hex digits (optionally prefixed by '#'), got {0:?}")]
    InvalidLength(String),
    #[error("Invalid hex digit in color {0:?}")]
    InvalidDigit(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Stroke {index} has no points")]
    EmptyStroke { index: usize },
    #[error("Stroke {index} has a non-finite or out-of-range point")]
    InvalidStrokePoint { index: usize },
    #[error("Point ({x}, {y}, p={p}) must be finite and within ±{MAX_COORDINATE}")]
    InvalidPoint { x: f64, y: f64, p: f64 },
    #[error("Stroke {index} has a non-finite or non-positive nib: {nib}")]
    InvalidNib { index: usize, nib: f64 },
    #[error("Nib must be finite and positive, got {nib}")]
    InvalidPenNib { nib: f64 },
    #[error("Invalid canvas extent: {width}x{height} (each side 1..={MAX_CANVAS_EXTENT})")]
    InvalidExtent { width: u32, height: u32 },
}

/// Parse `RRGGBB` / `#RRGGBB` into channel bytes
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3], ColorParseError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ColorParseError::InvalidLength(hex.to_string()));
    }
    // from_str_radix tolerates a leading '+', so check digits up front
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidDigit(hex.to_string()));
    }

    let mut channels = [0u8; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        let pair = &digits[i * 2..i * 2 + 2];
        *channel = u8::from_str_radix(pair, 16)
            .map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))?;
    }
    Ok(channels)
}

/// Pen samples must be finite and inside the coordinate range.
///
/// Pressure only needs to be finite; out-of-range pressure is clamped when
/// drawing.
pub fn validate_point(point: Point) -> Result<(), ValidationError> {
    let in_range = |v: f64| v.is_finite() && v.abs() <= MAX_COORDINATE;
    if in_range(point.x) && in_range(point.y) && point.p.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidPoint {
            x: point.x,
            y: point.y,
            p: point.p,
        })
    }
}

/// Check a stroke loaded from outside the engine
pub fn validate_stroke(index: usize, stroke: &Stroke) -> Result<(), ValidationError> {
    if stroke.points.is_empty() {
        return Err(ValidationError::EmptyStroke { index });
    }
    if stroke.points.iter().any(|pt| validate_point(*pt).is_err()) {
        return Err(ValidationError::InvalidStrokePoint { index });
    }
    if !stroke.nib.is_finite() || stroke.nib <= 0.0 {
        return Err(ValidationError::InvalidNib {
            index,
            nib: stroke.nib,
        });
    }
    Ok(())
}

/// Nib multipliers scale the stamp width, so they must be usable numbers
pub fn validate_nib(nib: f64) -> Result<(), ValidationError> {
    if !nib.is_finite() || nib <= 0.0 {
        return Err(ValidationError::InvalidPenNib { nib });
    }
    Ok(())
}

/// Canvas extent must be non-empty and small enough to allocate
pub fn validate_extent(width: u32, height: u32) -> Result<(), ValidationError> {
    let side = 1..=MAX_CANVAS_EXTENT;
    if !side.contains(&width) || !side.contains(&height) {
        return Err(ValidationError::InvalidExtent { width, height });
    }
    Ok(())
}

use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NIB, DEFAULT_PEN_COLOR};
use crate::validation::{parse_hex_color, ColorParseError};

/// Identifies the author (view/session) a stroke belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub String);

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AuthorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A pen sample: position plus pressure.
///
/// Pressure is nominally in [0, 1] but is not clamped here; Bézier
/// interpolation can overshoot and the rasterizer clamps at its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub p: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, p: f64) -> Self {
        Self { x, y, p }
    }

    /// Position without pressure
    #[inline]
    pub fn xy(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Component-wise midpoint, pressure included
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.p + other.p) / 2.0,
        )
    }

    /// Reflect `other` through `self`.
    ///
    /// Used to mirror the previous segment's trailing control point through
    /// the shared endpoint so consecutive segments keep their tangent.
    pub fn mirror(self, other: Point) -> Point {
        other + (self - other) * 2.0
    }

    /// Euclidean distance in the plane (pressure ignored)
    pub fn distance(self, other: Point) -> f64 {
        self.xy().distance(other.xy())
    }

    /// `self + (other - self) * t`, applied to x, y and pressure
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y, self.p + rhs.p)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y, self.p - rhs.p)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs, self.p * rhs)
    }
}

/// 8-bit RGB ink color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` or `#RRGGBB` (case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let [r, g, b] = parse_hex_color(hex)?;
        Ok(Self { r, g, b })
    }

    /// `#RRGGBB` in upper case
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    #[inline]
    pub fn channels(&self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_PEN_COLOR
    }
}

/// Color plus nib width multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Rgb,
    pub nib: f64,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: DEFAULT_PEN_COLOR,
            nib: DEFAULT_NIB,
        }
    }
}

/// One pen-down to pen-up input.
///
/// `done == true` means visible. Only undo/redo flip it; strokes are never
/// removed from the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgb,
    pub nib: f64,
    #[serde(rename = "viewId", alias = "authorId")]
    pub author: AuthorId,
    pub done: bool,
    pub points: Vec<Point>,
}

impl Stroke {
    /// Start a visible stroke at `first`
    pub fn begin(author: AuthorId, pen: Pen, first: Point) -> Self {
        Self {
            color: pen.color,
            nib: pen.nib,
            author,
            done: true,
            points: vec![first],
        }
    }

    pub fn pen(&self) -> Pen {
        Pen {
            color: self.color,
            nib: self.nib,
        }
    }
}

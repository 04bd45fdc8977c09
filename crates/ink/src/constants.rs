use crate::types::Rgb;

/// Default ink color (#19082D, a blue-black).
pub const DEFAULT_PEN_COLOR: Rgb = Rgb::new(25, 8, 45);

/// Default nib width multiplier.
pub const DEFAULT_NIB: f64 = 1.0;

/// Palette offered by hosts, as (hex, name).
pub const PALETTE: [(&str, &str); 3] = [
    ("#19082D", "Black"),
    ("#D70049", "Red"),
    ("#238600", "Green"),
];

/// Nib presets offered by hosts.
pub const NIB_PRESETS: [f64; 2] = [1.0, 0.6];

/// Side of the square pixel window stamped per step.
pub const STAMP_SIZE: i64 = 5;

/// Offset from the rounded step center to the first stamped column/row.
pub const STAMP_OFFSET: i64 = 2;

/// Fraction of the chord used for the leading control point of a fresh segment.
pub const LEAD_CONTROL_FRACTION: f64 = 0.33;

/// Fraction of the chord used for the trailing control point without look-ahead.
pub const TRAIL_CONTROL_FRACTION: f64 = 0.66;

/// Catmull-Rom style tangent scale for the look-ahead control point (~1/6).
pub const LOOK_AHEAD_TANGENT: f64 = 0.1666;

/// Current snapshot envelope version.
pub const SNAPSHOT_VERSION: &str = "2";

/// Legacy envelope version (no stroke counter).
pub const SNAPSHOT_VERSION_LEGACY: &str = "1";

/// Largest accepted |x| or |y| of a pen sample, in canvas pixels.
pub const MAX_COORDINATE: f64 = 100_000.0;

/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_EXTENT: u32 = 8192;

/// Upper bound on the steps taken along one segment.
pub const MAX_SEGMENT_STEPS: usize = 1 << 20;

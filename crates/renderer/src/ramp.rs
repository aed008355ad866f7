//! Piecewise-linear elevation color ramps.
//!
//! A ramp is a sparse table of `(elevation, color)` control points. The
//! table does not have to be sorted: every lookup picks the closest point at
//! or below the query and the closest point at or above it, independently,
//! and interpolates each channel between them.
//!
//! Text format, one point per line:
//!
//! ```text
//! # elevation red green blue
//! 0    0   255 0
//! 4000 255 255 255
//! ```
//!
//! Black `(0, 0, 0)` is reserved for no-data in the rendered output, so
//! tables should not use it for real elevations.

use relief_common::{ReliefError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// No-data color of the rendered output.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }
}

/// Returned for elevations below every control point.
pub const OUT_OF_RANGE_LOW: Rgb = Rgb::new(150, 150, 255);

/// Returned for elevations above every control point.
pub const OUT_OF_RANGE_HIGH: Rgb = Rgb::new(255, 255, 255);

/// One control point of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPoint {
    pub elevation: f64,
    pub color: Rgb,
}

impl ColorPoint {
    pub fn new(elevation: f64, color: Rgb) -> Self {
        Self { elevation, color }
    }
}

/// An owned, read-only color table.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    points: Vec<ColorPoint>,
    below: Rgb,
    above: Rgb,
}

impl ColorRamp {
    /// Build a ramp from control points in any order.
    pub fn new(points: Vec<ColorPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(ReliefError::EmptyRamp);
        }
        if let Some(p) = points.iter().find(|p| !p.elevation.is_finite()) {
            return Err(ReliefError::invalid_parameter(
                "elevation",
                format!("control point elevation must be finite, got {}", p.elevation),
            ));
        }
        Ok(Self {
            points,
            below: OUT_OF_RANGE_LOW,
            above: OUT_OF_RANGE_HIGH,
        })
    }

    /// Replace the colors used outside the table's elevation range.
    pub fn with_out_of_range(mut self, below: Rgb, above: Rgb) -> Self {
        self.below = below;
        self.above = above;
        self
    }

    /// Parse the whitespace-separated text format.
    pub fn parse(text: &str) -> Result<Self> {
        let mut points = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            points.push(parse_point(idx + 1, line)?);
        }

        Self::new(points)
    }

    /// Load a ramp table from a text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReliefError::NotFound(path.display().to_string())
            } else {
                ReliefError::Io(e)
            }
        })?;

        let ramp = Self::parse(&content)?;
        if ramp.contains_black() {
            warn!(
                path = %path.display(),
                "Color ramp uses black (0 0 0); those cells will read as no-data"
            );
        }
        Ok(ramp)
    }

    /// Parse a JSON array of control points.
    pub fn from_json(json: &str) -> Result<Self> {
        let points: Vec<ColorPoint> = serde_json::from_str(json)?;
        Self::new(points)
    }

    /// Control points in table order.
    pub fn points(&self) -> &[ColorPoint] {
        &self.points
    }

    /// Whether any control point is true black.
    pub fn contains_black(&self) -> bool {
        self.points.iter().any(|p| p.color.is_black())
    }

    /// Index of the highest point at or below `elevation`; first wins ties.
    fn lower_index(&self, elevation: f64) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, p) in self.points.iter().enumerate() {
            if p.elevation <= elevation
                && best.map_or(true, |b| p.elevation > self.points[b].elevation)
            {
                best = Some(i);
            }
        }
        best
    }

    /// Index of the lowest point at or above `elevation`; first wins ties.
    fn upper_index(&self, elevation: f64) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, p) in self.points.iter().enumerate() {
            if p.elevation >= elevation
                && best.map_or(true, |b| p.elevation < self.points[b].elevation)
            {
                best = Some(i);
            }
        }
        best
    }

    /// Closest control point at or below `elevation`.
    pub fn lower(&self, elevation: f64) -> Option<&ColorPoint> {
        self.lower_index(elevation).map(|i| &self.points[i])
    }

    /// Closest control point at or above `elevation`.
    pub fn upper(&self, elevation: f64) -> Option<&ColorPoint> {
        self.upper_index(elevation).map(|i| &self.points[i])
    }

    /// Color for an elevation.
    pub fn color_at(&self, elevation: f64) -> Rgb {
        let Some(lo) = self.lower_index(elevation) else {
            return self.below;
        };
        let Some(hi) = self.upper_index(elevation) else {
            return self.above;
        };
        if lo == hi {
            return self.points[lo].color;
        }

        let lower = &self.points[lo];
        let upper = &self.points[hi];
        let t = (elevation - lower.elevation) / (upper.elevation - lower.elevation);
        interpolate_color(lower.color, upper.color, t)
    }
}

/// Linear color interpolation, truncating each channel.
pub fn interpolate_color(lower: Rgb, upper: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * t) as u8 };
    Rgb::new(
        channel(lower.r, upper.r),
        channel(lower.g, upper.g),
        channel(lower.b, upper.b),
    )
}

fn parse_point(line_no: usize, line: &str) -> Result<ColorPoint> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(ReliefError::ramp_parse(
            line_no,
            format!(
                "expected 'elevation red green blue', found {} fields",
                fields.len()
            ),
        ));
    }

    let elevation: f64 = fields[0].parse().map_err(|_| {
        ReliefError::ramp_parse(line_no, format!("invalid elevation '{}'", fields[0]))
    })?;
    if !elevation.is_finite() {
        return Err(ReliefError::ramp_parse(
            line_no,
            format!("elevation must be finite, got '{}'", fields[0]),
        ));
    }

    let channel = |name: &str, text: &str| -> Result<u8> {
        text.parse().map_err(|_| {
            ReliefError::ramp_parse(
                line_no,
                format!("{} must be an integer 0-255, got '{}'", name, text),
            )
        })
    };

    Ok(ColorPoint::new(
        elevation,
        Rgb::new(
            channel("red", fields[1])?,
            channel("green", fields[2])?,
            channel("blue", fields[3])?,
        ),
    ))
}

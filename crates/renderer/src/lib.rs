//! Color rendering for elevation rasters.
//!
//! - [`ramp`]: piecewise-linear elevation color tables
//! - [`relief`]: the color relief sweep writing three byte bands
//! - [`png`]: PNG encoding for grayscale and RGB output

pub mod png;
pub mod ramp;
pub mod relief;

pub use ramp::{interpolate_color, ColorPoint, ColorRamp, Rgb, OUT_OF_RANGE_HIGH, OUT_OF_RANGE_LOW};
pub use relief::{interleave_rgb, to_byte, ColorReliefSweep, ReliefSummary, RELIEF_BANDS};

//! Windowed terrain derivatives.
//!
//! Computes slope, aspect and shaded relief from a regular elevation grid
//! using a square stencil of configurable radius.
//!
//! # Architecture
//!
//! ```text
//! RasterSource
//!      │
//!      ▼
//! PixelSweep (row by row, boundary + no-data policy)
//!      │
//!      ├─► Stencil::sums(window)        weighted differences
//!      │         │
//!      │         ├─► slope()            degrees or percent
//!      │         ├─► CompassAspect      bearing, east-minus-west dx
//!      │         └─► ShadingAspect ──► LightSource::shade()
//!      │
//!      ▼
//! RasterSink::write_row
//! ```
//!
//! # Example
//!
//! ```ignore
//! use terrain::{DerivativeConfig, PixelSweep, Product, SlopeUnits};
//!
//! let config = DerivativeConfig::default();
//! let sweep = PixelSweep::new(Product::Slope(SlopeUnits::Degrees), &config)?;
//! let summary = sweep.run(&grid, &mut sink)?;
//! ```

pub mod angles;
pub mod aspect;
pub mod config;
pub mod shading;
pub mod slope;
pub mod stencil;
pub mod sweep;

pub use angles::{normalize_degrees, SCALE_FEET_LATLONG, SCALE_METERS_LATLONG};
pub use aspect::{compass_bearing, CompassAspect, ShadingAspect, FLAT_ASPECT};
pub use config::DerivativeConfig;
pub use shading::{illuminate, LightSource, SHADE_DARKEST, SHADE_NO_DATA};
pub use slope::{slope, slope_degrees, slope_percent, SlopeUnits};
pub use stencil::{compute_gradient, Gradient, Stencil, StencilSums, DEFAULT_SHARPNESS};
pub use sweep::{PixelSweep, Product, SweepSummary, DERIVATIVE_NO_DATA};

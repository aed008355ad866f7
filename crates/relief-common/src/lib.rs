//! Common types shared across the terrain-relief crates.
//!
//! - [`Grid`] and [`GridSpec`]: an immutable elevation surface and its geometry
//! - [`Window`]: the square neighborhood a stencil reads for one cell
//! - [`RasterSource`] / [`RasterSink`]: the row/window I/O boundary

pub mod error;
pub mod grid;
pub mod raster;
pub mod window;

pub use error::{ReliefError, Result};
pub use grid::{Grid, GridSpec, DEFAULT_NO_DATA};
pub use raster::{check_row, MemorySink, PixelType, RasterSink, RasterSource};
pub use window::Window;

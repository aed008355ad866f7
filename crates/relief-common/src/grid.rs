//! Regular elevation grids.

use crate::error::{ReliefError, Result};
use crate::raster::RasterSource;
use serde::{Deserialize, Serialize};

/// Default no-data value when a source does not declare one.
pub const DEFAULT_NO_DATA: f32 = -9999.0;

/// Specification of a regular, north-up grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// East-west cell size (positive for west-to-east columns)
    pub ew_res: f64,
    /// North-south cell size (negative when rows go north to south)
    pub ns_res: f64,
    /// X coordinate of the top-left corner of the top-left cell
    pub origin_x: f64,
    /// Y coordinate of the top-left corner of the top-left cell
    pub origin_y: f64,
    /// Sentinel marking cells without a measurement
    pub no_data: f32,
}

impl GridSpec {
    /// Create a grid specification anchored at the origin.
    pub fn new(width: usize, height: usize, ew_res: f64, ns_res: f64, no_data: f32) -> Self {
        Self {
            width,
            height,
            ew_res,
            ns_res,
            origin_x: 0.0,
            origin_y: 0.0,
            no_data,
        }
    }

    /// Set the top-left corner coordinates.
    pub fn with_origin(mut self, origin_x: f64, origin_y: f64) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Check that the cell sizes can be used as divisors.
    pub fn validate(&self) -> Result<()> {
        if !self.ew_res.is_finite() || self.ew_res == 0.0 {
            return Err(ReliefError::invalid_parameter(
                "ew_res",
                format!("cell size must be finite and non-zero, got {}", self.ew_res),
            ));
        }
        if !self.ns_res.is_finite() || self.ns_res == 0.0 {
            return Err(ReliefError::invalid_parameter(
                "ns_res",
                format!("cell size must be finite and non-zero, got {}", self.ns_res),
            ));
        }
        Ok(())
    }

    /// Whether a sample must be skipped as no-data.
    #[inline]
    pub fn is_no_data(&self, value: f32) -> bool {
        value == self.no_data || value.is_nan()
    }

    /// Whether the cell is closer than `radius` cells to any edge.
    #[inline]
    pub fn is_boundary(&self, row: usize, col: usize, radius: usize) -> bool {
        row < radius
            || col < radius
            || row + radius >= self.height
            || col + radius >= self.width
    }

    /// Coordinates of the center of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.ew_res,
            self.origin_y + (row as f64 + 0.5) * self.ns_res,
        )
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub(crate) fn describe(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// An immutable, fully loaded elevation grid in row-major order.
#[derive(Debug, Clone)]
pub struct Grid {
    spec: GridSpec,
    data: Vec<f32>,
}

impl Grid {
    /// Wrap row-major data; the length must match the specification.
    pub fn new(spec: GridSpec, data: Vec<f32>) -> Result<Self> {
        if data.len() != spec.len() {
            return Err(ReliefError::InvalidData(format!(
                "expected {} values for a {} grid, got {}",
                spec.len(),
                spec.describe(),
                data.len()
            )));
        }
        Ok(Self { spec, data })
    }

    /// Grid specification.
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Bounds-checked cell read.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.spec.height || col >= self.spec.width {
            return None;
        }
        self.data.get(row * self.spec.width + col).copied()
    }

    /// One full row.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.spec.height {
            return None;
        }
        let start = row * self.spec.width;
        Some(&self.data[start..start + self.spec.width])
    }

    /// Raw row-major values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

impl RasterSource for Grid {
    fn spec(&self) -> &GridSpec {
        &self.spec
    }

    fn read_window(&self, row0: usize, col0: usize, size: usize, buf: &mut [f32]) -> Result<()> {
        if row0 + size > self.spec.height || col0 + size > self.spec.width {
            return Err(ReliefError::out_of_bounds(
                format!("{size}x{size} at row {row0}, col {col0}"),
                self.spec.describe(),
            ));
        }
        if buf.len() < size * size {
            return Err(ReliefError::InvalidData(format!(
                "window buffer holds {} values, need {}",
                buf.len(),
                size * size
            )));
        }

        for (r, dst) in buf.chunks_exact_mut(size).take(size).enumerate() {
            let start = (row0 + r) * self.spec.width + col0;
            dst.copy_from_slice(&self.data[start..start + size]);
        }
        Ok(())
    }

    fn read_row(&self, row: usize, buf: &mut [f32]) -> Result<()> {
        let src = self.row(row).ok_or_else(|| {
            ReliefError::out_of_bounds(format!("row {row}"), self.spec.describe())
        })?;
        if buf.len() != src.len() {
            return Err(ReliefError::RowLength {
                row,
                actual: buf.len(),
                expected: src.len(),
            });
        }
        buf.copy_from_slice(src);
        Ok(())
    }
}

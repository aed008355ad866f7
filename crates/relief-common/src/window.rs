//! Square sampling windows around a center cell.

use crate::error::Result;
use crate::grid::GridSpec;
use crate::raster::RasterSource;

/// A `(2r+1) x (2r+1)` neighborhood addressed by offsets from its center.
///
/// The buffer is reused from cell to cell; every `load` overwrites all of it.
#[derive(Debug, Clone)]
pub struct Window {
    radius: usize,
    size: usize,
    values: Vec<f32>,
}

impl Window {
    /// Allocate an empty window of the given radius.
    pub fn new(radius: usize) -> Self {
        let size = 2 * radius + 1;
        Self {
            radius,
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build a window directly from row-major samples.
    pub fn from_values(radius: usize, values: Vec<f32>) -> Option<Self> {
        let size = 2 * radius + 1;
        if values.len() != size * size {
            return None;
        }
        Some(Self {
            radius,
            size,
            values,
        })
    }

    /// Fill the window centered on `(row, col)`.
    ///
    /// The caller is responsible for skipping boundary cells.
    pub fn load<S: RasterSource + ?Sized>(&mut self, source: &S, row: usize, col: usize) -> Result<()> {
        source.read_window(
            row - self.radius,
            col - self.radius,
            self.size,
            &mut self.values,
        )
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Sample at a signed offset; `dr` grows southwards, `dc` eastwards.
    #[inline]
    pub fn at(&self, dr: isize, dc: isize) -> f32 {
        let r = (self.radius as isize + dr) as usize;
        let c = (self.radius as isize + dc) as usize;
        self.values[r * self.size + c]
    }

    /// True when any sample is the grid's no-data value.
    pub fn contains_no_data(&self, spec: &GridSpec) -> bool {
        self.values.iter().any(|&v| spec.is_no_data(v))
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

//! Raster source and sink interfaces consumed by the sweeps.

use crate::error::{ReliefError, Result};
use crate::grid::GridSpec;

/// Storage type of an output band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    /// 8-bit unsigned
    Byte,
    /// 32-bit float
    Float32,
}

/// Supplies rectangular pixel windows on demand.
pub trait RasterSource {
    /// Dimensions, cell sizes and no-data value.
    fn spec(&self) -> &GridSpec;

    /// Copy the `size x size` block whose top-left cell is `(row0, col0)` into `buf`.
    fn read_window(&self, row0: usize, col0: usize, size: usize, buf: &mut [f32]) -> Result<()>;

    /// Copy one full row into `buf`, one pixel at a time unless overridden.
    fn read_row(&self, row: usize, buf: &mut [f32]) -> Result<()> {
        let width = self.spec().width;
        if buf.len() != width {
            return Err(ReliefError::RowLength {
                row,
                actual: buf.len(),
                expected: width,
            });
        }
        for (col, value) in buf.iter_mut().enumerate() {
            self.read_window(row, col, 1, std::slice::from_mut(value))?;
        }
        Ok(())
    }
}

/// Accepts computed rows, one band at a time.
pub trait RasterSink {
    /// Number of bands the sink was created with.
    fn band_count(&self) -> usize;

    /// Store one row of a band. Bands are zero-based.
    fn write_row(&mut self, band: usize, row: usize, values: &[f32]) -> Result<()>;

    /// Flush and persist the output. Nothing is visible at the destination before this.
    fn finish(&mut self) -> Result<()>;
}

impl<T: RasterSink + ?Sized> RasterSink for Box<T> {
    fn band_count(&self) -> usize {
        (**self).band_count()
    }

    fn write_row(&mut self, band: usize, row: usize, values: &[f32]) -> Result<()> {
        (**self).write_row(band, row, values)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// In-memory sink, one row-major buffer per band.
#[derive(Debug, Clone)]
pub struct MemorySink {
    width: usize,
    height: usize,
    bands: Vec<Vec<f32>>,
    rows_written: Vec<usize>,
    finished: bool,
}

impl MemorySink {
    pub fn new(width: usize, height: usize, band_count: usize) -> Self {
        Self {
            width,
            height,
            bands: vec![vec![0.0; width * height]; band_count],
            rows_written: Vec::new(),
            finished: false,
        }
    }

    /// Full contents of one band.
    pub fn band(&self, band: usize) -> &[f32] {
        &self.bands[band]
    }

    /// Value of one cell.
    pub fn value(&self, band: usize, row: usize, col: usize) -> f32 {
        self.bands[band][row * self.width + col]
    }

    /// Row indices in the order they were written to band 0.
    pub fn rows_written(&self) -> &[usize] {
        &self.rows_written
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl RasterSink for MemorySink {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn write_row(&mut self, band: usize, row: usize, values: &[f32]) -> Result<()> {
        check_row(self.bands.len(), self.width, self.height, band, row, values)?;
        let start = row * self.width;
        self.bands[band][start..start + self.width].copy_from_slice(values);
        if band == 0 {
            self.rows_written.push(row);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Shared argument validation for sink implementations.
pub fn check_row(
    bands: usize,
    width: usize,
    height: usize,
    band: usize,
    row: usize,
    values: &[f32],
) -> Result<()> {
    if band >= bands {
        return Err(ReliefError::InvalidBand { band, bands });
    }
    if row >= height {
        return Err(ReliefError::out_of_bounds(
            format!("row {row}"),
            format!("{width}x{height}"),
        ));
    }
    if values.len() != width {
        return Err(ReliefError::RowLength {
            row,
            actual: values.len(),
            expected: width,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_write() {
        let mut sink = MemorySink::new(3, 2, 1);
        sink.write_row(0, 1, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(sink.value(0, 1, 2), 3.0);
        assert_eq!(sink.rows_written(), &[1]);
    }

    #[test]
    fn test_memory_sink_rejects_bad_rows() {
        let mut sink = MemorySink::new(3, 2, 1);
        assert!(matches!(
            sink.write_row(1, 0, &[0.0; 3]),
            Err(ReliefError::InvalidBand { band: 1, bands: 1 })
        ));
        assert!(sink.write_row(0, 2, &[0.0; 3]).is_err());
        assert!(matches!(
            sink.write_row(0, 0, &[0.0; 2]),
            Err(ReliefError::RowLength { .. })
        ));
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<MemorySink> = Box::new(MemorySink::new(2, 1, 3));
        assert_eq!(sink.band_count(), 3);
        sink.write_row(2, 0, &[4.0, 5.0]).unwrap();
        sink.finish().unwrap();
        assert!(sink.is_finished());
    }
}

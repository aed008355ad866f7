//! Color relief: elevation rows mapped through a ramp into three byte bands.

use crate::ramp::{ColorRamp, Rgb};
use rayon::prelude::*;
use relief_common::{ReliefError, RasterSink, RasterSource, Result};
use tracing::{debug, info};

/// Number of bands written by a color relief sweep.
pub const RELIEF_BANDS: usize = 3;

/// Counts reported after a color relief sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReliefSummary {
    pub rows: usize,
    pub colored_cells: usize,
    pub no_data_cells: usize,
}

/// One output row, split into channels.
#[derive(Debug, Clone)]
struct RowColors {
    red: Vec<f32>,
    green: Vec<f32>,
    blue: Vec<f32>,
    no_data: usize,
}

impl RowColors {
    fn new(width: usize) -> Self {
        Self {
            red: vec![0.0; width],
            green: vec![0.0; width],
            blue: vec![0.0; width],
            no_data: 0,
        }
    }

    fn set(&mut self, col: usize, color: Rgb) {
        self.red[col] = color.r as f32;
        self.green[col] = color.g as f32;
        self.blue[col] = color.b as f32;
    }
}

/// Maps every cell of a source through a color ramp.
#[derive(Debug, Clone)]
pub struct ColorReliefSweep<'a> {
    ramp: &'a ColorRamp,
    parallel: bool,
    batch_rows: usize,
}

impl<'a> ColorReliefSweep<'a> {
    pub fn new(ramp: &'a ColorRamp) -> Self {
        Self {
            ramp,
            parallel: false,
            batch_rows: 64,
        }
    }

    /// Color batches of `batch_rows` rows on the rayon pool.
    pub fn with_parallel(mut self, batch_rows: usize) -> Self {
        self.parallel = true;
        self.batch_rows = batch_rows.max(1);
        self
    }

    /// Color every row of `source` into bands 0-2 of `sink`.
    pub fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<ReliefSummary>
    where
        S: RasterSource + Sync + ?Sized,
        K: RasterSink + ?Sized,
    {
        if sink.band_count() < RELIEF_BANDS {
            return Err(ReliefError::InvalidBand {
                band: RELIEF_BANDS - 1,
                bands: sink.band_count(),
            });
        }

        let spec = source.spec();
        debug!(
            width = spec.width,
            height = spec.height,
            control_points = self.ramp.points().len(),
            parallel = self.parallel,
            "Starting color relief"
        );

        let mut summary = ReliefSummary::default();
        let batch = if self.parallel { self.batch_rows } else { 1 };
        let mut start = 0;

        while start < spec.height {
            let end = (start + batch).min(spec.height);

            let rows: Vec<Result<RowColors>> = if self.parallel {
                (start..end)
                    .into_par_iter()
                    .map(|row| self.color_row(source, row))
                    .collect()
            } else {
                (start..end).map(|row| self.color_row(source, row)).collect()
            };

            for (offset, colored) in rows.into_iter().enumerate() {
                let colors = colored?;
                let row = start + offset;
                sink.write_row(0, row, &colors.red)?;
                sink.write_row(1, row, &colors.green)?;
                sink.write_row(2, row, &colors.blue)?;

                summary.rows += 1;
                summary.no_data_cells += colors.no_data;
                summary.colored_cells += spec.width - colors.no_data;
            }

            start = end;
        }

        info!(
            rows = summary.rows,
            colored_cells = summary.colored_cells,
            no_data_cells = summary.no_data_cells,
            "Color relief complete"
        );
        Ok(summary)
    }

    fn color_row<S>(&self, source: &S, row: usize) -> Result<RowColors>
    where
        S: RasterSource + ?Sized,
    {
        let spec = source.spec();
        let mut elevations = vec![0.0f32; spec.width];
        source.read_row(row, &mut elevations)?;

        let mut colors = RowColors::new(spec.width);
        for (col, &z) in elevations.iter().enumerate() {
            if spec.is_no_data(z) {
                colors.set(col, Rgb::BLACK);
                colors.no_data += 1;
            } else {
                colors.set(col, self.ramp.color_at(z as f64));
            }
        }
        Ok(colors)
    }
}

/// Interleave three byte bands into packed `r g b` pixels.
pub fn interleave_rgb(red: &[f32], green: &[f32], blue: &[f32]) -> Vec<u8> {
    red.iter()
        .zip(green)
        .zip(blue)
        .flat_map(|((&r, &g), &b)| [to_byte(r), to_byte(g), to_byte(b)])
        .collect()
}

/// Clamp a band value into a byte.
pub fn to_byte(value: f32) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_common::{Grid, GridSpec, MemorySink};

    #[test]
    fn test_rejects_single_band_sink() {
        let ramp = ColorRamp::parse("0 0 255 0").unwrap();
        let grid = Grid::new(GridSpec::new(1, 1, 1.0, -1.0, -9999.0), vec![0.0]).unwrap();
        let mut sink = MemorySink::new(1, 1, 1);
        assert!(matches!(
            ColorReliefSweep::new(&ramp).run(&grid, &mut sink),
            Err(ReliefError::InvalidBand { .. })
        ));
    }

    #[test]
    fn test_no_data_is_black() {
        let ramp = ColorRamp::parse("0 0 255 0\n4000 255 255 255").unwrap();
        let spec = GridSpec::new(2, 1, 1.0, -1.0, -9999.0);
        let grid = Grid::new(spec, vec![-9999.0, f32::NAN]).unwrap();
        let mut sink = MemorySink::new(2, 1, 3);
        let summary = ColorReliefSweep::new(&ramp).run(&grid, &mut sink).unwrap();

        assert_eq!(summary.no_data_cells, 2);
        for band in 0..3 {
            assert_eq!(sink.band(band), &[0.0, 0.0]);
        }
    }

    #[test]
    fn test_interleave_rgb() {
        let bytes = interleave_rgb(&[1.0, 4.0], &[2.0, 5.0], &[3.0, 300.0]);
        assert_eq!(bytes, vec![1, 2, 3, 4, 5, 255]);
    }
}

//! Row-by-row sweep producing slope, aspect or hillshade rasters.
//!
//! ```text
//! for each row:
//!     for each col:
//!         boundary cell?        -> no-data
//!         load window
//!         window has no-data?   -> no-data
//!         stencil -> product    -> value
//!     write row to sink
//! ```
//!
//! In parallel mode a batch of rows is computed on the rayon pool, then the
//! batch is written in row order. Every row owns its own window and buffer,
//! so the output is identical to the sequential sweep.

use crate::aspect::{CompassAspect, ShadingAspect, FLAT_ASPECT};
use crate::config::DerivativeConfig;
use crate::shading::{LightSource, SHADE_NO_DATA};
use crate::slope::{slope, slope_degrees, SlopeUnits};
use crate::stencil::Stencil;
use rayon::prelude::*;
use relief_common::{PixelType, RasterSink, RasterSource, Result, Window};
use tracing::{debug, info};

/// No-data value written to slope and aspect outputs.
pub const DERIVATIVE_NO_DATA: f32 = -9999.0;

/// The raster a sweep produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Product {
    Slope(SlopeUnits),
    Aspect,
    Hillshade(LightSource),
}

impl Product {
    /// Storage type of the output band.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Product::Slope(_) | Product::Aspect => PixelType::Float32,
            Product::Hillshade(_) => PixelType::Byte,
        }
    }

    /// Value written for boundary and contaminated cells.
    pub fn no_data(&self) -> f32 {
        match self {
            Product::Slope(_) => DERIVATIVE_NO_DATA,
            Product::Aspect => FLAT_ASPECT as f32,
            Product::Hillshade(_) => SHADE_NO_DATA as f32,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Product::Slope(_) => "slope",
            Product::Aspect => "aspect",
            Product::Hillshade(_) => "hillshade",
        }
    }
}

/// Counts reported after a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub rows: usize,
    pub valid_cells: usize,
    pub no_data_cells: usize,
}

/// Walks every cell of a source and writes one product band.
#[derive(Debug, Clone)]
pub struct PixelSweep {
    product: Product,
    stencil: Stencil,
    scale: f64,
    parallel: bool,
    batch_rows: usize,
}

impl PixelSweep {
    /// Build a sweep from a validated configuration.
    pub fn new(product: Product, config: &DerivativeConfig) -> Result<Self> {
        config.validate()?;
        if let Product::Hillshade(light) = product {
            light.validate()?;
        }
        Ok(Self {
            product,
            stencil: Stencil::new(config.radius, config.z_factor, config.sharpness)?,
            scale: config.scale,
            parallel: config.parallel,
            batch_rows: config.batch_rows,
        })
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn radius(&self) -> usize {
        self.stencil.radius()
    }

    /// Run the sweep, writing band 0 of `sink` row by row.
    pub fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<SweepSummary>
    where
        S: RasterSource + Sync + ?Sized,
        K: RasterSink + ?Sized,
    {
        let spec = source.spec();
        spec.validate()?;
        debug!(
            product = self.product.name(),
            width = spec.width,
            height = spec.height,
            radius = self.radius(),
            parallel = self.parallel,
            "Starting derivative sweep"
        );

        let summary = if self.parallel {
            self.run_batched(source, sink)?
        } else {
            self.run_sequential(source, sink)?
        };

        info!(
            product = self.product.name(),
            rows = summary.rows,
            valid_cells = summary.valid_cells,
            no_data_cells = summary.no_data_cells,
            "Derivative sweep complete"
        );
        Ok(summary)
    }

    fn run_sequential<S, K>(&self, source: &S, sink: &mut K) -> Result<SweepSummary>
    where
        S: RasterSource + ?Sized,
        K: RasterSink + ?Sized,
    {
        let spec = source.spec();
        let mut window = Window::new(self.radius());
        let mut row_buf = vec![self.product.no_data(); spec.width];
        let mut summary = SweepSummary::default();

        for row in 0..spec.height {
            let valid = self.compute_row(source, row, &mut window, &mut row_buf)?;
            sink.write_row(0, row, &row_buf)?;
            summary.add_row(valid, spec.width);
        }

        Ok(summary)
    }

    fn run_batched<S, K>(&self, source: &S, sink: &mut K) -> Result<SweepSummary>
    where
        S: RasterSource + Sync + ?Sized,
        K: RasterSink + ?Sized,
    {
        let spec = source.spec();
        let mut summary = SweepSummary::default();
        let mut start = 0;

        while start < spec.height {
            let end = (start + self.batch_rows).min(spec.height);

            let rows: Vec<Result<(Vec<f32>, usize)>> = (start..end)
                .into_par_iter()
                .map(|row| {
                    let mut window = Window::new(self.radius());
                    let mut row_buf = vec![self.product.no_data(); spec.width];
                    let valid = self.compute_row(source, row, &mut window, &mut row_buf)?;
                    Ok((row_buf, valid))
                })
                .collect();

            for (offset, computed) in rows.into_iter().enumerate() {
                let (row_buf, valid) = computed?;
                sink.write_row(0, start + offset, &row_buf)?;
                summary.add_row(valid, spec.width);
            }

            start = end;
        }

        Ok(summary)
    }

    /// Fill one output row; returns the number of cells with a value.
    pub fn compute_row<S>(
        &self,
        source: &S,
        row: usize,
        window: &mut Window,
        out: &mut [f32],
    ) -> Result<usize>
    where
        S: RasterSource + ?Sized,
    {
        let spec = source.spec();
        let no_data = self.product.no_data();
        let mut valid = 0;

        for (col, cell) in out.iter_mut().enumerate() {
            if spec.is_boundary(row, col, self.radius()) {
                *cell = no_data;
                continue;
            }

            window.load(source, row, col)?;
            match self.cell_value(window, source) {
                Some(value) => {
                    *cell = value;
                    valid += 1;
                }
                None => *cell = no_data,
            }
        }

        Ok(valid)
    }

    fn cell_value<S>(&self, window: &Window, source: &S) -> Option<f32>
    where
        S: RasterSource + ?Sized,
    {
        let spec = source.spec();
        let sums = self.stencil.sums(window, spec)?;

        match self.product {
            Product::Slope(units) => {
                let gradient = sums.gradient(spec.ew_res, spec.ns_res, self.scale);
                Some(slope(&gradient, units) as f32)
            }
            Product::Aspect => CompassAspect.bearing(&sums).map(|a| a as f32),
            Product::Hillshade(light) => {
                let gradient = sums.gradient(spec.ew_res, spec.ns_res, self.scale);
                let aspect = ShadingAspect.radians(&gradient);
                Some(light.shade(slope_degrees(&gradient), aspect) as f32)
            }
        }
    }
}

impl SweepSummary {
    fn add_row(&mut self, valid: usize, width: usize) {
        self.rows += 1;
        self.valid_cells += valid;
        self.no_data_cells += width - valid;
    }
}

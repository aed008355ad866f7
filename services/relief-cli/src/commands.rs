//! Subcommand execution.
//!
//! Every input (grid, ramp, configuration) is loaded and validated before the
//! output is created, so a rejected run never touches the destination.

use std::path::Path;

use anyhow::{Context, Result};
use grid_io::{create_output, open_grid};
use relief_common::{PixelType, RasterSink};
use renderer::{ColorRamp, ColorReliefSweep, RELIEF_BANDS};
use terrain::{DerivativeConfig, LightSource, PixelSweep, Product, SlopeUnits};
use tracing::info;

use crate::{Args, Command, StencilArgs};

/// Command-line overrides applied on top of file and environment settings.
#[derive(Debug, Default, Clone, Copy)]
struct Overrides {
    stencil: StencilArgs,
    z_factor: Option<f64>,
    scale: Option<f64>,
    percent: bool,
    azimuth: Option<f64>,
    altitude: Option<f64>,
    parallel: bool,
}

/// Resolve the configuration: defaults < config file < env < flags.
fn resolve_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<DerivativeConfig> {
    let base = match config_path {
        Some(path) => DerivativeConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DerivativeConfig::default(),
    };
    let mut config = base.with_env();

    if let Some(radius) = overrides.stencil.radius {
        config.radius = radius;
    }
    if let Some(sharpness) = overrides.stencil.sharpness {
        config.sharpness = sharpness;
    }
    if let Some(z) = overrides.z_factor {
        config.z_factor = z;
    }
    if let Some(scale) = overrides.scale {
        config.scale = scale;
    }
    if overrides.percent {
        config.slope_units = SlopeUnits::Percent;
    }
    if overrides.azimuth.is_some() || overrides.altitude.is_some() {
        config.light = LightSource::new(
            overrides.azimuth.unwrap_or(config.light.azimuth),
            overrides.altitude.unwrap_or(config.light.altitude),
        )
        .context("invalid light source")?;
    }
    if overrides.parallel {
        config.parallel = true;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

pub fn run(args: Args) -> Result<()> {
    let config_path = args.config.as_deref();

    match args.command {
        Command::Slope {
            input,
            output,
            percent,
            scale,
            z_factor,
            stencil,
        } => {
            let overrides = Overrides {
                stencil,
                z_factor,
                scale,
                percent,
                parallel: args.parallel,
                ..Overrides::default()
            };
            let config = resolve_config(config_path, &overrides)?;
            run_derivative(&input, &output, Product::Slope(config.slope_units), &config)
        }
        Command::Aspect {
            input,
            output,
            stencil,
        } => {
            let overrides = Overrides {
                stencil,
                parallel: args.parallel,
                ..Overrides::default()
            };
            let config = resolve_config(config_path, &overrides)?;
            run_derivative(&input, &output, Product::Aspect, &config)
        }
        Command::Hillshade {
            input,
            output,
            z_factor,
            scale,
            azimuth,
            altitude,
            stencil,
        } => {
            let overrides = Overrides {
                stencil,
                z_factor,
                scale,
                azimuth,
                altitude,
                parallel: args.parallel,
                ..Overrides::default()
            };
            let config = resolve_config(config_path, &overrides)?;
            run_derivative(&input, &output, Product::Hillshade(config.light), &config)
        }
        Command::ColorRelief {
            input,
            ramp,
            output,
        } => {
            let overrides = Overrides {
                parallel: args.parallel,
                ..Overrides::default()
            };
            let config = resolve_config(config_path, &overrides)?;
            run_color_relief(&input, &ramp, &output, &config)
        }
    }
}

fn run_derivative(
    input: &Path,
    output: &Path,
    product: Product,
    config: &DerivativeConfig,
) -> Result<()> {
    let grid =
        open_grid(input).with_context(|| format!("failed to open {}", input.display()))?;
    let sweep = PixelSweep::new(product, config)?;
    let spec = *grid.spec();

    let mut sink = create_output(
        output,
        spec.width,
        spec.height,
        1,
        product.pixel_type(),
        &spec,
        product.no_data(),
    )
    .with_context(|| format!("failed to create {}", output.display()))?;

    let summary = sweep.run(&grid, &mut sink)?;
    sink.finish()
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        product = product.name(),
        output = %output.display(),
        rows = summary.rows,
        valid_cells = summary.valid_cells,
        "Done"
    );
    Ok(())
}

fn run_color_relief(
    input: &Path,
    ramp_path: &Path,
    output: &Path,
    config: &DerivativeConfig,
) -> Result<()> {
    let grid =
        open_grid(input).with_context(|| format!("failed to open {}", input.display()))?;
    let ramp = ColorRamp::from_file(ramp_path)
        .with_context(|| format!("failed to load color ramp {}", ramp_path.display()))?;
    let spec = *grid.spec();

    let mut sink = create_output(
        output,
        spec.width,
        spec.height,
        RELIEF_BANDS,
        PixelType::Byte,
        &spec,
        0.0,
    )
    .with_context(|| format!("failed to create {}", output.display()))?;

    let mut sweep = ColorReliefSweep::new(&ramp);
    if config.parallel {
        sweep = sweep.with_parallel(config.batch_rows);
    }
    let summary = sweep.run(&grid, &mut sink)?;
    sink.finish()
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        output = %output.display(),
        rows = summary.rows,
        colored_cells = summary.colored_cells,
        "Done"
    );
    Ok(())
}

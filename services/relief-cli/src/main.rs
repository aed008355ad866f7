//! Relief command-line tool.
//!
//! Generates slope, aspect, hillshade and color relief rasters from an
//! elevation grid:
//!
//! ```text
//! relief slope dem.asc slope.asc --percent
//! relief hillshade dem.asc shade.png --az 315 --alt 45
//! relief color-relief dem.asc ramp.txt relief.png
//! ```
//!
//! Settings resolve in order: defaults, `--config` file, `RELIEF_*`
//! environment variables, then command-line flags.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "relief")]
#[command(about = "Terrain derivatives and color relief from elevation grids")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// JSON file with a serialized derivative configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Compute batches of rows in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Slope in degrees (or percent)
    Slope {
        input: PathBuf,
        output: PathBuf,

        /// Write percent slope instead of degrees
        #[arg(long)]
        percent: bool,

        /// Ratio of vertical to horizontal units (111120 for meters over lat/long)
        #[arg(short, long)]
        scale: Option<f64>,

        /// Vertical exaggeration
        #[arg(short, long)]
        z_factor: Option<f64>,

        #[command(flatten)]
        stencil: StencilArgs,
    },

    /// Aspect as a compass bearing; flat cells are -9999
    Aspect {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        stencil: StencilArgs,
    },

    /// Shaded relief (byte raster, 0 = no-data)
    Hillshade {
        input: PathBuf,
        output: PathBuf,

        /// Vertical exaggeration
        #[arg(short, long)]
        z_factor: Option<f64>,

        /// Ratio of vertical to horizontal units
        #[arg(short, long)]
        scale: Option<f64>,

        /// Light azimuth in degrees clockwise from north
        #[arg(long, visible_alias = "az")]
        azimuth: Option<f64>,

        /// Light altitude in degrees above the horizon
        #[arg(long, visible_alias = "alt")]
        altitude: Option<f64>,

        #[command(flatten)]
        stencil: StencilArgs,
    },

    /// Color relief through an elevation color ramp
    ColorRelief {
        input: PathBuf,
        ramp: PathBuf,
        output: PathBuf,
    },
}

/// Window options shared by the derivative commands.
#[derive(ClapArgs, Debug, Default, Clone, Copy)]
struct StencilArgs {
    /// Window radius in cells (1 = 3x3)
    #[arg(short, long)]
    radius: Option<usize>,

    /// Weight base for rings beyond the first
    #[arg(long)]
    sharpness: Option<f64>,
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.json_logs) {
        eprintln!("failed to initialize logging: {e:#}");
    }

    if let Err(e) = commands::run(args) {
        error!(error = %e, "relief failed");
        eprintln!("relief: {e:#}");
        std::process::exit(1);
    }
}

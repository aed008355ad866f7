//! Raster input and output for the relief tools.
//!
//! Formats are picked by file extension:
//!
//! | Extension | Read | Write                          |
//! |-----------|------|--------------------------------|
//! | `.asc`    | yes  | one band, byte or float        |
//! | `.png`    | no   | one (gray) or three (RGB) bytes, plus `.pgw` |
//!
//! Outputs never appear at their destination until [`RasterSink::finish`]
//! succeeds; a sink dropped early removes its temporary file.

pub mod ascii;
pub mod png_sink;

pub use ascii::{parse_ascii_grid, read_ascii_grid, AsciiGridSink, AsciiHeader};
pub use png_sink::{world_file_contents, world_file_path, PngSink};

use relief_common::{Grid, GridSpec, PixelType, RasterSink, ReliefError, Result};
use std::path::Path;
use tracing::warn;

/// Raster formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    AsciiGrid,
    Png,
}

impl RasterFormat {
    /// Detect the format of a path from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("asc") => Ok(RasterFormat::AsciiGrid),
            Some("png") => Ok(RasterFormat::Png),
            _ => Err(ReliefError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Open an elevation grid.
pub fn open_grid(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReliefError::NotFound(path.display().to_string()));
    }

    let grid = match RasterFormat::from_path(path)? {
        RasterFormat::AsciiGrid => read_ascii_grid(path)?,
        RasterFormat::Png => {
            return Err(ReliefError::UnsupportedFormat(format!(
                "{} (PNG is output only)",
                path.display()
            )))
        }
    };

    let spec = grid.spec();
    if (spec.ew_res.abs() - spec.ns_res.abs()).abs() > f64::EPSILON * spec.ew_res.abs() {
        warn!(
            ew_res = spec.ew_res,
            ns_res = spec.ns_res,
            "Grid cells are not square"
        );
    }
    Ok(grid)
}

/// Create an output raster.
///
/// `georef_from` supplies cell size and origin; `width` and `height` must
/// match it.
pub fn create_output(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
    band_count: usize,
    pixel_type: PixelType,
    georef_from: &GridSpec,
    no_data: f32,
) -> Result<Box<dyn RasterSink>> {
    let path = path.as_ref();
    if width != georef_from.width || height != georef_from.height {
        return Err(ReliefError::invalid_parameter(
            "size",
            format!(
                "output {}x{} does not match georeference {}x{}",
                width, height, georef_from.width, georef_from.height
            ),
        ));
    }

    match RasterFormat::from_path(path)? {
        RasterFormat::AsciiGrid => {
            if band_count != 1 {
                return Err(ReliefError::invalid_parameter(
                    "band_count",
                    format!("ASCII grids hold one band, got {}", band_count),
                ));
            }
            let header = AsciiHeader::from_spec(georef_from, no_data);
            Ok(Box::new(AsciiGridSink::create(path, header, pixel_type)?))
        }
        RasterFormat::Png => {
            if pixel_type != PixelType::Byte {
                return Err(ReliefError::invalid_parameter(
                    "pixel_type",
                    "PNG output holds byte data only; use .asc for float rasters",
                ));
            }
            Ok(Box::new(PngSink::create(
                path,
                width,
                height,
                band_count,
                georef_from,
            )?))
        }
    }
}

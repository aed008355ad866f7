//! PNG output with an ESRI world file (`.pgw`).
//!
//! PNG needs the whole image before encoding, so rows are buffered and
//! clamped to bytes when the file is encoded on `finish`. Both the image and the world file are
//! written to temporary files and renamed into place.

use relief_common::{check_row, GridSpec, RasterSink, ReliefError, Result};
use renderer::png::{create_png_gray, create_png_rgb_auto};
use renderer::{interleave_rgb, to_byte};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Six-line world file for the top-left pixel center.
pub fn world_file_contents(spec: &GridSpec) -> String {
    let (x, y) = spec.cell_center(0, 0);
    format!(
        "{}\n0.0\n0.0\n{}\n{}\n{}\n",
        spec.ew_res, spec.ns_res, x, y
    )
}

/// Path of the world file that accompanies `path`.
pub fn world_file_path(path: &Path) -> PathBuf {
    path.with_extension("pgw")
}

/// Byte raster sink encoding one (gray) or three (RGB) bands.
pub struct PngSink {
    path: PathBuf,
    georef: GridSpec,
    width: usize,
    height: usize,
    bands: Vec<Vec<f32>>,
    written: Vec<Vec<bool>>,
    finished: bool,
}

impl PngSink {
    pub fn create(
        path: impl Into<PathBuf>,
        width: usize,
        height: usize,
        band_count: usize,
        georef: &GridSpec,
    ) -> Result<Self> {
        if band_count != 1 && band_count != 3 {
            return Err(ReliefError::invalid_parameter(
                "band_count",
                format!("PNG output needs 1 or 3 bands, got {}", band_count),
            ));
        }
        Ok(Self {
            path: path.into(),
            georef: *georef,
            width,
            height,
            bands: vec![vec![0.0; width * height]; band_count],
            written: vec![vec![false; height]; band_count],
            finished: false,
        })
    }

    fn encode(&self) -> Result<Vec<u8>> {
        match self.bands.as_slice() {
            [gray] => {
                let pixels: Vec<u8> = gray.iter().map(|&v| to_byte(v)).collect();
                create_png_gray(&pixels, self.width, self.height)
            }
            [red, green, blue] => {
                create_png_rgb_auto(&interleave_rgb(red, green, blue), self.width, self.height)
            }
            _ => Err(ReliefError::write_failed("unsupported PNG band layout")),
        }
    }
}

impl RasterSink for PngSink {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn write_row(&mut self, band: usize, row: usize, values: &[f32]) -> Result<()> {
        check_row(self.bands.len(), self.width, self.height, band, row, values)?;
        let start = row * self.width;
        self.bands[band][start..start + self.width].copy_from_slice(values);
        self.written[band][row] = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Err(ReliefError::write_failed("sink already finished"));
        }
        if let Some(band) = self.written.iter().position(|rows| rows.contains(&false)) {
            return Err(ReliefError::write_failed(format!(
                "band {} of {} is incomplete",
                band,
                self.path.display()
            )));
        }

        let png = self.encode()?;
        let world = world_file_contents(&self.georef);
        persist_bytes(&self.path, &png)?;
        persist_bytes(&world_file_path(&self.path), world.as_bytes())?;
        self.finished = true;

        debug!(
            path = %self.path.display(),
            bytes = png.len(),
            bands = self.bands.len(),
            "Wrote PNG"
        );
        Ok(())
    }
}

/// Write `bytes` to a temporary file beside `path`, then rename it into place.
pub(crate) fn persist_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path)
        .map_err(|e| ReliefError::write_failed(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

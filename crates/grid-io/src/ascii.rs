//! ESRI ASCII grids (`.asc`).
//!
//! ```text
//! ncols        4
//! nrows        3
//! xllcorner    1000.0
//! yllcorner    2000.0
//! cellsize     30.0
//! NODATA_value -9999
//! 1 2 3 4
//! ...
//! ```
//!
//! Header keys are case-insensitive. `xllcenter`/`yllcenter` may replace the
//! corner keys, and `dx`/`dy` may replace `cellsize` for non-square cells.

use relief_common::{
    check_row, Grid, GridSpec, PixelType, RasterSink, ReliefError, Result, DEFAULT_NO_DATA,
};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Parsed header of an ASCII grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiHeader {
    pub ncols: usize,
    pub nrows: usize,
    /// Lower-left corner of the lower-left cell
    pub xll: f64,
    pub yll: f64,
    pub dx: f64,
    pub dy: f64,
    pub no_data: f32,
}

impl AsciiHeader {
    /// Header describing a north-up grid.
    pub fn from_spec(spec: &GridSpec, no_data: f32) -> Self {
        Self {
            ncols: spec.width,
            nrows: spec.height,
            xll: spec.origin_x,
            yll: spec.origin_y + spec.height as f64 * spec.ns_res,
            dx: spec.ew_res.abs(),
            dy: spec.ns_res.abs(),
            no_data,
        }
    }

    /// Grid specification with rows running north to south.
    pub fn to_spec(&self) -> GridSpec {
        GridSpec::new(self.ncols, self.nrows, self.dx, -self.dy, self.no_data)
            .with_origin(self.xll, self.yll + self.nrows as f64 * self.dy)
    }

    fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "ncols        {}", self.ncols)?;
        writeln!(out, "nrows        {}", self.nrows)?;
        writeln!(out, "xllcorner    {}", self.xll)?;
        writeln!(out, "yllcorner    {}", self.yll)?;
        if self.dx == self.dy {
            writeln!(out, "cellsize     {}", self.dx)?;
        } else {
            writeln!(out, "dx           {}", self.dx)?;
            writeln!(out, "dy           {}", self.dy)?;
        }
        writeln!(out, "NODATA_value {}", self.no_data)
    }
}

#[derive(Default)]
struct HeaderFields {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xllcorner: Option<f64>,
    yllcorner: Option<f64>,
    xllcenter: Option<f64>,
    yllcenter: Option<f64>,
    cellsize: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    no_data: Option<f32>,
}

impl HeaderFields {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.to_ascii_lowercase().as_str() {
            "ncols" => self.ncols = Some(parse_header_value(key, value)?),
            "nrows" => self.nrows = Some(parse_header_value(key, value)?),
            "xllcorner" => self.xllcorner = Some(parse_header_value(key, value)?),
            "yllcorner" => self.yllcorner = Some(parse_header_value(key, value)?),
            "xllcenter" => self.xllcenter = Some(parse_header_value(key, value)?),
            "yllcenter" => self.yllcenter = Some(parse_header_value(key, value)?),
            "cellsize" => self.cellsize = Some(parse_header_value(key, value)?),
            "dx" => self.dx = Some(parse_header_value(key, value)?),
            "dy" => self.dy = Some(parse_header_value(key, value)?),
            "nodata_value" => self.no_data = Some(parse_header_value(key, value)?),
            _ => {
                return Err(ReliefError::InvalidHeader(format!(
                    "unknown header key '{}'",
                    key
                )))
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<AsciiHeader> {
        let missing = |name: &str| ReliefError::InvalidHeader(format!("missing {}", name));

        let ncols = self.ncols.ok_or_else(|| missing("ncols"))?;
        let nrows = self.nrows.ok_or_else(|| missing("nrows"))?;
        if ncols == 0 || nrows == 0 {
            return Err(ReliefError::InvalidHeader(format!(
                "grid must have at least one cell, got {}x{}",
                ncols, nrows
            )));
        }

        let (dx, dy) = match (self.cellsize, self.dx, self.dy) {
            (Some(size), _, _) => (size, size),
            (None, Some(dx), Some(dy)) => (dx, dy),
            _ => return Err(missing("cellsize (or dx and dy)")),
        };
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(ReliefError::InvalidHeader(format!(
                "cell size must be positive, got {} x {}",
                dx, dy
            )));
        }

        let xll = match (self.xllcorner, self.xllcenter) {
            (Some(x), _) => x,
            (None, Some(x)) => x - dx / 2.0,
            _ => return Err(missing("xllcorner or xllcenter")),
        };
        let yll = match (self.yllcorner, self.yllcenter) {
            (Some(y), _) => y,
            (None, Some(y)) => y - dy / 2.0,
            _ => return Err(missing("yllcorner or yllcenter")),
        };

        Ok(AsciiHeader {
            ncols,
            nrows,
            xll,
            yll,
            dx,
            dy,
            no_data: self.no_data.unwrap_or(DEFAULT_NO_DATA),
        })
    }
}

fn parse_header_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ReliefError::InvalidHeader(format!("failed to parse {}: '{}'", key, value))
    })
}

/// A body line starts with a number (including `nan` and `inf`); a header
/// line starts with a key.
fn is_data_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.parse::<f32>().is_ok())
}

/// Parse an ASCII grid document.
pub fn parse_ascii_grid(text: &str) -> Result<Grid> {
    let mut fields = HeaderFields::default();
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();

    while let Some(line) = lines.next_if(|l| !is_data_line(l)) {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ReliefError::InvalidHeader(format!(
                "expected 'key value', got '{}'",
                line
            )));
        };
        fields.set(key, value)?;
    }

    let header = fields.finish()?;
    let expected = header.ncols * header.nrows;
    let mut data = Vec::with_capacity(expected);

    for token in lines.flat_map(str::split_whitespace) {
        if data.len() == expected {
            return Err(ReliefError::InvalidData(format!(
                "more than {} values in body",
                expected
            )));
        }
        let value: f32 = token.parse().map_err(|_| {
            ReliefError::InvalidData(format!(
                "invalid value '{}' at cell {}",
                token,
                data.len()
            ))
        })?;
        data.push(value);
    }

    if data.len() != expected {
        return Err(ReliefError::InvalidData(format!(
            "expected {} values for a {}x{} grid, got {}",
            expected,
            header.ncols,
            header.nrows,
            data.len()
        )));
    }

    Grid::new(header.to_spec(), data)
}

/// Read an ASCII grid from a file.
pub fn read_ascii_grid(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let grid = parse_ascii_grid(&text)?;
    debug!(
        path = %path.display(),
        width = grid.spec().width,
        height = grid.spec().height,
        "Loaded ASCII grid"
    );
    Ok(grid)
}

/// Single-band ASCII grid sink.
///
/// Rows stream into a temporary file next to the destination and must
/// arrive in order. `finish` renames it into place.
pub struct AsciiGridSink {
    path: PathBuf,
    width: usize,
    height: usize,
    pixel_type: PixelType,
    next_row: usize,
    writer: Option<BufWriter<NamedTempFile>>,
}

impl AsciiGridSink {
    pub fn create(
        path: impl Into<PathBuf>,
        header: AsciiHeader,
        pixel_type: PixelType,
    ) -> Result<Self> {
        let path = path.into();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
        header.write_to(&mut writer)?;

        Ok(Self {
            path,
            width: header.ncols,
            height: header.nrows,
            pixel_type,
            next_row: 0,
            writer: Some(writer),
        })
    }

    fn writer(&mut self) -> Result<&mut BufWriter<NamedTempFile>> {
        self.writer
            .as_mut()
            .ok_or_else(|| ReliefError::write_failed("sink already finished"))
    }
}

impl RasterSink for AsciiGridSink {
    fn band_count(&self) -> usize {
        1
    }

    fn write_row(&mut self, band: usize, row: usize, values: &[f32]) -> Result<()> {
        check_row(1, self.width, self.height, band, row, values)?;
        if row != self.next_row {
            return Err(ReliefError::write_failed(format!(
                "ASCII rows must be written in order: got row {}, expected {}",
                row, self.next_row
            )));
        }

        let pixel_type = self.pixel_type;
        let writer = self.writer()?;
        let mut line = String::with_capacity(values.len() * 8);
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            match pixel_type {
                PixelType::Byte => line.push_str(&(*v as u8).to_string()),
                PixelType::Float32 => line.push_str(&v.to_string()),
            }
        }
        writeln!(writer, "{}", line)?;

        self.next_row += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.next_row != self.height {
            warn!(
                path = %self.path.display(),
                rows = self.next_row,
                expected = self.height,
                "Discarding incomplete ASCII grid"
            );
            self.writer = None;
            return Err(ReliefError::write_failed(format!(
                "only {} of {} rows written",
                self.next_row, self.height
            )));
        }

        let writer = self
            .writer
            .take()
            .ok_or_else(|| ReliefError::write_failed("sink already finished"))?;
        let temp = writer
            .into_inner()
            .map_err(|e| ReliefError::write_failed(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| ReliefError::write_failed(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "Wrote ASCII grid");
        Ok(())
    }
}

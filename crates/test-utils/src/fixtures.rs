//! Common test fixtures: color ramp tables and ASCII grid documents.

/// Color ramp tables in the `elevation red green blue` text format.
pub mod ramps {
    /// Green at sea level to white at 4000.
    pub const GREEN_TO_WHITE: &str = "0 0 255 0\n4000 255 255 255\n";

    /// Same table with the points out of order, blank lines and indentation.
    pub const GREEN_TO_WHITE_MESSY: &str = "\n   4000 255 255 255\n\n  0 0 255 0\n\n";

    /// A typical hypsometric table with a no-data entry mapped to black.
    pub const HYPSOMETRIC: &str = "\
-32767 0 0 0
0 46 154 88
500 251 255 128
1000 224 108 31
2000 200 55 55
3000 215 244 244
";

    /// Second field is not a number.
    pub const MALFORMED_VALUE: &str = "0 0 255 0\n100 red 0 0\n";

    /// Only three fields on the second line.
    pub const MISSING_FIELD: &str = "0 0 255 0\n100 255 0\n";
}

/// ESRI ASCII grid documents.
pub mod ascii_grids {
    /// 4x3 grid with a no-data cell in the middle row.
    pub const SMALL: &str = "\
ncols        4
nrows        3
xllcorner    1000.0
yllcorner    2000.0
cellsize     30.0
NODATA_value -9999
1 2 3 4
5 -9999 7 8
9 10 11 12
";

    /// Header without `nrows`.
    pub const MISSING_NROWS: &str = "\
ncols 2
xllcorner 0
yllcorner 0
cellsize 1
1 2
";

    /// Header announces more values than the body holds.
    pub const SHORT_BODY: &str = "\
ncols 3
nrows 2
xllcorner 0
yllcorner 0
cellsize 1
1 2 3
4 5
";
}

/// Default light source used by most hillshade tests.
pub mod light {
    pub const AZIMUTH: f64 = 315.0;
    pub const ALTITUDE: f64 = 45.0;
}

/// Writes `contents` to `name` inside `dir` and returns the full path.
pub fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_fixture_line_counts() {
        assert_eq!(ramps::GREEN_TO_WHITE.lines().count(), 2);
        assert_eq!(ramps::HYPSOMETRIC.lines().count(), 6);
    }

    #[test]
    fn test_write_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "ramp.txt", ramps::GREEN_TO_WHITE);
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            ramps::GREEN_TO_WHITE
        );
    }
}

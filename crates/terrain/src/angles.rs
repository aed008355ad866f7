//! Angle helpers and documented vertical:horizontal scale ratios.

/// Scale for elevations in feet over a geographic (degree) grid.
pub const SCALE_FEET_LATLONG: f64 = 370_400.0;

/// Scale for elevations in meters over a geographic (degree) grid.
pub const SCALE_METERS_LATLONG: f64 = 111_120.0;

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

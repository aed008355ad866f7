//! Synthetic elevation surfaces with known derivatives.
//!
//! All generators return row-major `Vec<f32>` (row 0 is the northern edge),
//! so they can be wrapped in any grid type.

/// Creates a flat surface of constant elevation.
pub fn create_flat_dem(width: usize, height: usize, elevation: f32) -> Vec<f32> {
    vec![elevation; width * height]
}

/// Creates a tilted plane.
///
/// Elevation at `(row, col)` is `base + east_step * col + south_step * row`,
/// where the steps are per cell. A positive `east_step` makes the surface
/// rise towards the east.
///
/// # Example
///
/// ```
/// use test_utils::create_plane_dem;
///
/// let dem = create_plane_dem(3, 2, 100.0, 5.0, 0.0);
/// assert_eq!(dem, vec![100.0, 105.0, 110.0, 100.0, 105.0, 110.0]);
/// ```
pub fn create_plane_dem(
    width: usize,
    height: usize,
    base: f32,
    east_step: f32,
    south_step: f32,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(base + east_step * col as f32 + south_step * row as f32);
        }
    }
    data
}

/// Creates a cone peaking at the grid center.
///
/// Elevation falls off linearly with distance (in cells) from the center,
/// `peak - slope * distance`, which gives aspects in every direction.
pub fn create_cone_dem(width: usize, height: usize, peak: f32, slope: f32) -> Vec<f32> {
    let center_x = (width as f32 - 1.0) / 2.0;
    let center_y = (height as f32 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(width * height);

    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - center_x;
            let dy = row as f32 - center_y;
            data.push(peak - slope * (dx * dx + dy * dy).sqrt());
        }
    }
    data
}

/// Creates rolling terrain from overlapping sine waves.
///
/// Elevations stay between roughly 500 and 1500.
pub fn create_rolling_dem(width: usize, height: usize) -> Vec<f32> {
    let mut data = vec![0.0f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width.max(1) as f32;
            let fy = y as f32 / height.max(1) as f32;

            let v1 = (fx * std::f32::consts::PI * 4.0).sin() * 200.0;
            let v2 = (fy * std::f32::consts::PI * 3.0).sin() * 200.0;
            let v3 = ((fx + fy) * std::f32::consts::PI * 2.0).sin() * 100.0;

            data[y * width + x] = 1000.0 + v1 + v2 + v3;
        }
    }
    data
}

/// Overwrites a rectangular patch with `no_data`.
pub fn with_no_data_patch(
    mut data: Vec<f32>,
    width: usize,
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
    no_data: f32,
) -> Vec<f32> {
    for row in rows {
        for col in cols.clone() {
            data[row * width + col] = no_data;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_dem() {
        let dem = create_flat_dem(4, 3, 12.5);
        assert_eq!(dem.len(), 12);
        assert!(dem.iter().all(|&v| v == 12.5));
    }

    #[test]
    fn test_plane_dem_steps() {
        let dem = create_plane_dem(4, 3, 0.0, 2.0, -1.0);
        assert_eq!(dem[0], 0.0);
        assert_eq!(dem[3], 6.0);
        assert_eq!(dem[4], -1.0);
        assert_eq!(dem[11], 4.0);
    }

    #[test]
    fn test_cone_dem_peak_at_center() {
        let dem = create_cone_dem(5, 5, 100.0, 10.0);
        let peak = dem[2 * 5 + 2];
        assert_eq!(peak, 100.0);
        assert!(dem.iter().all(|&v| v <= peak));
    }

    #[test]
    fn test_rolling_dem_range() {
        let dem = create_rolling_dem(64, 64);
        for &v in &dem {
            assert!((400.0..=1600.0).contains(&v), "value out of range: {}", v);
        }
    }

    #[test]
    fn test_no_data_patch() {
        let dem = with_no_data_patch(create_flat_dem(4, 4, 1.0), 4, 1..3, 2..3, -9999.0);
        assert_eq!(dem.iter().filter(|&&v| v == -9999.0).count(), 2);
        assert_eq!(dem[1 * 4 + 2], -9999.0);
        assert_eq!(dem[2 * 4 + 2], -9999.0);
    }
}

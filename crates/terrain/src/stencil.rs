//! Weighted central-difference stencil over a square window.
//!
//! For radius 1 this is Horn's (1981) 3x3 kernel:
//!
//! ```text
//!   NW  N  NE        1 . 1       1 2 1
//!   W   C  E    dx:  2 . 2   dy: . . .
//!   SW  S  SE        1 . 1       1 2 1
//! ```
//!
//! Larger radii accumulate every ring `k` (distance along the gradient axis)
//! and offset `m` (distance across it). Off-axis cells weigh
//! `sharpness^(2r-k-m)`, on-axis cells `sharpness^(2r-k)`. With the default
//! sharpness of 2 and radius 1 the weights are exactly Horn's 1 and 2.

use relief_common::{GridSpec, ReliefError, Result, Window};

/// Default sharpness exponent base.
pub const DEFAULT_SHARPNESS: f64 = 2.0;

/// Raw weighted differences of one window, before cell-size normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilSums {
    /// Weighted western samples minus weighted eastern samples
    pub west_minus_east: f64,
    /// Weighted southern samples minus weighted northern samples
    pub south_minus_north: f64,
    /// Sum of all weights applied to one axis
    pub weight: f64,
}

impl StencilSums {
    /// Normalize by cell size and vertical:horizontal scale.
    ///
    /// `dx` keeps the west-minus-east orientation and `dy` the
    /// south-minus-north orientation; `ns_res` is signed.
    pub fn gradient(&self, ew_res: f64, ns_res: f64, scale: f64) -> Gradient {
        Gradient {
            dx: self.west_minus_east / (self.weight * ew_res * scale),
            dy: self.south_minus_north / (self.weight * ns_res * scale),
        }
    }
}

/// Surface gradient normalized by cell size and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub dx: f64,
    pub dy: f64,
}

impl Gradient {
    /// `sqrt(dx² + dy²)`, the tangent of the slope angle.
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// A parameterized stencil with its weights precomputed.
#[derive(Debug, Clone)]
pub struct Stencil {
    radius: usize,
    z_factor: f64,
    /// `off_axis[(k-1) * radius + (m-1)]`
    off_axis: Vec<f64>,
    /// `on_axis[k-1]`
    on_axis: Vec<f64>,
    weight: f64,
}

impl Stencil {
    /// Build a stencil of the given radius.
    pub fn new(radius: usize, z_factor: f64, sharpness: f64) -> Result<Self> {
        if radius == 0 {
            return Err(ReliefError::invalid_parameter(
                "radius",
                "window radius must be at least 1",
            ));
        }
        if !sharpness.is_finite() || sharpness <= 0.0 {
            return Err(ReliefError::invalid_parameter(
                "sharpness",
                format!("must be positive and finite, got {}", sharpness),
            ));
        }
        if !z_factor.is_finite() {
            return Err(ReliefError::invalid_parameter(
                "z_factor",
                format!("must be finite, got {}", z_factor),
            ));
        }

        let r = radius as i32;
        let mut off_axis = Vec::with_capacity(radius * radius);
        let mut on_axis = Vec::with_capacity(radius);
        let mut weight = 0.0;

        for k in 1..=r {
            for m in 1..=r {
                let w = sharpness.powi(2 * r - k - m);
                off_axis.push(w);
                weight += 4.0 * w;
            }
            let w = sharpness.powi(2 * r - k);
            on_axis.push(w);
            weight += 2.0 * w;
        }

        // Weights grow as sharpness^(2r-1); past f64 range the sums turn to NaN
        if !weight.is_finite() {
            return Err(ReliefError::invalid_parameter(
                "sharpness",
                format!(
                    "weights overflow for sharpness {} at radius {}",
                    sharpness, radius
                ),
            ));
        }

        Ok(Self {
            radius,
            z_factor,
            off_axis,
            on_axis,
            weight,
        })
    }

    /// Horn's 3x3 kernel.
    pub fn horn(z_factor: f64) -> Self {
        Self {
            radius: 1,
            z_factor,
            off_axis: vec![1.0],
            on_axis: vec![2.0],
            weight: 8.0,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Total weight per axis (8 for Horn).
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Weighted differences of a loaded window.
    ///
    /// Returns `None` when any sample is no-data; no partial sums are produced.
    pub fn sums(&self, window: &Window, spec: &GridSpec) -> Option<StencilSums> {
        debug_assert_eq!(window.radius(), self.radius);
        if window.contains_no_data(spec) {
            return None;
        }

        let at = |dr: isize, dc: isize| -> f64 { window.at(dr, dc) as f64 };

        let mut west_minus_east = 0.0;
        let mut south_minus_north = 0.0;

        for k in 1..=self.radius {
            let ki = k as isize;
            for m in 1..=self.radius {
                let mi = m as isize;
                let w = self.off_axis[(k - 1) * self.radius + (m - 1)];

                west_minus_east +=
                    w * ((at(-mi, -ki) + at(mi, -ki)) - (at(-mi, ki) + at(mi, ki)));
                south_minus_north +=
                    w * ((at(ki, -mi) + at(ki, mi)) - (at(-ki, -mi) + at(-ki, mi)));
            }

            let w = self.on_axis[k - 1];
            west_minus_east += w * (at(0, -ki) - at(0, ki));
            south_minus_north += w * (at(ki, 0) - at(-ki, 0));
        }

        Some(StencilSums {
            west_minus_east: west_minus_east * self.z_factor,
            south_minus_north: south_minus_north * self.z_factor,
            weight: self.weight,
        })
    }

    /// Normalized gradient of a window, or `None` for no-data.
    pub fn gradient(&self, window: &Window, spec: &GridSpec, scale: f64) -> Option<Gradient> {
        self.sums(window, spec)
            .map(|sums| sums.gradient(spec.ew_res, spec.ns_res, scale))
    }
}

/// One-shot gradient of a window with explicit parameters.
pub fn compute_gradient(
    window: &Window,
    spec: &GridSpec,
    z_factor: f64,
    scale: f64,
    sharpness: f64,
) -> Result<Option<Gradient>> {
    let stencil = Stencil::new(window.radius(), z_factor, sharpness)?;
    Ok(stencil.gradient(window, spec, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GridSpec {
        GridSpec::new(10, 10, 10.0, -10.0, -9999.0)
    }

    fn window3(values: [f32; 9]) -> Window {
        Window::from_values(1, values.to_vec()).unwrap()
    }

    #[test]
    fn test_default_sharpness_radius_one_is_horn() {
        let generic = Stencil::new(1, 1.0, DEFAULT_SHARPNESS).unwrap();
        let horn = Stencil::horn(1.0);
        assert_eq!(generic.weight(), 8.0);

        let window = window3([3.0, 7.0, 2.0, 9.0, 4.0, 1.0, 8.0, 6.0, 5.0]);
        assert_eq!(generic.sums(&window, &spec()), horn.sums(&window, &spec()));
    }

    #[test]
    fn test_horn_sums_match_kernel() {
        // 0 1 2 / 3 4 5 / 6 7 8
        let w = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];
        let sums = Stencil::horn(1.0).sums(&window3(w), &spec()).unwrap();

        let expected_x = (w[0] + 2.0 * w[3] + w[6]) - (w[2] + 2.0 * w[5] + w[8]);
        let expected_y = (w[6] + 2.0 * w[7] + w[8]) - (w[0] + 2.0 * w[1] + w[2]);
        assert_eq!(sums.west_minus_east, expected_x as f64);
        assert_eq!(sums.south_minus_north, expected_y as f64);
    }

    #[test]
    fn test_no_data_gives_none() {
        let window = window3([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -9999.0, 1.0]);
        assert!(Stencil::horn(1.0).sums(&window, &spec()).is_none());
    }

    #[test]
    fn test_radius_two_weights() {
        // r=2, s=2: off-axis 2^(4-k-m) = 4,2,2,1 ; on-axis 2^(4-k) = 8,4
        let stencil = Stencil::new(2, 1.0, 2.0).unwrap();
        assert_eq!(stencil.weight(), 4.0 * (4.0 + 2.0 + 2.0 + 1.0) + 2.0 * (8.0 + 4.0));
    }

    #[test]
    fn test_radius_two_plane_gradient() {
        // Elevation rises 3 units per column eastwards.
        let mut values = Vec::new();
        for _row in 0..5 {
            for col in 0..5 {
                values.push(3.0 * col as f32);
            }
        }
        let window = Window::from_values(2, values).unwrap();
        let stencil = Stencil::new(2, 1.0, 2.0).unwrap();
        let sums = stencil.sums(&window, &spec()).unwrap();

        assert!(sums.west_minus_east < 0.0);
        assert_eq!(sums.south_minus_north, 0.0);
    }

    #[test]
    fn test_z_factor_scales_sums() {
        let w = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let one = Stencil::horn(1.0).sums(&window3(w), &spec()).unwrap();
        let three = Stencil::horn(3.0).sums(&window3(w), &spec()).unwrap();
        assert_eq!(three.west_minus_east, 3.0 * one.west_minus_east);
        assert_eq!(three.south_minus_north, 3.0 * one.south_minus_north);
    }

    #[test]
    fn test_gradient_normalization() {
        let sums = StencilSums {
            west_minus_east: 80.0,
            south_minus_north: -160.0,
            weight: 8.0,
        };
        let g = sums.gradient(10.0, -10.0, 2.0);
        assert_eq!(g.dx, 0.5);
        assert_eq!(g.dy, 1.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Stencil::new(0, 1.0, 2.0).is_err());
        assert!(Stencil::new(1, 1.0, 0.0).is_err());
        assert!(Stencil::new(1, f64::NAN, 2.0).is_err());
    }

    #[test]
    fn test_overflowing_weights_rejected() {
        assert!(matches!(
            Stencil::new(20, 1.0, 1e10),
            Err(ReliefError::InvalidParameter { .. })
        ));
        // Large but representable weights are fine.
        let stencil = Stencil::new(20, 1.0, 1e7).unwrap();
        assert!(stencil.weight().is_finite());
    }

    #[test]
    fn test_compute_gradient_flat() {
        let window = window3([5.0; 9]);
        let g = compute_gradient(&window, &spec(), 1.0, 1.0, 2.0)
            .unwrap()
            .unwrap();
        assert_eq!(g.magnitude(), 0.0);
    }
}

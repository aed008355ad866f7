//! Two aspect conventions that must stay separate.
//!
//! [`CompassAspect`] produces the published aspect product: a compass bearing
//! computed from the raw stencil sums with `dx` taken east-minus-west.
//! [`ShadingAspect`] feeds the illumination model: a radian angle from the
//! normalized gradient with `dx` taken west-minus-east.

use crate::angles::normalize_degrees;
use crate::stencil::{Gradient, StencilSums};

/// Written when the surface is flat in both axes.
pub const FLAT_ASPECT: f64 = -9999.0;

/// Compass bearing of steepest descent, 0 = north, clockwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompassAspect;

impl CompassAspect {
    /// Aspect in degrees in `[0, 360)`, or `None` on flat ground.
    pub fn bearing(&self, sums: &StencilSums) -> Option<f64> {
        let dx = -sums.west_minus_east / sums.weight;
        let dy = sums.south_minus_north / sums.weight;
        compass_bearing(dx, dy)
    }

    /// Like [`bearing`](Self::bearing) but with [`FLAT_ASPECT`] for flat ground.
    pub fn value(&self, sums: &StencilSums) -> f64 {
        self.bearing(sums).unwrap_or(FLAT_ASPECT)
    }
}

/// Bearing from an east-minus-west `dx` and a south-minus-north `dy`.
pub fn compass_bearing(dx: f64, dy: f64) -> Option<f64> {
    if dx == 0.0 {
        return if dy > 0.0 {
            Some(0.0)
        } else if dy < 0.0 {
            Some(180.0)
        } else {
            None
        };
    }

    let raw = dy.atan2(-dx).to_degrees();
    let aspect = if raw > 90.0 { 450.0 - raw } else { 90.0 - raw };
    Some(normalize_degrees(aspect))
}

/// Radian aspect used by the shading model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadingAspect;

impl ShadingAspect {
    /// `atan2(dx, dy)` of the west-minus-east gradient.
    pub fn radians(&self, gradient: &Gradient) -> f64 {
        gradient.dx.atan2(gradient.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(west_minus_east: f64, south_minus_north: f64) -> StencilSums {
        StencilSums {
            west_minus_east,
            south_minus_north,
            weight: 8.0,
        }
    }

    #[test]
    fn test_axis_tie_breaks() {
        assert_eq!(compass_bearing(0.0, 1.0), Some(0.0));
        assert_eq!(compass_bearing(0.0, -1.0), Some(180.0));
        assert_eq!(compass_bearing(0.0, 0.0), None);
    }

    #[test]
    fn test_east_rising_faces_west() {
        // Higher in the east: west minus east is negative.
        let aspect = CompassAspect.bearing(&sums(-8.0, 0.0)).unwrap();
        assert!((aspect - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_west_rising_faces_east() {
        let aspect = CompassAspect.bearing(&sums(8.0, 0.0)).unwrap();
        assert!((aspect - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_is_sentinel() {
        assert_eq!(CompassAspect.value(&sums(0.0, 0.0)), FLAT_ASPECT);
    }

    #[test]
    fn test_range_over_all_directions() {
        for step in 0..360 {
            let theta = (step as f64).to_radians();
            let aspect = compass_bearing(theta.cos(), theta.sin()).unwrap();
            assert!((0.0..360.0).contains(&aspect), "aspect {} out of range", aspect);
        }
    }

    #[test]
    fn test_shading_aspect_convention() {
        let g = Gradient { dx: 1.0, dy: 0.0 };
        assert!((ShadingAspect.radians(&g) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let g = Gradient { dx: 0.0, dy: 0.0 };
        assert_eq!(ShadingAspect.radians(&g), 0.0);
    }
}

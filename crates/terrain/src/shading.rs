//! Directional illumination of a sloped surface.

use crate::angles::normalize_degrees;
use relief_common::{ReliefError, Result};
use serde::{Deserialize, Serialize};

/// Output code for cells without a shade value.
pub const SHADE_NO_DATA: u8 = 0;

/// Shade of a fully self-shadowed cell; distinct from [`SHADE_NO_DATA`].
pub const SHADE_DARKEST: u8 = 1;

/// Light source position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    /// Compass direction of the light in degrees, 0 = north, clockwise
    #[serde(default = "default_azimuth")]
    pub azimuth: f64,
    /// Angle above the horizon in degrees
    #[serde(default = "default_altitude")]
    pub altitude: f64,
}

fn default_azimuth() -> f64 {
    315.0
}

fn default_altitude() -> f64 {
    45.0
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            azimuth: default_azimuth(),
            altitude: default_altitude(),
        }
    }
}

impl LightSource {
    /// Create a validated light source; the azimuth is wrapped into `[0, 360)`.
    pub fn new(azimuth: f64, altitude: f64) -> Result<Self> {
        let light = Self {
            azimuth: normalize_degrees(azimuth),
            altitude,
        };
        light.validate()?;
        Ok(light)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.azimuth.is_finite() {
            return Err(ReliefError::invalid_parameter(
                "azimuth",
                format!("must be finite, got {}", self.azimuth),
            ));
        }
        if !(0.0..=90.0).contains(&self.altitude) {
            return Err(ReliefError::invalid_parameter(
                "altitude",
                format!("must be within 0-90 degrees, got {}", self.altitude),
            ));
        }
        Ok(())
    }

    /// Shade for a cell with the given slope and shading aspect.
    pub fn shade(&self, slope_deg: f64, aspect_rad: f64) -> u8 {
        illuminate(slope_deg, aspect_rad, self.azimuth, self.altitude)
    }
}

/// Illumination intensity in `1..=255`.
///
/// The model works on the surface elevation angle `90 - slope`, so flat
/// ground under a 45° sun receives `sin(45°)` of full light.
pub fn illuminate(slope_deg: f64, aspect_rad: f64, azimuth_deg: f64, altitude_deg: f64) -> u8 {
    let elevation = (90.0 - slope_deg).to_radians();
    let alt = altitude_deg.to_radians();

    let cang = alt.sin() * elevation.sin()
        + alt.cos() * elevation.cos() * ((azimuth_deg - 90.0).to_radians() - aspect_rad).cos();

    if cang <= 0.0 {
        SHADE_DARKEST
    } else {
        // Nearest shade; `as` saturates, so noise above 1.0 still lands on 255
        (1.0 + 254.0 * cang).round() as u8
    }
}

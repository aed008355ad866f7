//! Configuration for the derivative sweeps.

use crate::shading::LightSource;
use crate::slope::SlopeUnits;
use crate::stencil::{Stencil, DEFAULT_SHARPNESS};
use relief_common::{ReliefError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters shared by the slope, aspect and hillshade sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivativeConfig {
    /// Window radius in cells (1 = 3x3).
    pub radius: usize,

    /// Vertical exaggeration applied to elevations.
    pub z_factor: f64,

    /// Ratio of vertical units to horizontal units.
    pub scale: f64,

    /// Base of the ring weighting for radii above 1.
    pub sharpness: f64,

    /// Units of the slope product.
    pub slope_units: SlopeUnits,

    /// Light source for hillshading.
    pub light: LightSource,

    /// Compute batches of rows on the rayon pool.
    pub parallel: bool,

    /// Rows per parallel batch; bounds the rows held in memory.
    pub batch_rows: usize,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            z_factor: 1.0,
            scale: 1.0,
            sharpness: DEFAULT_SHARPNESS,
            slope_units: SlopeUnits::Degrees,
            light: LightSource::default(),
            parallel: false,
            batch_rows: 64,
        }
    }
}

impl DerivativeConfig {
    /// Apply overrides from environment variables on top of `self`.
    pub fn with_env(mut self) -> Self {
        if let Ok(val) = std::env::var("RELIEF_RADIUS") {
            if let Ok(radius) = val.parse() {
                self.radius = radius;
            }
        }

        if let Ok(val) = std::env::var("RELIEF_Z_FACTOR") {
            if let Ok(z) = val.parse() {
                self.z_factor = z;
            }
        }

        if let Ok(val) = std::env::var("RELIEF_SCALE") {
            if let Ok(scale) = val.parse() {
                self.scale = scale;
            }
        }

        if let Ok(val) = std::env::var("RELIEF_SHARPNESS") {
            if let Ok(sharpness) = val.parse() {
                self.sharpness = sharpness;
            }
        }

        if let Ok(val) = std::env::var("RELIEF_SLOPE_UNITS") {
            self.slope_units = SlopeUnits::from_str(&val);
        }

        if let Ok(val) = std::env::var("RELIEF_PARALLEL") {
            self.parallel = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("RELIEF_BATCH_ROWS") {
            if let Ok(rows) = val.parse() {
                self.batch_rows = rows;
            }
        }

        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Parse configuration from a JSON string; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReliefError::NotFound(path.display().to_string())
            } else {
                ReliefError::Io(e)
            }
        })?;
        Self::from_json(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.radius == 0 {
            return Err(ReliefError::invalid_parameter("radius", "must be >= 1"));
        }

        if !self.z_factor.is_finite() || self.z_factor <= 0.0 {
            return Err(ReliefError::invalid_parameter(
                "z_factor",
                format!("must be positive, got {}", self.z_factor),
            ));
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ReliefError::invalid_parameter(
                "scale",
                format!("must be positive, got {}", self.scale),
            ));
        }

        if !self.sharpness.is_finite() || self.sharpness <= 0.0 {
            return Err(ReliefError::invalid_parameter(
                "sharpness",
                format!("must be positive, got {}", self.sharpness),
            ));
        }

        Stencil::new(self.radius, self.z_factor, self.sharpness)?;

        if self.batch_rows == 0 {
            return Err(ReliefError::invalid_parameter("batch_rows", "must be >= 1"));
        }

        self.light.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DerivativeConfig::default();
        assert_eq!(config.radius, 1);
        assert_eq!(config.sharpness, 2.0);
        assert_eq!(config.light.azimuth, 315.0);
        assert_eq!(config.light.altitude, 45.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overflowing_sharpness() {
        let config = DerivativeConfig {
            radius: 20,
            sharpness: 1e10,
            ..DerivativeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ReliefError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            DerivativeConfig::from_json(r#"{"radius": 2, "slope_units": "percent"}"#).unwrap();
        assert_eq!(config.radius, 2);
        assert_eq!(config.slope_units, SlopeUnits::Percent);
        assert_eq!(config.z_factor, 1.0);
    }

    #[test]
    fn test_from_json_light() {
        let config = DerivativeConfig::from_json(r#"{"light": {"azimuth": 90.0}}"#).unwrap();
        assert_eq!(config.light.azimuth, 90.0);
        assert_eq!(config.light.altitude, 45.0);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            DerivativeConfig::from_json("{radius: }"),
            Err(ReliefError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            DerivativeConfig::from_file("/nonexistent/relief.json"),
            Err(ReliefError::NotFound(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relief.json");
        std::fs::write(&path, r#"{"scale": 111120.0, "parallel": true}"#).unwrap();
        let config = DerivativeConfig::from_file(&path).unwrap();
        assert_eq!(config.scale, 111120.0);
        assert!(config.parallel);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = DerivativeConfig::default();
        config.radius = 0;
        assert!(config.validate().is_err());

        let mut config = DerivativeConfig::default();
        config.scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = DerivativeConfig::default();
        config.light.altitude = -5.0;
        assert!(config.validate().is_err());

        let mut config = DerivativeConfig::default();
        config.batch_rows = 0;
        assert!(config.validate().is_err());
    }
}

//! Slope magnitude from a normalized gradient.

use crate::stencil::Gradient;
use serde::{Deserialize, Serialize};

/// Units of the slope product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeUnits {
    /// Inclination angle, 0-90
    #[default]
    Degrees,
    /// Rise over run times 100
    Percent,
}

impl SlopeUnits {
    /// Parse from string (case-insensitive), defaulting to degrees.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "percent" | "pct" | "%" => Self::Percent,
            _ => Self::Degrees,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degrees => "degrees",
            Self::Percent => "percent",
        }
    }
}

/// `atan(sqrt(dx² + dy²))` in degrees.
pub fn slope_degrees(gradient: &Gradient) -> f64 {
    gradient.magnitude().atan().to_degrees()
}

/// `100 * sqrt(dx² + dy²)`.
pub fn slope_percent(gradient: &Gradient) -> f64 {
    100.0 * gradient.magnitude()
}

/// Slope in the requested units.
pub fn slope(gradient: &Gradient, units: SlopeUnits) -> f64 {
    match units {
        SlopeUnits::Degrees => slope_degrees(gradient),
        SlopeUnits::Percent => slope_percent(gradient),
    }
}

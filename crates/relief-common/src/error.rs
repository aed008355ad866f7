//! Error types for terrain-relief crates.

use thiserror::Error;

/// Result type alias using ReliefError.
pub type Result<T> = std::result::Result<T, ReliefError>;

/// Primary error type for grid access, ramp loading and output writing.
#[derive(Debug, Error)]
pub enum ReliefError {
    // === Input Errors ===
    #[error("input not found: {0}")]
    NotFound(String),

    #[error("unsupported raster format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid grid header: {0}")]
    InvalidHeader(String),

    #[error("invalid grid data: {0}")]
    InvalidData(String),

    #[error("color ramp line {line}: {message}")]
    RampParse { line: usize, message: String },

    #[error("color ramp is empty")]
    EmptyRamp,

    // === Access Errors ===
    #[error("window {requested} is outside grid bounds {grid}")]
    OutOfBounds { requested: String, grid: String },

    #[error("row {row} has {actual} values, expected {expected}")]
    RowLength {
        row: usize,
        actual: usize,
        expected: usize,
    },

    #[error("band {band} does not exist (sink has {bands} bands)")]
    InvalidBand { band: usize, bands: usize },

    // === Configuration Errors ===
    #[error("invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Output Errors ===
    #[error("failed to write output: {0}")]
    WriteFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReliefError {
    /// Create an OutOfBounds error.
    pub fn out_of_bounds(requested: impl Into<String>, grid: impl Into<String>) -> Self {
        Self::OutOfBounds {
            requested: requested.into(),
            grid: grid.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a RampParse error for a 1-based line number.
    pub fn ramp_parse(line: usize, message: impl Into<String>) -> Self {
        Self::RampParse {
            line,
            message: message.into(),
        }
    }

    /// Create a WriteFailed error.
    pub fn write_failed(msg: impl Into<String>) -> Self {
        Self::WriteFailed(msg.into())
    }

    /// Whether the error was caused by bad input rather than by the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ReliefError::NotFound(_)
                | ReliefError::UnsupportedFormat(_)
                | ReliefError::InvalidHeader(_)
                | ReliefError::InvalidData(_)
                | ReliefError::RampParse { .. }
                | ReliefError::EmptyRamp
                | ReliefError::InvalidParameter { .. }
        )
    }
}

impl From<serde_json::Error> for ReliefError {
    fn from(err: serde_json::Error) -> Self {
        ReliefError::InvalidParameter {
            param: "config".to_string(),
            message: format!("JSON error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_parse_message() {
        let err = ReliefError::ramp_parse(3, "expected 4 fields, found 2");
        assert_eq!(
            err.to_string(),
            "color ramp line 3: expected 4 fields, found 2"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_io_error_is_not_input_error() {
        let err: ReliefError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(!err.is_input_error());
    }
}

//! Error types for drishti-scan

use crate::calibration::{CalibrationError, InputShapeError};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// drishti-scan error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Calibration fit or evaluation failed
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    /// Mismatched input shapes
    #[error("Input shape error: {0}")]
    InputShape(#[from] InputShapeError),

    /// Rig did not answer within the deadline
    #[error("Communication timeout")]
    Timeout,

    /// Rig response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No scanner found on any serial port
    #[error("No scanner rig found (no known USB adapter connected)")]
    NoDeviceFound,

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

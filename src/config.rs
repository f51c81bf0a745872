//! Configuration for the scanner application.
//!
//! Loads from a TOML file; every table and field has a default matching the
//! reference rig, so a partial (or absent) file is fine.

use crate::calibration::CalibrationModel;
use crate::error::Result;
use crate::pipeline::{AngularOffsets, FilterMode, ProcessorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub hardware: HardwareConfig,
    pub processing: ProcessingConfig,
    pub calibration: CalibrationConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Serial hardware configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Serial port path; omit to auto-detect by USB adapter id
    pub port: Option<String>,
    /// Baud rate of the rig firmware
    pub baud_rate: u32,
    /// Deadline for a complete response line, in milliseconds. A full sweep
    /// takes the rig a while, so this is generous.
    pub read_timeout_ms: u64,
    /// Settle delay after opening the port, in milliseconds. The
    /// microcontroller resets on open and drops anything sent meanwhile.
    pub settle_delay_ms: u64,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 115_200,
            read_timeout_ms: 60_000,
            settle_delay_ms: 3_000,
        }
    }
}

/// Scan processing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Detection threshold on the raw reading (inclusive boundary)
    pub threshold: i32,
    /// Threshold convention; see [`FilterMode`]
    pub filter_mode: FilterMode,
    /// Pan zero-point correction in degrees (measured +8 on the reference rig)
    pub pan_offset_deg: f64,
    /// Tilt zero-point correction in degrees (measured +30 on the reference rig)
    pub tilt_offset_deg: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            filter_mode: FilterMode::SignalFloor,
            pan_offset_deg: 8.0,
            tilt_offset_deg: 30.0,
        }
    }
}

/// Startup calibration model coefficients
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Numerator coefficient of the response curve
    pub a: f64,
    /// Denominator offset of the response curve
    pub b: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            a: CalibrationModel::DEFAULT.a,
            b: CalibrationModel::DEFAULT.b,
        }
    }
}

/// Output paths for rendered SVGs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Point-cloud scatter output
    pub scan_path: String,
    /// Calibration-curve output
    pub curve_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scan_path: "scan.svg".to_string(),
            curve_path: "calibration-curve.svg".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Startup calibration model from the configured coefficients
    pub fn model(&self) -> CalibrationModel {
        CalibrationModel::new(self.calibration.a, self.calibration.b)
    }

    /// Processor configuration from the processing table
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            threshold: self.processing.threshold,
            mode: self.processing.filter_mode,
            offsets: AngularOffsets::new(
                self.processing.pan_offset_deg,
                self.processing.tilt_offset_deg,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.hardware.port, None);
        assert_eq!(config.hardware.baud_rate, 115_200);
        assert_eq!(config.processing.threshold, 50);
        assert_eq!(config.processing.filter_mode, FilterMode::SignalFloor);
        assert_eq!(config.processing.pan_offset_deg, 8.0);
        assert_eq!(config.processing.tilt_offset_deg, 30.0);
        assert_eq!(config.render.scan_path, "scan.svg");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_model_matches_factory_constants() {
        let config = AppConfig::default();
        assert_eq!(config.model(), CalibrationModel::DEFAULT);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[hardware]"));
        assert!(toml_string.contains("[processing]"));
        assert!(toml_string.contains("[calibration]"));
        assert!(toml_string.contains("filter_mode = \"signal-floor\""));

        let parsed: AppConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed.processing.threshold, config.processing.threshold);
        assert_eq!(parsed.calibration.a, config.calibration.a);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_content = r#"
[hardware]
port = "/dev/ttyUSB0"

[processing]
threshold = 120
filter_mode = "distance-ceiling"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.hardware.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.hardware.baud_rate, 115_200); // default kept
        assert_eq!(config.processing.threshold, 120);
        assert_eq!(config.processing.filter_mode, FilterMode::DistanceCeiling);
        assert_eq!(config.processing.pan_offset_deg, 8.0); // default kept
    }

    #[test]
    fn test_processor_config_carries_offsets() {
        let config = AppConfig::default();
        let pc = config.processor_config();
        assert_eq!(pc.offsets.pan_deg, 8.0);
        assert_eq!(pc.offsets.tilt_deg, 30.0);
    }
}

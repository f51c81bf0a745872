//! Raw-scan to point-cloud processing.
//!
//! Filters out no-detection samples, then maps each survivor through the
//! calibration model and the spherical projection. Pure and deterministic:
//! callers may shard a large batch across threads and concatenate the
//! per-shard clouds.

use super::geometry::{sample_to_spherical, AngularOffsets};
use crate::calibration::CalibrationModel;
use crate::core::math::to_cartesian;
use crate::core::types::{PointCloud, RawSample};
use crate::error::Result;

/// Which side of the threshold counts as a real detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Keep `reading >= threshold`. For inverse-analog front ends, where a
    /// stronger return means a closer object. The default.
    SignalFloor,

    /// Keep `reading <= threshold`. For sensor generations whose reading is
    /// itself a distance code.
    DistanceCeiling,
}

/// Configuration for scan processing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    /// Detection threshold on the raw reading. Boundary is inclusive in
    /// both modes.
    ///
    /// Default: 50
    pub threshold: i32,

    /// Active threshold convention.
    ///
    /// Default: [`FilterMode::SignalFloor`]
    pub mode: FilterMode,

    /// Mechanical zero-point correction applied to every sample.
    ///
    /// Default: zero
    pub offsets: AngularOffsets,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            mode: FilterMode::SignalFloor,
            offsets: AngularOffsets::ZERO,
        }
    }
}

/// Converts raw scans into calibrated point clouds.
#[derive(Debug, Clone)]
pub struct ScanProcessor {
    config: ProcessorConfig,
}

impl ScanProcessor {
    /// Create a new processor with the given configuration.
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Check whether a reading indicates a real detection.
    #[inline]
    pub fn detects(&self, reading: i32) -> bool {
        match self.config.mode {
            FilterMode::SignalFloor => reading >= self.config.threshold,
            FilterMode::DistanceCeiling => reading <= self.config.threshold,
        }
    }

    /// Convert a raw scan into a point cloud.
    ///
    /// Samples failing the detection test are dropped, not mapped to zero.
    /// Survivor order matches input order. An empty input, or an input with
    /// no survivors, yields an empty cloud rather than an error; a
    /// calibration evaluation error aborts the whole call and nothing is
    /// returned.
    pub fn process(
        &self,
        samples: &[RawSample],
        model: &CalibrationModel,
    ) -> Result<PointCloud> {
        let mut cloud = PointCloud::with_capacity(samples.len());

        for sample in samples.iter().filter(|s| self.detects(s.reading)) {
            let spherical = sample_to_spherical(*sample, model, self.config.offsets)?;
            cloud.push(to_cartesian(
                spherical.pan_rad,
                spherical.tilt_rad,
                spherical.distance_cm,
            ));
        }

        Ok(cloud)
    }
}

impl Default for ScanProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

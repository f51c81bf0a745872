//! Raw-sample to spherical conversion.
//!
//! Applies the pan/tilt zero-point correction, converts degrees to radians,
//! and evaluates the calibration model to turn the raw code into a distance.

use crate::calibration::CalibrationModel;
use crate::core::types::{RawSample, SphericalSample};
use crate::error::Result;

/// Mechanical zero-point correction for the pan/tilt stage.
///
/// `pan_deg` corrects the pan zero-point; `tilt_deg` corrects the tilt
/// zero-point and absorbs the from-horizontal vs zenith mounting convention
/// of the rig. Both are added to the raw angles before unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AngularOffsets {
    /// Correction added to the raw pan angle, in degrees
    pub pan_deg: f64,
    /// Correction added to the raw tilt angle, in degrees
    pub tilt_deg: f64,
}

impl AngularOffsets {
    /// No correction
    pub const ZERO: AngularOffsets = AngularOffsets {
        pan_deg: 0.0,
        tilt_deg: 0.0,
    };

    /// Create offsets from degree values
    pub fn new(pan_deg: f64, tilt_deg: f64) -> Self {
        Self { pan_deg, tilt_deg }
    }
}

impl Default for AngularOffsets {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Convert a raw sample to a calibrated spherical position.
///
/// The resulting tilt is a zenith angle (see [`crate::core::math`]).
/// Fails when the reading sits on the calibration curve's pole.
pub fn sample_to_spherical(
    sample: RawSample,
    model: &CalibrationModel,
    offsets: AngularOffsets,
) -> Result<SphericalSample> {
    let pan_rad = (f64::from(sample.pan_deg) + offsets.pan_deg).to_radians();
    let tilt_rad = (f64::from(sample.tilt_deg) + offsets.tilt_deg).to_radians();
    let distance_cm = model.evaluate(f64::from(sample.reading))?;

    Ok(SphericalSample {
        pan_rad,
        tilt_rad,
        distance_cm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn test_model() -> CalibrationModel {
        // distance = 6000 / (100 + reading); reading 500 -> 10cm
        CalibrationModel::new(6000.0, 100.0)
    }

    #[test]
    fn test_conversion_without_offsets() {
        let sample = RawSample::new(90, 45, 500);
        let s = sample_to_spherical(sample, &test_model(), AngularOffsets::ZERO).unwrap();

        assert_relative_eq!(s.pan_rad, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(s.tilt_rad, 45f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(s.distance_cm, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_offsets_applied_before_conversion() {
        let sample = RawSample::new(82, 60, 500);
        let offsets = AngularOffsets::new(8.0, 30.0);
        let s = sample_to_spherical(sample, &test_model(), offsets).unwrap();

        assert_relative_eq!(s.pan_rad, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(s.tilt_rad, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_offsets() {
        let sample = RawSample::new(10, 40, 500);
        let offsets = AngularOffsets::new(-10.0, -40.0);
        let s = sample_to_spherical(sample, &test_model(), offsets).unwrap();

        assert_relative_eq!(s.pan_rad, 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.tilt_rad, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pole_reading_propagates_error() {
        // reading -100 lands exactly on the model pole
        let sample = RawSample::new(0, 0, -100);
        let err = sample_to_spherical(sample, &test_model(), AngularOffsets::ZERO);
        assert!(err.is_err());
    }
}

//! Sensor response model: raw reading to physical distance.
//!
//! The analog front end responds roughly inverse-linearly to distance over
//! its usable range, so a two-parameter rational curve
//! `distance = a / (b + reading)` captures it without overfitting the sparse
//! calibration data (4-7 points in practice).

use crate::error::Result;

/// Minimum number of calibration points for a determinate fit.
pub const MIN_CALIBRATION_POINTS: usize = 2;

/// Readings within this margin of the response-curve pole are rejected
/// by [`CalibrationModel::evaluate`] instead of producing a blown-up
/// distance.
pub const EVAL_EPSILON: f64 = 1e-6;

/// Calibration failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// Not enough data to determine the curve
    #[error("need at least {MIN_CALIBRATION_POINTS} calibration points, got {0}")]
    TooFewPoints(usize),

    /// All readings share one value, the curve is underdetermined
    #[error("calibration readings are degenerate (fewer than 2 distinct values)")]
    DegenerateReadings,

    /// Distances must be strictly positive
    #[error("calibration distance {0} is not strictly positive")]
    NonPositiveDistance(f64),

    /// The optimizer ran out of iterations
    #[error("curve fit did not converge within {0} iterations")]
    NotConverged(u32),

    /// Evaluation would divide by a near-zero denominator
    #[error("reading {reading} is within {epsilon} of the response-curve pole")]
    NearSingular { reading: f64, epsilon: f64 },
}

/// Mismatched lengths between paired fit inputs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("readings/distances length mismatch: {readings} vs {distances}")]
pub struct InputShapeError {
    /// Number of readings supplied
    pub readings: usize,
    /// Number of distances supplied
    pub distances: usize,
}

/// Fitted response curve `distance = a / (b + reading)`.
///
/// Immutable once constructed; recalibration replaces the whole value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationModel {
    /// Numerator coefficient
    pub a: f64,
    /// Denominator offset
    pub b: f64,
}

impl CalibrationModel {
    /// Factory default, fitted offline against the reference bench data
    /// (readings [520, 389, 272, 206] at 15/30/45/60 cm). Lets the pipeline
    /// operate before any calibration has been performed.
    pub const DEFAULT: CalibrationModel = CalibrationModel {
        a: 9271.9442,
        b: -54.3015,
    };

    /// Create a model from raw coefficients
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Convert a raw sensor code to a distance in centimeters.
    ///
    /// Fails with [`CalibrationError::NearSingular`] when `b + reading` is
    /// within [`EVAL_EPSILON`] of zero; the curve has a pole there and any
    /// value it produced would be noise.
    pub fn evaluate(&self, reading: f64) -> Result<f64> {
        let denominator = self.b + reading;
        if denominator.abs() < EVAL_EPSILON {
            return Err(CalibrationError::NearSingular {
                reading,
                epsilon: EVAL_EPSILON,
            }
            .into());
        }
        Ok(self.a / denominator)
    }
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

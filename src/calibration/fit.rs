//! Least-squares fit of the sensor response curve.
//!
//! Minimizes the squared residual of `distance = a / (b + reading)` over
//! paired calibration samples with Levenberg-Marquardt: damped 2x2 normal
//! equations, accept/reject steps, relative-cost convergence test.
//!
//! The seed comes from the linearized form `1/d = x/a + b/a`, which is an
//! ordinary linear regression and lands close enough that refinement
//! typically converges in under ten iterations.

use super::model::{
    CalibrationError, CalibrationModel, InputShapeError, EVAL_EPSILON, MIN_CALIBRATION_POINTS,
};
use crate::error::Result;

/// Configuration for the curve fit.
#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    /// Maximum number of Levenberg-Marquardt iterations.
    pub max_iterations: u32,

    /// Convergence threshold for relative cost change on an accepted step.
    pub convergence_threshold: f64,

    /// Initial damping factor (lambda).
    pub initial_damping: f64,

    /// Damping ceiling; exceeding it means the fit is stuck.
    pub max_damping: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_threshold: 1e-12,
            initial_damping: 1e-3,
            max_damping: 1e10,
        }
    }
}

/// Fit the response curve with default settings.
///
/// Constraints: `readings` and `distances` must have equal non-zero length
/// (at least 2 pairs), at least two distinct reading values, and strictly
/// positive distances. Violations and non-convergence surface as
/// [`InputShapeError`] / [`CalibrationError`].
pub fn fit(readings: &[f64], distances: &[f64]) -> Result<CalibrationModel> {
    fit_with_config(readings, distances, &FitConfig::default())
}

/// Fit the response curve with explicit settings.
pub fn fit_with_config(
    readings: &[f64],
    distances: &[f64],
    config: &FitConfig,
) -> Result<CalibrationModel> {
    validate(readings, distances)?;

    let (mut a, mut b) = seed(readings, distances);
    let mut current_cost = cost(a, b, readings, distances);
    let mut lambda = config.initial_damping;
    let mut iterations = 0;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;

        // Build the damped 2x2 normal equations (J^T J + lambda diag) dx = -J^T r.
        // Damping is scaled to the diagonal, so the wildly different magnitudes
        // of a and b do not need separate treatment.
        let (h11, h12, h22, g1, g2) = build_normal_equations(a, b, readings, distances);
        let h11_damped = h11 * (1.0 + lambda);
        let h22_damped = h22 * (1.0 + lambda);

        let det = h11_damped * h22_damped - h12 * h12;
        if det.abs() < f64::MIN_POSITIVE {
            lambda *= 10.0;
            if lambda > config.max_damping {
                return Err(CalibrationError::NotConverged(iterations).into());
            }
            continue;
        }

        let da = -(h22_damped * g1 - h12 * g2) / det;
        let db = -(h11_damped * g2 - h12 * g1) / det;
        let (next_a, next_b) = (a + da, b + db);

        // A step that drags a denominator onto the pole is never acceptable,
        // whatever its cost says.
        if readings.iter().any(|&x| (next_b + x).abs() < EVAL_EPSILON) {
            lambda *= 10.0;
            if lambda > config.max_damping {
                return Err(CalibrationError::NotConverged(iterations).into());
            }
            continue;
        }

        let new_cost = cost(next_a, next_b, readings, distances);
        if new_cost <= current_cost {
            let relative_change = (current_cost - new_cost) / current_cost.max(1e-12);
            a = next_a;
            b = next_b;
            current_cost = new_cost;
            lambda = (lambda * 0.1).max(1e-12);

            if relative_change < config.convergence_threshold {
                log::debug!(
                    "calibration fit converged after {} iterations (cost {:.6e})",
                    iterations,
                    current_cost
                );
                return Ok(CalibrationModel::new(a, b));
            }
        } else {
            lambda *= 10.0;
            if lambda > config.max_damping {
                return Err(CalibrationError::NotConverged(iterations).into());
            }
        }
    }

    Err(CalibrationError::NotConverged(iterations).into())
}

fn validate(readings: &[f64], distances: &[f64]) -> Result<()> {
    if readings.len() != distances.len() {
        return Err(InputShapeError {
            readings: readings.len(),
            distances: distances.len(),
        }
        .into());
    }
    if readings.len() < MIN_CALIBRATION_POINTS {
        return Err(CalibrationError::TooFewPoints(readings.len()).into());
    }
    let first = readings[0];
    if readings.iter().all(|&x| x == first) {
        return Err(CalibrationError::DegenerateReadings.into());
    }
    if let Some(&d) = distances.iter().find(|&&d| d <= 0.0) {
        return Err(CalibrationError::NonPositiveDistance(d).into());
    }
    Ok(())
}

/// Seed (a, b) from the linearized regression `1/d = x/a + b/a`.
///
/// Falls back to a flat guess clear of every pole when the linearization is
/// unusable (near-zero slope, or a seed pole inside the reading range).
fn seed(readings: &[f64], distances: &[f64]) -> (f64, f64) {
    let n = readings.len() as f64;
    let sx: f64 = readings.iter().sum();
    let sy: f64 = distances.iter().map(|d| 1.0 / d).sum();
    let sxx: f64 = readings.iter().map(|x| x * x).sum();
    let sxy: f64 = readings
        .iter()
        .zip(distances)
        .map(|(x, d)| x / d)
        .sum();

    // det > 0 whenever the readings are not all identical
    let det = n * sxx - sx * sx;
    let slope = (n * sxy - sx * sy) / det;
    let intercept = (sy * sxx - sx * sxy) / det;

    if slope.abs() >= 1e-12 {
        let (a, b) = (1.0 / slope, intercept / slope);
        if readings.iter().all(|&x| (b + x).abs() >= EVAL_EPSILON) {
            return (a, b);
        }
    }

    fallback_seed(readings, distances)
}

fn fallback_seed(readings: &[f64], distances: &[f64]) -> (f64, f64) {
    let n = readings.len() as f64;
    let x_min = readings.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = readings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean_x = readings.iter().sum::<f64>() / n;
    let mean_d = distances.iter().sum::<f64>() / n;

    // Put the pole below the smallest reading by a full data span
    let b = 1.0 - x_min + (x_max - x_min);
    (mean_d * (b + mean_x), b)
}

fn cost(a: f64, b: f64, readings: &[f64], distances: &[f64]) -> f64 {
    readings
        .iter()
        .zip(distances)
        .map(|(&x, &d)| {
            let r = a / (b + x) - d;
            r * r
        })
        .sum()
}

#[allow(clippy::type_complexity)]
fn build_normal_equations(
    a: f64,
    b: f64,
    readings: &[f64],
    distances: &[f64],
) -> (f64, f64, f64, f64, f64) {
    let (mut h11, mut h12, mut h22, mut g1, mut g2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&x, &d) in readings.iter().zip(distances) {
        let den = b + x;
        let residual = a / den - d;
        let j1 = 1.0 / den;
        let j2 = -a / (den * den);
        h11 += j1 * j1;
        h12 += j1 * j2;
        h22 += j2 * j2;
        g1 += j1 * residual;
        g2 += j2 * residual;
    }
    (h11, h12, h22, g1, g2)
}

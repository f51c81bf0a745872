//! Geometric primitives for point reconstruction.
//!
//! The rig reports spherical positions: a pan angle around the vertical axis
//! and a tilt angle measured from the vertical axis itself (zenith
//! convention, 0 = straight up). Callers using a from-horizontal tilt must
//! convert to zenith angle before projecting.

use crate::core::types::Point3D;

/// Project a spherical position onto Cartesian axes.
///
/// ```text
/// x = d * sin(tilt) * cos(pan)
/// y = d * sin(tilt) * sin(pan)
/// z = d * cos(tilt)
/// ```
///
/// `tilt_rad` is a zenith angle. The output unit matches the unit of
/// `distance`, so `to_cartesian(..).norm() == distance` up to rounding.
///
/// # Example
/// ```
/// use drishti_scan::core::math::to_cartesian;
/// use std::f64::consts::FRAC_PI_2;
///
/// // Straight up
/// let p = to_cartesian(0.0, 0.0, 10.0);
/// assert!((p.z - 10.0).abs() < 1e-9);
///
/// // Horizontal, along the pan-zero axis
/// let p = to_cartesian(0.0, FRAC_PI_2, 10.0);
/// assert!((p.x - 10.0).abs() < 1e-9);
/// assert!(p.z.abs() < 1e-9);
/// ```
#[inline]
pub fn to_cartesian(pan_rad: f64, tilt_rad: f64, distance: f64) -> Point3D {
    let (sin_tilt, cos_tilt) = tilt_rad.sin_cos();
    let (sin_pan, cos_pan) = pan_rad.sin_cos();

    Point3D::new(
        distance * sin_tilt * cos_pan,
        distance * sin_tilt * sin_pan,
        distance * cos_tilt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_norm_preserved() {
        for &pan in &[0.0, 0.3, FRAC_PI_2, PI, 4.2] {
            for &tilt in &[0.0, FRAC_PI_4, FRAC_PI_2, 2.0] {
                let p = to_cartesian(pan, tilt, 25.0);
                assert_relative_eq!(p.norm(), 25.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_zenith_pole_up() {
        // tilt 0 points straight up regardless of pan
        for &pan in &[0.0, 1.0, FRAC_PI_2, PI] {
            let p = to_cartesian(pan, 0.0, 8.0);
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
            assert_relative_eq!(p.z, 8.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zenith_pole_down() {
        for &pan in &[0.0, 2.0, PI] {
            let p = to_cartesian(pan, PI, 8.0);
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
            assert_relative_eq!(p.z, -8.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_horizontal_plane() {
        // tilt of 90 degrees lies in the x/y plane
        let p = to_cartesian(FRAC_PI_2, FRAC_PI_2, 5.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_distance() {
        let p = to_cartesian(1.2, 0.7, 0.0);
        assert_eq!(p, Point3D::new(0.0, 0.0, 0.0));
    }
}

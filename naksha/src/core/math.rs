//! Angle helpers and numeric tolerances.
//!
//! All angles are in radians, counter-clockwise positive.

use std::f64::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f64 = 2.0 * PI;

/// Squared-length / determinant threshold below which a quantity is
/// treated as zero by the geometry routines.
pub const GEOM_EPSILON: f64 = 1e-16;

/// Normalize angle to [-π, π).
///
/// # Example
/// ```
/// use naksha::core::math::normalize_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-12);
/// assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TWO_PI;
    if a >= PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in [-π, π).
#[inline]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(0.3), 0.3);
    }

    #[test]
    fn test_angle_diff_crosses_pi() {
        let d = angle_diff(-0.9 * PI, 0.9 * PI);
        assert_relative_eq!(d, -0.2 * PI, epsilon = 1e-12);
    }
}

//! 2D pose type and frame composition.
//!
//! A pose `(x, y, θ)` doubles as a rigid frame: `pose_compose` maps
//! coordinates expressed in the frame into the frame's parent, and
//! `pose_decompose` maps them back.

use serde::{Deserialize, Serialize};

use super::math::normalize_angle;
use super::point::Point2D;

/// A 2D pose: position in meters, heading in radians (CCW from +X).
///
/// Headings are stored as given; composition adds them without wrapping
/// so that solvers see a continuous parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f64,
    /// Y position in meters.
    pub y: f64,
    /// Heading angle in radians.
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose.
    #[inline]
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Create an identity pose (origin, facing +X).
    #[inline]
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Get the position as a Point2D.
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Copy of this pose with the heading wrapped to [-π, π).
    #[inline]
    pub fn normalized(self) -> Self {
        Self::new(self.x, self.y, normalize_angle(self.theta))
    }

    /// Transform a point from this pose's local frame to the parent frame.
    ///
    /// # Example
    /// ```
    /// use naksha::core::{Point2D, Pose2D};
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let pose = Pose2D::new(1.0, 0.0, FRAC_PI_2);
    /// let world = pose.transform_point(Point2D::new(1.0, 0.0));
    /// assert!((world.x - 1.0).abs() < 1e-12);
    /// assert!((world.y - 1.0).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn transform_point(self, point: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        Point2D {
            x: self.x + point.x * cos - point.y * sin,
            y: self.y + point.x * sin + point.y * cos,
        }
    }

    /// Transform a point from the parent frame into this pose's local frame.
    #[inline]
    pub fn inverse_transform_point(self, point: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        Point2D {
            x: dx * cos + dy * sin,
            y: -dx * sin + dy * cos,
        }
    }

    /// Apply `local` in this pose's frame.
    #[inline]
    pub fn compose(self, local: Pose2D) -> Self {
        let pos = self.transform_point(local.position());
        Self::new(pos.x, pos.y, self.theta + local.theta)
    }

    /// Inverse transform: `pose.compose(pose.inverse())` is the identity.
    #[inline]
    pub fn inverse(self) -> Self {
        let (sin, cos) = self.theta.sin_cos();
        Self::new(
            -self.x * cos - self.y * sin,
            self.x * sin - self.y * cos,
            -self.theta,
        )
    }
}

/// Express `local` (given in `frame` coordinates) in the frame's parent.
///
/// `x' = fx + lx·cosθ − ly·sinθ`, `y' = fy + lx·sinθ + ly·cosθ`, `θ' = fθ + lθ`.
#[inline]
pub fn pose_compose(local: Pose2D, frame: Pose2D) -> Pose2D {
    frame.compose(local)
}

/// Exact inverse of [`pose_compose`]: express `global` in `frame` coordinates.
#[inline]
pub fn pose_decompose(global: Pose2D, frame: Pose2D) -> Pose2D {
    let local = frame.inverse_transform_point(global.position());
    Pose2D::new(local.x, local.y, global.theta - frame.theta)
}

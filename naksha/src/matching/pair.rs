//! Correspondence pairs between two frames.

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D};
use crate::geometry::Line2D;

/// Which primitive each side of a pair carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    /// Point in A to point in B.
    PointPoint,
    /// Point in A to segment in B.
    PointLine,
    /// Segment in A to point in B.
    LinePoint,
}

/// Pair geometry, each side in the local frame of its owner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PairGeometry {
    /// Two points that should coincide.
    PointPoint { a: Point2D, b: Point2D },
    /// A point that should lie on a segment.
    PointLine { a: Point2D, b: Line2D },
    /// A segment that a point should lie on.
    LinePoint { a: Line2D, b: Point2D },
}

/// Distance between the two sides once placed in the parent frame, with
/// the global-frame points it was measured between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairResidual {
    /// Global point on side A.
    pub p: Point2D,
    /// Global point on side B.
    pub q: Point2D,
    /// `|q - p|`.
    pub distance: f64,
}

impl PairGeometry {
    /// Kind tag of this geometry.
    pub fn kind(&self) -> PairKind {
        match self {
            PairGeometry::PointPoint { .. } => PairKind::PointPoint,
            PairGeometry::PointLine { .. } => PairKind::PointLine,
            PairGeometry::LinePoint { .. } => PairKind::LinePoint,
        }
    }

    /// Re-place both sides with `pose_a`/`pose_b` and measure them.
    ///
    /// Segment sides contribute their nearest point to the other side.
    pub fn residual(&self, pose_a: Pose2D, pose_b: Pose2D) -> PairResidual {
        let (p, q) = match *self {
            PairGeometry::PointPoint { a, b } => {
                (pose_a.transform_point(a), pose_b.transform_point(b))
            }
            PairGeometry::PointLine { a, b } => {
                let p = pose_a.transform_point(a);
                (p, b.transformed(pose_b).project(p).point)
            }
            PairGeometry::LinePoint { a, b } => {
                let q = pose_b.transform_point(b);
                (a.transformed(pose_a).project(q).point, q)
            }
        };
        PairResidual {
            p,
            q,
            distance: p.distance(q),
        }
    }
}

/// A weighted correspondence produced by [`ScanMatch`](super::ScanMatch).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrespondencePair {
    /// Geometry in each group's local frame.
    pub geometry: PairGeometry,
    /// Strictly positive weight (the hit's accumulated evidence).
    pub weight: f64,
    /// Index of the originating hit in its group's hit list.
    pub hit_index: usize,
}

impl CorrespondencePair {
    /// Kind tag of the geometry.
    #[inline]
    pub fn kind(&self) -> PairKind {
        self.geometry.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_point_residual() {
        let g = PairGeometry::PointPoint {
            a: Point2D::new(1.0, 0.0),
            b: Point2D::new(0.0, 0.0),
        };
        let r = g.residual(Pose2D::identity(), Pose2D::new(1.0, 2.0, 0.3));
        assert_relative_eq!(r.distance, 2.0, epsilon = 1e-12);
        assert_eq!(g.kind(), PairKind::PointPoint);
    }

    #[test]
    fn test_point_line_residual_uses_b_pose() {
        let g = PairGeometry::PointLine {
            a: Point2D::new(0.0, 1.0),
            b: Line2D::new(Point2D::new(-1.0, 0.0), Point2D::new(1.0, 0.0)),
        };
        // Rotating B by 90° turns its segment vertical through the origin.
        let r = g.residual(Pose2D::identity(), Pose2D::new(0.5, 0.0, FRAC_PI_2));
        assert_relative_eq!(r.q.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(r.q.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.distance, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_line_point_residual() {
        let g = PairGeometry::LinePoint {
            a: Line2D::new(Point2D::new(0.0, 0.0), Point2D::new(2.0, 0.0)),
            b: Point2D::new(0.0, 0.0),
        };
        let r = g.residual(Pose2D::identity(), Pose2D::new(3.0, 1.0, 0.0));
        assert_relative_eq!(r.p.x, 2.0);
        assert_relative_eq!(r.distance, 2.0_f64.sqrt(), epsilon = 1e-12);
    }
}

//! Core types: points, poses, angle math and dense matrix helpers.
//!
//! - [`Point2D`] and [`Pose2D`]: planar coordinates and rigid frames
//! - [`pose_compose`] / [`pose_decompose`]: frame changes
//! - [`matrix_inverse`] / [`symmetric_eigendecompose`]: for covariance consumers

pub mod math;
mod matrix;
mod point;
mod pose;

pub use math::{GEOM_EPSILON, angle_diff, normalize_angle};
pub use matrix::{
    MIN_LOG_DETERMINANT, MatrixInverse, SymmetricDecomposition, matrix_inverse,
    symmetric_eigendecompose,
};
pub use point::Point2D;
pub use pose::{Pose2D, pose_compose, pose_decompose};

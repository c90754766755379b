//! Per-link cost and its analytic gradient.
//!
//! A link places its two primitives with the node poses and measures the
//! distance `s` between them. Segment sides contribute their nearest point,
//! which is held fixed in the owner's frame while differentiating: moving
//! along a segment does not change the distance to first order.

use crate::core::{GEOM_EPSILON, Point2D, Pose2D};

use super::graph::RelaxLink;

/// Shape of the per-link cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostForm {
    /// `u = w·s`, used as a least-squares residual.
    Linear,
    /// `u = ½·w·s²`, minimised directly.
    Squared,
}

/// Cost and gradient of one link at a given pair of poses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkEval {
    /// Unsaturated distance between the placed primitives.
    pub distance: f64,
    /// Link cost `u`, saturated at the outlier distance.
    pub cost: f64,
    /// `∂u/∂(x, y, θ)` of node A.
    pub grad_a: [f64; 3],
    /// `∂u/∂(x, y, θ)` of node B.
    pub grad_b: [f64; 3],
}

/// Evaluate `link` with its nodes at `pose_a` and `pose_b`.
pub fn evaluate_link(link: &RelaxLink, pose_a: Pose2D, pose_b: Pose2D, form: CostForm) -> LinkEval {
    let residual = link.geometry.residual(pose_a, pose_b);
    let s = residual.distance;
    let w = link.weight;
    let saturated = s >= link.outlier_distance;
    let clamped = s.min(link.outlier_distance);

    let (cost, du_ds) = match form {
        CostForm::Linear => (w * clamped, w),
        CostForm::Squared => (0.5 * w * clamped * clamped, w * s),
    };

    if saturated || s <= GEOM_EPSILON {
        return LinkEval {
            distance: s,
            cost,
            grad_a: [0.0; 3],
            grad_b: [0.0; 3],
        };
    }

    // ds/dq = (q - p)/s, ds/dp = -(q - p)/s
    let dir = (residual.q - residual.p) * (1.0 / s);
    let local_p = pose_a.inverse_transform_point(residual.p);
    let local_q = pose_b.inverse_transform_point(residual.q);

    let grad_b = pose_gradient(pose_b, local_q, dir * du_ds);
    let grad_a = pose_gradient(pose_a, local_p, dir * -du_ds);

    LinkEval {
        distance: s,
        cost,
        grad_a,
        grad_b,
    }
}

/// Chain `∂u/∂point` through `point = pose ∘ local`.
fn pose_gradient(pose: Pose2D, local: Point2D, du_dpoint: Point2D) -> [f64; 3] {
    let (sin, cos) = pose.theta.sin_cos();
    let dpoint_dtheta = Point2D::new(
        -local.x * sin - local.y * cos,
        local.x * cos - local.y * sin,
    );
    [du_dpoint.x, du_dpoint.y, du_dpoint.dot(dpoint_dtheta)]
}

//! Weighted obstacle hypotheses and their clustering rule.

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D};

/// A clustered obstacle hit.
///
/// Weight counts supporting returns and may go negative once free-space
/// evidence outweighs them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Hit location.
    pub point: Point2D,
    /// Accumulated evidence.
    pub weight: f64,
}

impl Hit {
    /// Create a new hit.
    #[inline]
    pub const fn new(point: Point2D, weight: f64) -> Self {
        Self { point, weight }
    }

    /// Copy of this hit mapped from `frame` into its parent.
    #[inline]
    pub fn transformed(&self, frame: Pose2D) -> Self {
        Self::new(frame.transform_point(self.point), self.weight)
    }
}

/// Merge a return into `hits`.
///
/// The first existing hit closer than `hit_dist` absorbs `weight`;
/// otherwise a new hit is appended. Returns the index that took it.
pub fn merge_hit(hits: &mut Vec<Hit>, point: Point2D, weight: f64, hit_dist: f64) -> usize {
    let hit_dist_sq = hit_dist * hit_dist;
    if let Some(i) = hits
        .iter()
        .position(|h| h.point.distance_squared(point) < hit_dist_sq)
    {
        hits[i].weight += weight;
        return i;
    }
    hits.push(Hit::new(point, weight));
    hits.len() - 1
}

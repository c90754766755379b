//! Correspondence search between two scan groups.

use serde::{Deserialize, Serialize};

use crate::core::Pose2D;
use crate::geometry::Line2D;
use crate::scan::Hit;
use crate::solid::{PolygonClipper, ScanGroup, ScanSolid};

use super::pair::{CorrespondencePair, PairGeometry};

/// Configuration for [`ScanMatch`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Hits farther than this from the other group's free-space boundary
    /// produce no pair (meters).
    #[serde(default = "default_outlier_distance")]
    pub outlier_distance: f64,
}

fn default_outlier_distance() -> f64 {
    0.40
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            outlier_distance: default_outlier_distance(),
        }
    }
}

impl MatchConfig {
    /// Builder-style setter for the outlier cutoff.
    pub fn with_outlier_distance(mut self, distance: f64) -> Self {
        self.outlier_distance = distance;
        self
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.outlier_distance > 0.0 && self.outlier_distance.is_finite() {
            Ok(())
        } else {
            Err(format!(
                "matching.outlier_distance must be positive and finite, got {}",
                self.outlier_distance
            ))
        }
    }
}

/// Pairs the hits of each group with the free-space boundary of the other.
///
/// Holds shared borrows, so neither group can change while matching.
pub struct ScanMatch<'a, C: PolygonClipper> {
    group_a: &'a ScanGroup<C>,
    group_b: &'a ScanGroup<C>,
    config: MatchConfig,
}

impl<'a, C: PolygonClipper> ScanMatch<'a, C> {
    /// Create a matcher over two groups.
    pub fn new(group_a: &'a ScanGroup<C>, group_b: &'a ScanGroup<C>, config: MatchConfig) -> Self {
        Self {
            group_a,
            group_b,
            config,
        }
    }

    /// Matching parameters.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Generate pairs with A placed at `pose_a` and B at `pose_b`.
    ///
    /// A hits inside B's free space become `PointLine` pairs against B's
    /// nearest edge; B hits inside A's free space become `LinePoint`
    /// pairs. Hits with non-positive weight, outside the other solid, or
    /// farther than `outlier_distance` from its boundary are dropped.
    pub fn pairs(&self, pose_a: Pose2D, pose_b: Pose2D) -> Vec<CorrespondencePair> {
        // Maps A-local coordinates into B-local coordinates and back.
        let a_in_b = pose_b.inverse().compose(pose_a);
        let b_in_a = a_in_b.inverse();

        let mut pairs = Vec::new();
        for (hit_index, hit, edge) in
            self.boundary_hits(self.group_a.hits(), a_in_b, self.group_b.solid())
        {
            pairs.push(CorrespondencePair {
                geometry: PairGeometry::PointLine { a: hit.point, b: edge },
                weight: hit.weight,
                hit_index,
            });
        }
        for (hit_index, hit, edge) in
            self.boundary_hits(self.group_b.hits(), b_in_a, self.group_a.solid())
        {
            pairs.push(CorrespondencePair {
                geometry: PairGeometry::LinePoint { a: edge, b: hit.point },
                weight: hit.weight,
                hit_index,
            });
        }

        log::debug!(
            "ScanMatch: {} pairs from {} + {} hits",
            pairs.len(),
            self.group_a.hits().len(),
            self.group_b.hits().len()
        );
        pairs
    }

    /// Hits that land inside `solid` within the outlier distance of its
    /// boundary, with the nearest edge (in the solid's frame).
    fn boundary_hits(
        &self,
        hits: &[Hit],
        hits_to_solid: Pose2D,
        solid: &ScanSolid<C>,
    ) -> Vec<(usize, Hit, Line2D)> {
        let outlier = self.config.outlier_distance;
        hits.iter()
            .enumerate()
            .filter(|(_, hit)| hit.weight > 0.0)
            .filter_map(|(i, hit)| {
                let p = hits_to_solid.transform_point(hit.point);
                if !solid.contains(p) {
                    return None;
                }
                let nearest = solid.nearest(p)?;
                (nearest.distance <= outlier).then_some((i, *hit, nearest.edge))
            })
            .collect()
    }
}

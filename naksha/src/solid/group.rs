//! A group of scans fused into one frame.

use serde::{Deserialize, Serialize};

use crate::core::Pose2D;
use crate::scan::{Hit, Scan, merge_hit};

use super::clipper::{GeoClipper, PolygonClipper};
use super::solid::ScanSolid;

/// Configuration for [`ScanGroup`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Clustering radius for merging scan hits (meters).
    #[serde(default = "default_hit_dist")]
    pub hit_dist: f64,
}

fn default_hit_dist() -> f64 {
    0.15
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            hit_dist: default_hit_dist(),
        }
    }
}

impl GroupConfig {
    /// Builder-style setter for the clustering radius.
    pub fn with_hit_dist(mut self, hit_dist: f64) -> Self {
        self.hit_dist = hit_dist;
        self
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.hit_dist > 0.0 {
            Ok(())
        } else {
            Err(format!("group.hit_dist must be positive, got {}", self.hit_dist))
        }
    }
}

/// Free space and hits from several scans, in the group frame.
#[derive(Clone, Debug, Default)]
pub struct ScanGroup<C: PolygonClipper = GeoClipper> {
    config: GroupConfig,
    solid: ScanSolid<C>,
    hits: Vec<Hit>,
}

impl ScanGroup<GeoClipper> {
    /// Empty group using the `geo` union backend.
    pub fn new(config: GroupConfig) -> Self {
        Self::with_clipper(config, GeoClipper)
    }

    /// Empty group with default parameters.
    pub fn with_defaults() -> Self {
        Self::new(GroupConfig::default())
    }
}

impl<C: PolygonClipper> ScanGroup<C> {
    /// Empty group using a custom union backend.
    pub fn with_clipper(config: GroupConfig, clipper: C) -> Self {
        Self {
            config,
            solid: ScanSolid::with_clipper(clipper),
            hits: Vec::new(),
        }
    }

    /// Accumulated free space.
    pub fn solid(&self) -> &ScanSolid<C> {
        &self.solid
    }

    /// Accumulated hits.
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Fuse `scan`, whose contents are expressed in `pose` coordinates.
    ///
    /// Hits carry their scan weight into the group clusters.
    pub fn add(&mut self, pose: Pose2D, scan: &Scan) {
        if scan.free().is_closed() {
            self.solid.union(pose, scan.free());
        } else {
            log::debug!(
                "ScanGroup: skipping free space with {} vertices",
                scan.free().len()
            );
        }

        for hit in scan.hits() {
            let global = hit.transformed(pose);
            merge_hit(&mut self.hits, global.point, global.weight, self.config.hit_dist);
        }
    }

    /// Discard all free space and hits.
    pub fn reset(&mut self) {
        self.solid.reset();
        self.hits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;
    use std::f64::consts::{PI, TAU};

    fn room_scan(range: f64) -> Scan {
        let samples: Vec<(f64, f64)> = (0..90)
            .map(|i| (range, -PI + TAU * i as f64 / 90.0))
            .collect();
        let mut scan = Scan::with_defaults();
        scan.add_ranges(Pose2D::identity(), &samples)
            .expect("valid scan");
        scan
    }

    #[test]
    fn test_add_unions_and_merges() {
        let scan = room_scan(2.0);
        let mut group = ScanGroup::with_defaults();
        group.add(Pose2D::identity(), &scan);
        let hits_once = group.hits().len();
        assert!(group.solid().contains(Point2D::ZERO));

        // Same scan again at the same pose: no new clusters, weights double.
        group.add(Pose2D::identity(), &scan);
        assert_eq!(group.hits().len(), hits_once);
        assert!(group.hits().iter().all(|h| h.weight >= 2.0 - 1e-9));
    }

    #[test]
    fn test_add_transforms_by_pose() {
        let scan = room_scan(1.0);
        let mut group = ScanGroup::with_defaults();
        group.add(Pose2D::new(10.0, 0.0, 0.0), &scan);
        assert!(group.solid().contains(Point2D::new(10.0, 0.0)));
        assert!(!group.solid().contains(Point2D::ZERO));
        assert!(group.hits().iter().all(|h| h.point.x > 8.9));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut group = ScanGroup::with_defaults();
        group.add(Pose2D::identity(), &room_scan(2.0));
        group.reset();
        assert!(group.solid().is_empty());
        assert!(group.hits().is_empty());
        group.reset();
        assert!(group.solid().is_empty());
    }
}

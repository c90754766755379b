//! A single range scan and its derived free space and hits.

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D};
use crate::geometry::{Contour, Line2D};

use super::config::ScanConfig;
use super::error::ScanError;
use super::free_space::{FreeSpaceParams, approximate_free_space};
use super::hits::{Hit, merge_hit};

/// One reading after range smoothing, in the global frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Global-frame position of the return.
    pub point: Point2D,
    /// Range used to place the point (meters).
    pub range: f64,
    /// Bearing in the sensor frame (radians).
    pub bearing: f64,
}

/// Per-scan free-space polygon and clustered hit list.
///
/// `raw`, `free` and `hits` are rebuilt from scratch on every
/// [`add_ranges`](Self::add_ranges).
#[derive(Clone, Debug, Default)]
pub struct Scan {
    config: ScanConfig,
    raw: Vec<RawSample>,
    free: Contour,
    hits: Vec<Hit>,
}

impl Scan {
    /// Create an empty scan.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            raw: Vec::new(),
            free: Contour::default(),
            hits: Vec::new(),
        }
    }

    /// Create an empty scan with default parameters.
    pub fn with_defaults() -> Self {
        Self::new(ScanConfig::default())
    }

    /// Current configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Smoothed readings of the last update.
    pub fn raw(&self) -> &[RawSample] {
        &self.raw
    }

    /// Approximated free-space polygon.
    pub fn free(&self) -> &Contour {
        &self.free
    }

    /// Clustered hits.
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Replace the scan contents with `samples` taken at `pose`.
    ///
    /// Each sample is `(range, bearing)`. With `reject_short_scans` set, a
    /// reading shorter than `min_range` keeps `raw` but clears free space
    /// and hits, and the call reports [`ScanError::ShortReading`].
    pub fn add_ranges(&mut self, pose: Pose2D, samples: &[(f64, f64)]) -> Result<(), ScanError> {
        self.raw = samples
            .iter()
            .enumerate()
            .map(|(i, &(_, bearing))| {
                let range = self.smoothed_range(samples, i);
                RawSample {
                    point: pose.transform_point(Point2D::from_polar(range, bearing)),
                    range,
                    bearing,
                }
            })
            .collect();

        if self.config.reject_short_scans
            && let Some((index, sample)) = self
                .raw
                .iter()
                .enumerate()
                .find(|(_, s)| s.range < self.config.min_range)
        {
            log::debug!(
                "Rejecting scan: reading {} is {:.3} m (< {:.3} m)",
                index,
                sample.range,
                self.config.min_range
            );
            self.free = Contour::default();
            self.hits.clear();
            return Err(ScanError::ShortReading {
                index,
                range: sample.range,
                min_range: self.config.min_range,
            });
        }

        self.build_free();
        self.build_hits();
        Ok(())
    }

    /// Range of sample `i`, with over-range readings bridged by their
    /// neighbours when both of those are in range.
    fn smoothed_range(&self, samples: &[(f64, f64)], i: usize) -> f64 {
        let max_range = self.config.max_range;
        let r = samples[i].0;
        if r <= max_range {
            return r;
        }
        if i > 0 && i + 1 < samples.len() {
            let (ra, rb) = (samples[i - 1].0, samples[i + 1].0);
            if ra < max_range && rb < max_range {
                return (ra + rb) / 2.0;
            }
        }
        max_range + 1e-6
    }

    fn build_free(&mut self) {
        let points: Vec<Point2D> = self.raw.iter().map(|s| s.point).collect();
        let params = FreeSpaceParams {
            lookback: self.config.free_lookback,
            max_err: self.config.free_err,
            max_len: self.config.free_len,
        };
        let path = approximate_free_space(&points, &params);
        self.free = Contour::outside(path.into_iter().map(|i| points[i]).collect());
    }

    fn build_hits(&mut self) {
        let (min_range, max_range) = (self.config.min_range, self.config.max_range);
        self.hits.clear();
        for sample in &self.raw {
            if sample.range > max_range || sample.range <= min_range {
                continue;
            }
            merge_hit(&mut self.hits, sample.point, 1.0, self.config.hit_dist);
        }

        // Hits seen through by this scan lose evidence with depth.
        if !self.free.is_closed() {
            return;
        }
        let scale = self.config.decay_scale;
        for hit in &mut self.hits {
            if self.free.contains(hit.point)
                && let Some(nearest) = self.free.nearest(hit.point)
            {
                hit.weight -= nearest.distance / scale;
            }
        }
    }

    /// Distance to the free-space boundary if `p` is inside free space.
    pub fn test_free(&self, p: Point2D) -> Option<f64> {
        if !self.free.contains(p) {
            return None;
        }
        self.free.nearest(p).map(|n| n.distance)
    }

    /// True if the whole segment `pa → pb` lies in free space.
    pub fn test_free_line(&self, pa: Point2D, pb: Point2D) -> bool {
        self.test_free(pa).is_some()
            && self.test_free(pb).is_some()
            && !self.free.intersects_segment(&Line2D::new(pa, pb))
    }

    /// True if a positive-weight hit lies within `dist` of `p`.
    pub fn test_occ(&self, p: Point2D, dist: f64) -> bool {
        self.hits
            .iter()
            .any(|h| h.weight > 0.0 && h.point.distance(p) < dist)
    }
}

//! Scan processing parameters.

use serde::{Deserialize, Serialize};

/// Configuration for [`Scan`](super::Scan).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Readings at or below this range never produce hits (meters).
    #[serde(default = "default_min_range")]
    pub min_range: f64,

    /// Readings beyond this range are treated as "no return" (meters).
    #[serde(default = "default_max_range")]
    pub max_range: f64,

    /// How many samples back a free-space chord may reach.
    #[serde(default = "default_free_lookback")]
    pub free_lookback: usize,

    /// Maximum deviation of a skipped sample from its chord (meters).
    #[serde(default = "default_free_err")]
    pub free_err: f64,

    /// Maximum free-space chord length (meters).
    #[serde(default = "default_free_len")]
    pub free_len: f64,

    /// Clustering radius for hit points (meters).
    #[serde(default = "default_hit_dist")]
    pub hit_dist: f64,

    /// Distance-to-boundary scale for decaying hits inside free space.
    #[serde(default = "default_decay_scale")]
    pub decay_scale: f64,

    /// Reject the whole scan if any reading is shorter than `min_range`.
    #[serde(default)]
    pub reject_short_scans: bool,
}

fn default_min_range() -> f64 {
    0.20
}

fn default_max_range() -> f64 {
    8.0
}

fn default_free_lookback() -> usize {
    10
}

fn default_free_err() -> f64 {
    0.05
}

fn default_free_len() -> f64 {
    f64::INFINITY
}

fn default_hit_dist() -> f64 {
    0.15
}

fn default_decay_scale() -> f64 {
    0.20
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_range: default_min_range(),
            max_range: default_max_range(),
            free_lookback: default_free_lookback(),
            free_err: default_free_err(),
            free_len: default_free_len(),
            hit_dist: default_hit_dist(),
            decay_scale: default_decay_scale(),
            reject_short_scans: false,
        }
    }
}

impl ScanConfig {
    /// Builder-style setter for the valid range window.
    pub fn with_range_limits(mut self, min_range: f64, max_range: f64) -> Self {
        self.min_range = min_range;
        self.max_range = max_range;
        self
    }

    /// Builder-style setter for the free-space approximation.
    pub fn with_free_space(mut self, lookback: usize, err: f64, max_len: f64) -> Self {
        self.free_lookback = lookback;
        self.free_err = err;
        self.free_len = max_len;
        self
    }

    /// Builder-style setter for the hit clustering radius.
    pub fn with_hit_dist(mut self, hit_dist: f64) -> Self {
        self.hit_dist = hit_dist;
        self
    }

    /// Enable rejection of scans containing short readings.
    pub fn rejecting_short_scans(mut self) -> Self {
        self.reject_short_scans = true;
        self
    }

    /// Check parameter sanity.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_range >= 0.0 && self.min_range < self.max_range) {
            return Err(format!(
                "scan: need 0 <= min_range < max_range, got {} / {}",
                self.min_range, self.max_range
            ));
        }
        if self.free_lookback < 1 {
            return Err("scan: free_lookback must be at least 1".into());
        }
        if self.free_err <= 0.0 || self.free_len <= 0.0 {
            return Err("scan: free_err and free_len must be positive".into());
        }
        if self.hit_dist <= 0.0 || self.decay_scale <= 0.0 {
            return Err("scan: hit_dist and decay_scale must be positive".into());
        }
        Ok(())
    }
}

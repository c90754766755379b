//! Test utilities for Naksha integration tests.
//!
//! Synthetic range scans of simple rooms and the poses to take them from.

#![allow(dead_code)]

use std::f64::consts::TAU;

use naksha::core::Pose2D;

/// Bearings evenly spread over a full turn, starting at -π.
pub fn full_turn_bearings(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| -std::f64::consts::PI + TAU * i as f64 / n as f64)
        .collect()
}

/// Constant-range scan: a circle around the sensor.
pub fn circle_scan(n: usize, range: f64) -> Vec<(f64, f64)> {
    full_turn_bearings(n)
        .into_iter()
        .map(|b| (range, b))
        .collect()
}

/// Scan of an axis-aligned `width × height` room with its corner at the
/// origin, taken from `pose`.
pub fn room_scan(width: f64, height: f64, pose: Pose2D, n: usize) -> Vec<(f64, f64)> {
    full_turn_bearings(n)
        .into_iter()
        .map(|bearing| (room_range(width, height, pose, bearing), bearing))
        .collect()
}

/// Distance from `pose` along `bearing` to the first room wall.
pub fn room_range(width: f64, height: f64, pose: Pose2D, bearing: f64) -> f64 {
    let (sin, cos) = (pose.theta + bearing).sin_cos();
    let mut range = f64::INFINITY;

    if cos > 1e-12 {
        range = range.min((width - pose.x) / cos);
    } else if cos < -1e-12 {
        range = range.min(-pose.x / cos);
    }
    if sin > 1e-12 {
        range = range.min((height - pose.y) / sin);
    } else if sin < -1e-12 {
        range = range.min(-pose.y / sin);
    }
    range
}

/// Straight-line trajectory along +x.
pub fn straight_trajectory(n: usize, spacing: f64) -> Vec<Pose2D> {
    (0..n)
        .map(|i| Pose2D::new(i as f64 * spacing, 0.0, 0.0))
        .collect()
}

//! Free-space polygon by minimum-vertex path approximation.
//!
//! Sample indices form a DAG whose arcs all point to smaller indices:
//! `i → i-1` always, and `i → j` for `j` inside the lookback window when
//! the chord `(i, j)` is short enough and passes within `max_err` of every
//! sample it skips. The fewest-hop path from the last sample to sample 0
//! is the simplified polygon.

use crate::core::Point2D;
use crate::geometry::{Line2D, nearest_point_on_segment};

/// Parameters of the approximation.
#[derive(Clone, Copy, Debug)]
pub struct FreeSpaceParams {
    /// Farthest index distance an arc may span.
    pub lookback: usize,
    /// Maximum distance of a skipped sample from its chord.
    pub max_err: f64,
    /// Maximum chord length.
    pub max_len: f64,
}

/// Outgoing arcs of sample `a`, `a - 1` first then decreasing.
fn arcs_from(points: &[Point2D], a: usize, params: &FreeSpaceParams) -> Vec<usize> {
    let mut arcs = Vec::new();
    if a == 0 {
        return arcs;
    }
    arcs.push(a - 1);

    let lowest = a.saturating_sub(params.lookback);
    for b in (lowest..a.saturating_sub(1)).rev() {
        let chord = Line2D::new(points[a], points[b]);
        if chord.length() > params.max_len {
            continue;
        }
        let fits = (b + 1..a)
            .rev()
            .all(|c| nearest_point_on_segment(&chord, points[c]).1 < params.max_err);
        if fits {
            arcs.push(b);
        }
    }
    arcs
}

/// Indices of the simplified polygon, starting at 0 and ending at the
/// last sample. Empty input gives an empty path.
pub fn approximate_free_space(points: &[Point2D], params: &FreeSpaceParams) -> Vec<usize> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let mut hops = vec![usize::MAX; n];
    let mut next: Vec<Option<usize>> = vec![None; n];
    hops[n - 1] = 0;

    // Arcs only point backwards, so one high-to-low sweep settles every node.
    for a in (1..n).rev() {
        if hops[a] == usize::MAX {
            continue;
        }
        let cost = hops[a] + 1;
        for b in arcs_from(points, a, params) {
            if cost < hops[b] {
                hops[b] = cost;
                next[b] = Some(a);
            }
        }
    }

    let mut path = Vec::with_capacity(hops[0].saturating_add(1).min(n));
    let mut cursor = Some(0);
    while let Some(i) = cursor {
        path.push(i);
        cursor = next[i];
    }
    log::trace!("free space: {} samples -> {} vertices", n, path.len());
    path
}

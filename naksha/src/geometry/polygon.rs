//! Closed rings: nearest edge, containment, areas.
//!
//! A ring is a slice of vertices; the last vertex implicitly connects back
//! to the first. [`Contour`] wraps a ring with its hole/outside tag.

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D};

use super::line::{Line2D, nearest_point_on_segment, segment_intersect};

/// A closed ring tagged as solid boundary or hole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Ring vertices, implicitly closed.
    pub points: Vec<Point2D>,
    /// True if this ring bounds a hole.
    pub hole: bool,
}

/// Nearest boundary point of a ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingNearest {
    /// Nearest point on the boundary.
    pub point: Point2D,
    /// Index `i` of the edge `ring[i] → ring[(i + 1) % n]`.
    pub edge_index: usize,
    /// The edge itself.
    pub edge: Line2D,
    /// Distance from the query point.
    pub distance: f64,
}

impl Contour {
    /// Outside (solid) ring.
    pub fn outside(points: Vec<Point2D>) -> Self {
        Self {
            points,
            hole: false,
        }
    }

    /// Hole ring.
    pub fn hole(points: Vec<Point2D>) -> Self {
        Self { points, hole: true }
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the ring has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if the ring encloses area (at least 3 vertices).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 3
    }

    /// Iterate over edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Line2D> + '_ {
        ring_edges(&self.points)
    }

    /// Containment test; rings with fewer than 3 vertices contain nothing.
    pub fn contains(&self, p: Point2D) -> bool {
        self.is_closed() && polygon_contains(&self.points, p)
    }

    /// Nearest boundary point.
    pub fn nearest(&self, p: Point2D) -> Option<RingNearest> {
        polygon_nearest(&self.points, p)
    }

    /// Signed shoelace area (positive for CCW).
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// True if any edge crosses the segment `line`.
    pub fn intersects_segment(&self, line: &Line2D) -> bool {
        self.points.len() >= 2 && self.edges().any(|e| segment_intersect(&e, line).is_some())
    }

    /// Copy of this contour mapped from `frame` into its parent.
    pub fn transformed(&self, frame: Pose2D) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|&p| frame.transform_point(p))
                .collect(),
            hole: self.hole,
        }
    }
}

/// Edges of a ring, closing edge last.
pub fn ring_edges(ring: &[Point2D]) -> impl Iterator<Item = Line2D> + '_ {
    let n = ring.len();
    (0..n).map(move |i| Line2D::new(ring[i], ring[(i + 1) % n]))
}

/// Nearest point over all ring edges, wrap-around included.
///
/// Ties keep the first edge found. Returns `None` for an empty ring.
pub fn polygon_nearest(ring: &[Point2D], p: Point2D) -> Option<RingNearest> {
    let mut best: Option<RingNearest> = None;
    for (edge_index, edge) in ring_edges(ring).enumerate() {
        let (point, distance) = nearest_point_on_segment(&edge, p);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(RingNearest {
                point,
                edge_index,
                edge,
                distance,
            });
        }
    }
    best
}

/// Even-odd ray-casting containment test.
///
/// An edge counts when `p.y > min(y)`, `p.y <= max(y)`, `p.x <= max(x)`, the
/// edge is not horizontal, and either it is vertical or `p.x` is at or left
/// of the x-intercept. Points on bottom or left boundaries are outside,
/// points on top or right boundaries inside.
///
/// # Panics
/// If the ring has fewer than 3 vertices.
pub fn polygon_contains(ring: &[Point2D], p: Point2D) -> bool {
    assert!(
        ring.len() >= 3,
        "polygon_contains needs at least 3 vertices, got {}",
        ring.len()
    );

    let mut crossings = 0usize;
    for edge in ring_edges(ring) {
        let (p1, p2) = (edge.pa, edge.pb);
        if p.y > p1.y.min(p2.y)
            && p.y <= p1.y.max(p2.y)
            && p.x <= p1.x.max(p2.x)
            && p1.y != p2.y
        {
            let x_inters = (p.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if p1.x == p2.x || p.x <= x_inters {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point2D]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    ring_edges(ring).map(|e| e.pa.cross(e.pb)).sum::<f64>() * 0.5
}

// ─────────────────────────────────────────────────────────────────────────────
// Intersection area (integer sweep)
// ─────────────────────────────────────────────────────────────────────────────

/// Coordinates are quantised into this many integer steps per axis.
const AREA_GAMUT: f64 = 5.0e8;

#[derive(Clone, Copy, Debug, Default)]
struct IPoint {
    x: i64,
    y: i64,
}

#[derive(Clone, Copy, Debug, Default)]
struct IRange {
    min: i64,
    max: i64,
}

impl IRange {
    fn spanning(a: i64, b: i64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    fn overlaps(&self, other: &IRange) -> bool {
        self.min < other.max && other.min < self.max
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct IVertex {
    ip: IPoint,
    rx: IRange,
    ry: IRange,
    crossings: i64,
}

/// Twice the signed area of triangle (a, p, q).
fn tri_area(a: IPoint, p: IPoint, q: IPoint) -> i64 {
    p.x * q.y - p.y * q.x + a.x * (p.y - q.y) + a.y * (q.x - p.x)
}

struct Quantizer {
    min: Point2D,
    scale_x: f64,
    scale_y: f64,
}

impl Quantizer {
    /// Map a ring onto the integer grid. The low bits separate the two rings
    /// (`tag`) and alternate vertices so no two vertices or edges coincide.
    fn fit(&self, ring: &[Point2D], tag: i64) -> Vec<IVertex> {
        let mid = AREA_GAMUT / 2.0;
        let n = ring.len();
        let mut verts: Vec<IVertex> = ring
            .iter()
            .enumerate()
            .map(|(c, p)| {
                let qx = ((p.x - self.min.x) * self.scale_x - mid) as i64;
                let qy = ((p.y - self.min.y) * self.scale_y - mid) as i64;
                IVertex {
                    ip: IPoint {
                        x: (qx & !7) | tag | (c as i64 & 1),
                        y: (qy & !7) | tag,
                    },
                    ..Default::default()
                }
            })
            .collect();
        verts[0].ip.y += n as i64 & 1;
        verts.push(verts[0]);
        for c in 0..n {
            let (a, b) = (verts[c].ip, verts[c + 1].ip);
            verts[c].rx = IRange::spanning(a.x, b.x);
            verts[c].ry = IRange::spanning(a.y, b.y);
        }
        verts
    }
}

struct AreaSweep {
    sum: i64,
}

impl AreaSweep {
    fn contribute(&mut self, from: IPoint, to: IPoint, weight: i64) {
        self.sum += weight * (to.x - from.x) * (to.y + from.y) / 2;
    }

    fn lerp(a: IPoint, b: IPoint, r: f64) -> IPoint {
        IPoint {
            x: (a.x as f64 + r * (b.x - a.x) as f64) as i64,
            y: (a.y as f64 + r * (b.y - a.y) as f64) as i64,
        }
    }

    /// Account for edge `a→b` of one ring crossing edge `c→d` of the other.
    #[allow(clippy::too_many_arguments)]
    fn cross(
        &mut self,
        a: IPoint,
        b: IPoint,
        c: IPoint,
        d: IPoint,
        a1: f64,
        a2: f64,
        a3: f64,
        a4: f64,
    ) {
        let r1 = a1 / (a1 + a2);
        let r2 = a3 / (a3 + a4);
        self.contribute(Self::lerp(a, b, r1), b, 1);
        self.contribute(d, Self::lerp(c, d, r2), 1);
    }

    /// Add the edges of `p` weighted by how deep they lie inside `q`.
    fn inness(&mut self, p: &[IVertex], q: &[IVertex]) {
        let origin = p[0].ip;
        let mut s = 0i64;
        for c in (0..q.len() - 1).rev() {
            if q[c].rx.min < origin.x && origin.x < q[c].rx.max {
                let left = 0 < tri_area(origin, q[c].ip, q[c + 1].ip);
                let rising = q[c].ip.x < q[c + 1].ip.x;
                if left == rising {
                    s += if left { -1 } else { 1 };
                }
            }
        }
        for j in 0..p.len() - 1 {
            if s != 0 {
                self.contribute(p[j].ip, p[j + 1].ip, s);
            }
            s += p[j].crossings;
        }
    }
}

/// Signed area of the intersection of two rings.
///
/// Returns 0 if either ring has fewer than 3 vertices. Both rings are
/// quantised onto a shared integer grid and the area is accumulated from
/// edge crossings plus the portions of each ring lying inside the other.
/// Counter-clockwise inputs give a positive result.
pub fn polygon_intersection_area(a: &[Point2D], b: &[Point2D]) -> f64 {
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }

    let mut min = Point2D::new(f64::MAX, f64::MAX);
    let mut max = Point2D::new(f64::MIN, f64::MIN);
    for p in a.iter().chain(b) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let (range_x, range_y) = (max.x - min.x, max.y - min.y);
    if range_x <= 0.0 || range_y <= 0.0 || !range_x.is_finite() || !range_y.is_finite() {
        return 0.0;
    }

    let quantizer = Quantizer {
        min,
        scale_x: AREA_GAMUT / range_x,
        scale_y: AREA_GAMUT / range_y,
    };
    let mut va = quantizer.fit(a, 0);
    let mut vb = quantizer.fit(b, 2);
    let mut sweep = AreaSweep { sum: 0 };

    for j in 0..a.len() {
        for k in 0..b.len() {
            if !(va[j].rx.overlaps(&vb[k].rx) && va[j].ry.overlaps(&vb[k].ry)) {
                continue;
            }
            let a1 = -tri_area(va[j].ip, vb[k].ip, vb[k + 1].ip);
            let a2 = tri_area(va[j + 1].ip, vb[k].ip, vb[k + 1].ip);
            let a_first = a1 < 0;
            if a_first != (a2 < 0) {
                continue;
            }
            let a3 = tri_area(vb[k].ip, va[j].ip, va[j + 1].ip);
            let a4 = -tri_area(vb[k + 1].ip, va[j].ip, va[j + 1].ip);
            if (a3 < 0) != (a4 < 0) {
                continue;
            }
            let (a1, a2, a3, a4) = (a1 as f64, a2 as f64, a3 as f64, a4 as f64);
            if a_first {
                sweep.cross(va[j].ip, va[j + 1].ip, vb[k].ip, vb[k + 1].ip, a1, a2, a3, a4);
                va[j].crossings += 1;
                vb[k].crossings -= 1;
            } else {
                sweep.cross(vb[k].ip, vb[k + 1].ip, va[j].ip, va[j + 1].ip, a3, a4, a1, a2);
                vb[k].crossings += 1;
                va[j].crossings -= 1;
            }
        }
    }

    sweep.inness(&va, &vb);
    sweep.inness(&vb, &va);

    sweep.sum as f64 / (quantizer.scale_x * quantizer.scale_y)
}

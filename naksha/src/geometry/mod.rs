//! Geometry primitives: segments and closed rings.

mod line;
mod polygon;

pub use line::{Line2D, SegmentProjection, nearest_point_on_segment, segment_intersect};
pub use polygon::{
    Contour, RingNearest, polygon_contains, polygon_intersection_area, polygon_nearest,
    ring_edges, signed_area,
};

//! Multi-scan fusion: polygon union of free space plus global hit lists.

mod clipper;
mod group;
mod solid;

pub use clipper::{GeoClipper, PolygonClipper};
pub use group::{GroupConfig, ScanGroup};
pub use solid::{ScanSolid, SolidNearest};

//! # Naksha: Free-Space Mapping and Pose-Graph Relaxation
//!
//! The map-building back end of a 2D laser robot. Scans become free-space
//! polygons and clustered obstacle hits; scans taken from nearby poses are
//! fused into groups; groups are matched against each other to produce
//! point/segment correspondences; a pose graph built from those
//! correspondences is relaxed to correct the group poses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use naksha::core::Pose2D;
//! use naksha::matching::{MatchConfig, ScanMatch};
//! use naksha::relax::{LsConfig, RelaxGraph};
//! use naksha::scan::Scan;
//! use naksha::solid::ScanGroup;
//!
//! let ranges: Vec<(f64, f64)> = (0..180)
//!     .map(|i| (2.0, -1.5 + 3.0 * i as f64 / 179.0))
//!     .collect();
//!
//! let mut scan = Scan::with_defaults();
//! scan.add_ranges(Pose2D::identity(), &ranges)?;
//!
//! let mut group_a = ScanGroup::with_defaults();
//! group_a.add(Pose2D::identity(), &scan);
//! let mut group_b = ScanGroup::with_defaults();
//! group_b.add(Pose2D::identity(), &scan);
//!
//! let pose_a = Pose2D::identity();
//! let pose_b = Pose2D::new(0.05, 0.0, 0.01);
//! let pairs = ScanMatch::new(&group_a, &group_b, MatchConfig::default()).pairs(pose_a, pose_b);
//!
//! let mut graph = RelaxGraph::new();
//! let a = graph.add_node(pose_a, false);
//! let b = graph.add_node(pose_b, true);
//! graph.add_pair_links(a, b, &pairs, 0.40)?;
//! let report = graph.relax_ls(&LsConfig::default());
//! println!("error {:.3e} after {} iterations", report.error, report.iterations);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Coordinate Frame
//!
//! Poses are `(x, y, θ)` with counter-clockwise positive heading. A pose is
//! the transform from a local frame into its parent frame; see
//! [`core::pose_compose`] and [`core::pose_decompose`].
//!
//! ## Data Flow
//!
//! ```text
//!   (pose, [(range, bearing)])
//!               │ Scan::add_ranges
//!               ▼
//!     ┌───────────────────┐
//!     │ Scan              │  free contour + weighted hits
//!     └─────────┬─────────┘
//!               │ ScanGroup::add(pose, &scan)
//!               ▼
//!     ┌───────────────────┐
//!     │ ScanGroup         │  ScanSolid (union) + merged hits
//!     └─────────┬─────────┘
//!               │ ScanMatch::pairs(pose_a, pose_b)
//!               ▼
//!     ┌───────────────────┐
//!     │ CorrespondencePair│  point/segment pairs
//!     └─────────┬─────────┘
//!               │ RelaxGraph::add_pair_links
//!               ▼
//!     ┌───────────────────┐
//!     │ RelaxGraph        │──► relax_ls (Levenberg–Marquardt)
//!     │                   │──► relax_nl (conjugate gradient)
//!     └───────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`core`]: points, poses, angle math, small matrix helpers
//! - [`geometry`]: segments and polygon rings
//! - [`scan`]: single-scan free space and hits
//! - [`solid`]: multi-scan free-space union and hit accumulation
//! - [`matching`]: correspondence pairs between two groups
//! - [`relax`]: pose graph and its solvers
//! - [`config`]: YAML configuration

pub mod config;
pub mod core;
pub mod geometry;
pub mod matching;
pub mod relax;
pub mod scan;
pub mod solid;

pub use config::{ConfigLoadError, NakshaConfig};
pub use core::{Point2D, Pose2D};
pub use matching::{CorrespondencePair, MatchConfig, ScanMatch};
pub use relax::{CgReport, GraphError, LsConfig, LsReport, NlConfig, RelaxGraph};
pub use scan::{Scan, ScanConfig, ScanError};
pub use solid::{GroupConfig, ScanGroup, ScanSolid};

//! Pose-graph relaxation.
//!
//! A [`RelaxGraph`] holds poses (nodes) joined by weighted point/line
//! constraints (links), typically built from [`ScanMatch`](crate::matching::ScanMatch)
//! pairs. Two solvers move the free nodes to reduce the total link cost:
//!
//! - [`RelaxGraph::relax_ls`]: Levenberg–Marquardt on the residuals `w·s`
//! - [`RelaxGraph::relax_nl`]: Fletcher–Reeves conjugate gradient on `½·w·s²`
//!
//! Both saturate a link's cost once its distance reaches the link's outlier
//! distance, so far-off correspondences stop pulling.

mod cg;
mod config;
mod cost;
mod error;
mod graph;
mod lm;
mod problem;

pub use cg::CgReport;
pub use config::{LsConfig, NlConfig, RelaxConfig};
pub use cost::{CostForm, LinkEval, evaluate_link};
pub use error::{GraphError, Result};
pub use graph::{LinkId, NodeId, RelaxGraph, RelaxLink, RelaxNode};
pub use lm::LsReport;

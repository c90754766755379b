//! Relaxation graph errors.

use thiserror::Error;

use super::graph::{LinkId, NodeId};

/// Errors from editing a [`RelaxGraph`](super::RelaxGraph).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("unknown link {0:?}")]
    UnknownLink(LinkId),

    #[error("node {node:?} is still referenced by {links} link(s)")]
    NodeHasLinks { node: NodeId, links: usize },

    /// Link weight must be positive and the outlier distance positive and finite.
    #[error("invalid link: weight {weight}, outlier distance {outlier_distance}")]
    InvalidLink { weight: f64, outlier_distance: f64 },
}

pub type Result<T> = std::result::Result<T, GraphError>;

//! Pose graph storage.
//!
//! Nodes and links live in slot maps addressed by generational handles, so
//! a stale handle is an error rather than a dangling reference. Each map is
//! paired with an ordering list that defines residual and parameter order;
//! removal swap-removes from that list.

use slotmap::{SlotMap, new_key_type};

use crate::core::Pose2D;
use crate::matching::{CorrespondencePair, PairGeometry};

use super::cost::{CostForm, evaluate_link};
use super::error::{GraphError, Result};

new_key_type! {
    /// Handle to a [`RelaxNode`].
    pub struct NodeId;
    /// Handle to a [`RelaxLink`].
    pub struct LinkId;
}

/// A pose in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxNode {
    /// Current pose estimate.
    pub pose: Pose2D,
    /// Whether the solvers may move this node.
    pub free: bool,
    index: Option<usize>,
    slot: usize,
}

impl RelaxNode {
    /// Position among free nodes at the last solve (parameters
    /// `3·i .. 3·i + 3`); `None` for fixed or never-solved nodes.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// A weighted geometric constraint between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxLink {
    /// Node owning side A of the geometry.
    pub node_a: NodeId,
    /// Node owning side B of the geometry.
    pub node_b: NodeId,
    /// Geometry in each node's local frame.
    pub geometry: PairGeometry,
    /// Cost weight.
    pub weight: f64,
    /// Residuals at or beyond this distance contribute a constant cost.
    pub outlier_distance: f64,
    slot: usize,
}

/// Pose graph of nodes joined by point/line constraints.
#[derive(Clone, Debug, Default)]
pub struct RelaxGraph {
    nodes: SlotMap<NodeId, RelaxNode>,
    links: SlotMap<LinkId, RelaxLink>,
    node_order: Vec<NodeId>,
    link_order: Vec<LinkId>,
}

impl RelaxGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.link_order.len()
    }

    /// Number of free nodes.
    pub fn free_node_count(&self) -> usize {
        self.nodes.values().filter(|n| n.free).count()
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    /// Add a node.
    pub fn add_node(&mut self, pose: Pose2D, free: bool) -> NodeId {
        let slot = self.node_order.len();
        let id = self.nodes.insert(RelaxNode {
            pose,
            free,
            index: None,
            slot,
        });
        self.node_order.push(id);
        id
    }

    /// Remove a node. Fails while any link still references it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<RelaxNode> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::UnknownNode(id));
        }
        let links = self
            .links
            .values()
            .filter(|l| l.node_a == id || l.node_b == id)
            .count();
        if links > 0 {
            return Err(GraphError::NodeHasLinks { node: id, links });
        }

        let node = self.nodes.remove(id).ok_or(GraphError::UnknownNode(id))?;
        self.node_order.swap_remove(node.slot);
        if let Some(&moved) = self.node_order.get(node.slot)
            && let Some(n) = self.nodes.get_mut(moved)
        {
            n.slot = node.slot;
        }
        Ok(node)
    }

    /// Add a link between two existing nodes.
    ///
    /// `weight` must be positive and finite, `outlier_distance` positive
    /// and finite.
    pub fn add_link(
        &mut self,
        node_a: NodeId,
        node_b: NodeId,
        geometry: PairGeometry,
        weight: f64,
        outlier_distance: f64,
    ) -> Result<LinkId> {
        for id in [node_a, node_b] {
            if !self.nodes.contains_key(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(weight) || !valid(outlier_distance) {
            return Err(GraphError::InvalidLink {
                weight,
                outlier_distance,
            });
        }
        let slot = self.link_order.len();
        let id = self.links.insert(RelaxLink {
            node_a,
            node_b,
            geometry,
            weight,
            outlier_distance,
            slot,
        });
        self.link_order.push(id);
        Ok(id)
    }

    /// Add one link per correspondence pair, A-side on `node_a`.
    pub fn add_pair_links(
        &mut self,
        node_a: NodeId,
        node_b: NodeId,
        pairs: &[CorrespondencePair],
        outlier_distance: f64,
    ) -> Result<Vec<LinkId>> {
        pairs
            .iter()
            .map(|pair| self.add_link(node_a, node_b, pair.geometry, pair.weight, outlier_distance))
            .collect()
    }

    /// Remove a link.
    pub fn remove_link(&mut self, id: LinkId) -> Result<RelaxLink> {
        let link = self.links.remove(id).ok_or(GraphError::UnknownLink(id))?;
        self.link_order.swap_remove(link.slot);
        if let Some(&moved) = self.link_order.get(link.slot)
            && let Some(l) = self.links.get_mut(moved)
        {
            l.slot = link.slot;
        }
        Ok(link)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&RelaxNode> {
        self.nodes.get(id)
    }

    /// Look up a node for editing its pose or free flag.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut RelaxNode> {
        self.nodes.get_mut(id)
    }

    /// Look up a link.
    pub fn link(&self, id: LinkId) -> Option<&RelaxLink> {
        self.links.get(id)
    }

    /// Look up a link for editing its weight or geometry.
    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut RelaxLink> {
        self.links.get_mut(id)
    }

    /// Nodes in solve order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &RelaxNode)> + '_ {
        self.node_order.iter().map(|&id| (id, &self.nodes[id]))
    }

    /// Links in residual order.
    pub fn links(&self) -> impl Iterator<Item = (LinkId, &RelaxLink)> + '_ {
        self.link_order.iter().map(|&id| (id, &self.links[id]))
    }

    /// Number the free nodes in order; returns how many there are.
    pub(crate) fn assign_indices(&mut self) -> usize {
        let mut next = 0;
        for &id in &self.node_order {
            let node = &mut self.nodes[id];
            node.index = if node.free {
                next += 1;
                Some(next - 1)
            } else {
                None
            };
        }
        next
    }

    /// Write solved poses back to free nodes.
    pub(crate) fn write_back(&mut self, params: &[f64]) {
        for node in self.nodes.values_mut() {
            if let (true, Some(i)) = (node.free, node.index) {
                node.pose = Pose2D::new(params[3 * i], params[3 * i + 1], params[3 * i + 2]);
            }
        }
    }

    /// Sum of per-link costs `u` at the current poses, without solving.
    pub fn total_cost(&self, form: CostForm) -> f64 {
        self.links()
            .map(|(_, link)| {
                let pose_a = self.nodes[link.node_a].pose;
                let pose_b = self.nodes[link.node_b].pose;
                evaluate_link(link, pose_a, pose_b, form).cost
            })
            .sum()
    }
}

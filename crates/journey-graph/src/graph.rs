use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::edge::CampaignEdge;
use crate::enums::NodeKind;
use crate::error::GraphError;
use crate::node::CampaignNode;

/// The full node/edge collection of one campaign.
///
/// Invariants (checked by [`CampaignGraph::validate`]):
/// - node and edge ids are unique,
/// - every edge endpoint references an existing node.
///
/// Node ids are stable for the lifetime of a campaign and are reused as join
/// keys when the graph is re-serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CampaignGraph {
  #[serde(default)]
  pub nodes: Vec<CampaignNode>,
  #[serde(default)]
  pub edges: Vec<CampaignEdge>,
}

impl CampaignGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn node(&self, id: &str) -> Option<&CampaignNode> {
    self.nodes.iter().find(|n| n.id == id)
  }

  pub fn node_mut(&mut self, id: &str) -> Option<&mut CampaignNode> {
    self.nodes.iter_mut().find(|n| n.id == id)
  }

  pub fn contains_node(&self, id: &str) -> bool {
    self.node(id).is_some()
  }

  /// First node of the given kind, in insertion order.
  pub fn first_of_kind(&self, kind: NodeKind) -> Option<&CampaignNode> {
    self.nodes.iter().find(|n| n.kind() == kind)
  }

  /// Edges leaving the given node.
  pub fn outgoing(&self, node_id: &str) -> impl Iterator<Item = &CampaignEdge> {
    self.edges.iter().filter(move |e| e.source == node_id)
  }

  /// Check id uniqueness and edge endpoint validity.
  pub fn validate(&self) -> Result<(), GraphError> {
    let mut node_ids = HashSet::new();
    for node in &self.nodes {
      if !node_ids.insert(node.id.as_str()) {
        return Err(GraphError::DuplicateNodeId(node.id.clone()));
      }
    }

    let mut edge_ids = HashSet::new();
    for edge in &self.edges {
      if !edge_ids.insert(edge.id.as_str()) {
        return Err(GraphError::DuplicateEdgeId(edge.id.clone()));
      }
      for endpoint in [&edge.source, &edge.target] {
        if !node_ids.contains(endpoint.as_str()) {
          return Err(GraphError::DanglingEdge {
            edge_id: edge.id.clone(),
            node_id: endpoint.clone(),
          });
        }
      }
    }

    Ok(())
  }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("duplicate node id: {0}")]
  DuplicateNodeId(String),

  #[error("duplicate edge id: {0}")]
  DuplicateEdgeId(String),

  #[error("edge {edge_id} references unknown node: {node_id}")]
  DanglingEdge { edge_id: String, node_id: String },

  #[error("invalid node document {id}: {message}")]
  InvalidNode { id: String, message: String },
}

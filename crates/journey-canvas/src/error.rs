use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
  #[error("unknown node: {0}")]
  UnknownNode(String),

  #[error("invalid source handle {handle:?} for logic node {node_id}")]
  InvalidHandle {
    node_id: String,
    handle: Option<String>,
  },

  #[error("duplicate edge from {source_id} to {target}")]
  DuplicateEdge { source_id: String, target: String },
}

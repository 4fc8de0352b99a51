use serde::{Deserialize, Serialize};

/// A directed connection between two nodes.
///
/// `source_handle` is only meaningful on edges leaving a logic node, where it
/// disambiguates the `"true"` and `"false"` branch slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEdge {
  pub id: String,
  pub source: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_handle: Option<String>,
  pub target: String,
}

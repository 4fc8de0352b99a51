use chrono::{DateTime, Utc};
use journey_graph::{CampaignEdge, CampaignGraph, CampaignNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle status of a stored campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
  Draft,
  Active,
  Paused,
}

impl Default for CampaignStatus {
  fn default() -> Self {
    CampaignStatus::Draft
  }
}

impl CampaignStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      CampaignStatus::Draft => "draft",
      CampaignStatus::Active => "active",
      CampaignStatus::Paused => "paused",
    }
  }
}

impl std::str::FromStr for CampaignStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "draft" => Ok(CampaignStatus::Draft),
      "active" => Ok(CampaignStatus::Active),
      "paused" => Ok(CampaignStatus::Paused),
      other => Err(format!("unknown campaign status: {other}")),
    }
  }
}

/// The persisted `{nodes, edges, metadata}` document of one campaign.
///
/// `metadata` is an open map reserved for auxiliary run-time configuration
/// (for example a demo recipient list). Partial updates merge into it rather
/// than overwriting it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowDefinition {
  #[serde(default)]
  pub nodes: Vec<CampaignNode>,
  #[serde(default)]
  pub edges: Vec<CampaignEdge>,
  #[serde(default)]
  pub metadata: Map<String, Value>,
}

impl FlowDefinition {
  pub fn from_graph(graph: &CampaignGraph, metadata: Map<String, Value>) -> Self {
    Self {
      nodes: graph.nodes.clone(),
      edges: graph.edges.clone(),
      metadata,
    }
  }

  pub fn to_graph(&self) -> CampaignGraph {
    CampaignGraph {
      nodes: self.nodes.clone(),
      edges: self.edges.clone(),
    }
  }
}

/// A campaign as stored in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
  pub id: String,
  pub name: String,
  pub status: CampaignStatus,
  pub flow_definition: FlowDefinition,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Catalog product, consumed read-only by the action-node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub product_kind: String,
  pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
  pub id: String,
  pub name: String,
  pub value: f64,
}

/// A marketed packaging of a product or coupon with creative content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
  pub id: String,
  pub name: String,
  pub category: String,
  pub price: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub product_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub coupon_id: Option<String>,
}

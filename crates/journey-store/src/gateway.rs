use chrono::Utc;
use journey_graph::{CampaignEdge, CampaignNode};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::types::{CampaignRecord, CampaignStatus, FlowDefinition};
use crate::{CampaignStore, StoreError};

/// Prefix of locally-generated placeholder ids used before the first
/// successful save.
pub const TRANSIENT_ID_PREFIX: &str = "local-";

/// Mint a placeholder campaign id for a not-yet-saved canvas.
pub fn transient_id() -> String {
  format!("{TRANSIENT_ID_PREFIX}{}", Uuid::new_v4())
}

/// Whether an id is a local placeholder rather than a durable document id.
pub fn is_transient_id(id: &str) -> bool {
  id.starts_with(TRANSIENT_ID_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
  pub id: String,
  /// True when the save created a new document rather than updating one.
  pub created: bool,
}

/// The single component permitted to read and write a campaign's
/// `flow_definition` document.
pub struct PersistenceGateway<S> {
  store: S,
}

impl<S: CampaignStore> PersistenceGateway<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Load a stored campaign. `NotAuthenticated` and `NotFound` are non-fatal
  /// to the caller; the canvas keeps its in-memory state either way.
  pub async fn load(&self, id: &str) -> Result<CampaignRecord, StoreError> {
    self.store.get(id).await
  }

  /// Stored campaigns, most recently updated first.
  pub async fn list(&self) -> Result<Vec<CampaignRecord>, StoreError> {
    self.store.list().await
  }

  /// Persist the current canvas state.
  ///
  /// A missing or transient id creates a new document under a fresh durable
  /// uuid. An update fetches the stored document first and merges
  /// `aux_metadata` over the existing metadata map, so auxiliary keys written
  /// by other screens survive a canvas save.
  pub async fn save(
    &self,
    id: Option<&str>,
    nodes: &[CampaignNode],
    edges: &[CampaignEdge],
    name: Option<&str>,
    status: CampaignStatus,
    aux_metadata: Option<Map<String, Value>>,
  ) -> Result<SaveOutcome, StoreError> {
    let now = Utc::now();

    match id {
      Some(id) if !is_transient_id(id) => {
        let existing = self.store.get(id).await?;

        let mut metadata = existing.flow_definition.metadata;
        if let Some(aux) = aux_metadata {
          for (key, value) in aux {
            metadata.insert(key, value);
          }
        }

        let record = CampaignRecord {
          id: id.to_string(),
          name: name.map(str::to_string).unwrap_or(existing.name),
          status,
          flow_definition: FlowDefinition {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
            metadata,
          },
          created_at: existing.created_at,
          updated_at: now,
        };
        self.store.update(&record).await?;
        info!(campaign_id = %record.id, "campaign updated");
        Ok(SaveOutcome {
          id: record.id,
          created: false,
        })
      }
      _ => {
        let record = CampaignRecord {
          id: Uuid::new_v4().to_string(),
          name: name.unwrap_or("Untitled campaign").to_string(),
          status,
          flow_definition: FlowDefinition {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
            metadata: aux_metadata.unwrap_or_default(),
          },
          created_at: now,
          updated_at: now,
        };
        self.store.insert(&record).await?;
        info!(campaign_id = %record.id, "campaign created");
        Ok(SaveOutcome {
          id: record.id,
          created: true,
        })
      }
    }
  }
}

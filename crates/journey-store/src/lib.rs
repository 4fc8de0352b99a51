//! Journey Store
//!
//! This crate provides the storage traits and implementations for campaign
//! documents and the read-only catalog, plus the [`PersistenceGateway`] that
//! the canvas uses to load and save campaigns.
//!
//! The [`CampaignStore`] trait defines operations for:
//! - Reading and writing campaign documents (`flow_definition` blobs)
//! - Listing stored campaigns
//!
//! The [`Catalog`] trait exposes the read-only product/coupon/offer lists the
//! action-node configuration consumes. Catalog reads fail closed (empty list)
//! when no session exists; campaign writes surface `NotAuthenticated`.

mod gateway;
mod memory;
mod sqlite;
mod types;

pub use gateway::{PersistenceGateway, SaveOutcome, is_transient_id, transient_id};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{CampaignRecord, CampaignStatus, Coupon, FlowDefinition, Offer, Product};

use async_trait::async_trait;

/// Error taxonomy for storage operations.
///
/// Nothing here is fatal: callers render the error and keep the in-memory
/// graph in its last-known-good state. Racing writers are not detected;
/// the last write wins at the storage tier.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// No valid session. Read paths fail closed instead of raising.
  #[error("not authenticated")]
  NotAuthenticated,

  /// The referenced campaign/offer/product does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// Network/backend failure. The operation is abandoned, not retried.
  #[error("transient storage failure: {0}")]
  Transient(String),
}

impl From<sqlx::Error> for StoreError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
      // Everything unexpected is downgraded to a transient failure with the
      // original message preserved for diagnostics.
      other => StoreError::Transient(other.to_string()),
    }
  }
}

impl From<serde_json::Error> for StoreError {
  fn from(error: serde_json::Error) -> Self {
    StoreError::Transient(format!("document encoding: {error}"))
  }
}

/// Storage trait for campaign documents.
#[async_trait]
pub trait CampaignStore: Send + Sync {
  /// Get a campaign by id.
  async fn get(&self, id: &str) -> Result<CampaignRecord, StoreError>;

  /// Create a new campaign document.
  async fn insert(&self, record: &CampaignRecord) -> Result<(), StoreError>;

  /// Replace an existing campaign document.
  async fn update(&self, record: &CampaignRecord) -> Result<(), StoreError>;

  /// List stored campaigns, most recently updated first.
  async fn list(&self) -> Result<Vec<CampaignRecord>, StoreError>;
}

/// Read-only catalog the action-node configuration consumes.
#[async_trait]
pub trait Catalog: Send + Sync {
  async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
  async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError>;
  async fn list_offers(&self) -> Result<Vec<Offer>, StoreError>;
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::types::{CampaignRecord, Coupon, Offer, Product};
use crate::{CampaignStore, Catalog, StoreError};

/// In-memory store used by tests and the simulation demo.
///
/// Models the session contract of the hosted backend: campaign reads/writes
/// require authentication, catalog reads fail closed with an empty list.
#[derive(Debug, Default)]
pub struct MemoryStore {
  campaigns: Mutex<HashMap<String, CampaignRecord>>,
  products: Vec<Product>,
  coupons: Vec<Coupon>,
  offers: Vec<Offer>,
  signed_out: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_catalog(products: Vec<Product>, coupons: Vec<Coupon>, offers: Vec<Offer>) -> Self {
    Self {
      products,
      coupons,
      offers,
      ..Self::default()
    }
  }

  pub fn set_authenticated(&self, authenticated: bool) {
    self.signed_out.store(!authenticated, Ordering::SeqCst);
  }

  fn require_session(&self) -> Result<(), StoreError> {
    if self.signed_out.load(Ordering::SeqCst) {
      Err(StoreError::NotAuthenticated)
    } else {
      Ok(())
    }
  }

  fn has_session(&self) -> bool {
    !self.signed_out.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CampaignStore for MemoryStore {
  async fn get(&self, id: &str) -> Result<CampaignRecord, StoreError> {
    self.require_session()?;
    self
      .campaigns
      .lock()
      .await
      .get(id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(id.to_string()))
  }

  async fn insert(&self, record: &CampaignRecord) -> Result<(), StoreError> {
    self.require_session()?;
    self
      .campaigns
      .lock()
      .await
      .insert(record.id.clone(), record.clone());
    Ok(())
  }

  async fn update(&self, record: &CampaignRecord) -> Result<(), StoreError> {
    self.require_session()?;
    let mut campaigns = self.campaigns.lock().await;
    if !campaigns.contains_key(&record.id) {
      return Err(StoreError::NotFound(record.id.clone()));
    }
    campaigns.insert(record.id.clone(), record.clone());
    Ok(())
  }

  async fn list(&self) -> Result<Vec<CampaignRecord>, StoreError> {
    self.require_session()?;
    let mut records: Vec<_> = self.campaigns.lock().await.values().cloned().collect();
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(records)
  }
}

#[async_trait]
impl Catalog for MemoryStore {
  async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
    if !self.has_session() {
      return Ok(Vec::new());
    }
    Ok(self.products.clone())
  }

  async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError> {
    if !self.has_session() {
      return Ok(Vec::new());
    }
    Ok(self.coupons.clone())
  }

  async fn list_offers(&self) -> Result<Vec<Offer>, StoreError> {
    if !self.has_session() {
      return Ok(Vec::new());
    }
    Ok(self.offers.clone())
  }
}

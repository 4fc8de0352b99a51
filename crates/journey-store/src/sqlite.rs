use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::types::{CampaignRecord, CampaignStatus};
use crate::{CampaignStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS campaigns (
  id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  status TEXT NOT NULL,
  flow_definition TEXT NOT NULL,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
)";

/// SQLite-backed campaign store.
///
/// The `flow_definition` document is kept as an opaque JSON text column, the
/// same way the hosted document store treats it.
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Open (creating if missing) the database at the given sqlite URL and
  /// ensure the schema exists.
  pub async fn connect(url: &str) -> Result<Self, StoreError> {
    let options = SqliteConnectOptions::from_str(url)
      .map_err(StoreError::from)?
      .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(4)
      .connect_with(options)
      .await?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    info!(url, "campaign store ready");
    Ok(Self { pool })
  }
}

fn record_from_row(row: &SqliteRow) -> Result<CampaignRecord, StoreError> {
  let status_raw: String = row.try_get("status")?;
  let status =
    CampaignStatus::from_str(&status_raw).map_err(StoreError::Transient)?;
  let flow_raw: String = row.try_get("flow_definition")?;
  let flow_definition = serde_json::from_str(&flow_raw)?;
  let created_at: DateTime<Utc> = row.try_get("created_at")?;
  let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

  Ok(CampaignRecord {
    id: row.try_get("id")?,
    name: row.try_get("name")?,
    status,
    flow_definition,
    created_at,
    updated_at,
  })
}

#[async_trait]
impl CampaignStore for SqliteStore {
  async fn get(&self, id: &str) -> Result<CampaignRecord, StoreError> {
    let row = sqlx::query(
      "SELECT id, name, status, flow_definition, created_at, updated_at
       FROM campaigns WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    record_from_row(&row)
  }

  async fn insert(&self, record: &CampaignRecord) -> Result<(), StoreError> {
    let flow = serde_json::to_string(&record.flow_definition)?;
    sqlx::query(
      "INSERT INTO campaigns (id, name, status, flow_definition, created_at, updated_at)
       VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.name)
    .bind(record.status.as_str())
    .bind(flow)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn update(&self, record: &CampaignRecord) -> Result<(), StoreError> {
    let flow = serde_json::to_string(&record.flow_definition)?;
    let result = sqlx::query(
      "UPDATE campaigns
       SET name = ?, status = ?, flow_definition = ?, updated_at = ?
       WHERE id = ?",
    )
    .bind(&record.name)
    .bind(record.status.as_str())
    .bind(flow)
    .bind(record.updated_at)
    .bind(&record.id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::NotFound(record.id.clone()));
    }
    Ok(())
  }

  async fn list(&self) -> Result<Vec<CampaignRecord>, StoreError> {
    let rows = sqlx::query(
      "SELECT id, name, status, flow_definition, created_at, updated_at
       FROM campaigns ORDER BY updated_at DESC",
    )
    .fetch_all(&self.pool)
    .await?;

    rows.iter().map(record_from_row).collect()
  }
}

//! SQLite store round-trip against a scratch database file.

use journey_graph::{CampaignGraph, CampaignNode, NodeKind, Position};
use journey_store::{CampaignStatus, PersistenceGateway, SqliteStore, StoreError};

async fn scratch_store() -> (SqliteStore, tempfile::TempDir) {
  let dir = tempfile::tempdir().expect("temp dir");
  let path = dir.path().join("journey.db");
  let url = format!("sqlite://{}", path.display());
  let store = SqliteStore::connect(&url).await.expect("connect");
  (store, dir)
}

fn small_graph() -> CampaignGraph {
  CampaignGraph {
    nodes: vec![
      CampaignNode::blank("segment-1", NodeKind::Segment, Position { x: 10.0, y: 20.0 }),
      CampaignNode::blank("channel-1", NodeKind::Channel, Position { x: 10.0, y: 140.0 }),
    ],
    edges: Vec::new(),
  }
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_the_document() {
  let (store, _dir) = scratch_store().await;
  let gateway = PersistenceGateway::new(store);
  let graph = small_graph();

  let outcome = gateway
    .save(
      None,
      &graph.nodes,
      &graph.edges,
      Some("Persisted"),
      CampaignStatus::Draft,
      None,
    )
    .await
    .expect("save");

  let record = gateway.load(&outcome.id).await.expect("load");
  assert_eq!(record.name, "Persisted");
  assert_eq!(record.flow_definition.to_graph(), graph);
  assert_eq!(record.status, CampaignStatus::Draft);
}

#[tokio::test]
async fn sqlite_update_bumps_updated_at_only() {
  let (store, _dir) = scratch_store().await;
  let gateway = PersistenceGateway::new(store);
  let graph = small_graph();

  let outcome = gateway
    .save(None, &graph.nodes, &graph.edges, None, CampaignStatus::Draft, None)
    .await
    .expect("create");
  let created = gateway.load(&outcome.id).await.expect("load");

  gateway
    .save(
      Some(&outcome.id),
      &graph.nodes,
      &graph.edges,
      None,
      CampaignStatus::Paused,
      None,
    )
    .await
    .expect("update");

  let updated = gateway.load(&outcome.id).await.expect("reload");
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);
  assert_eq!(updated.status, CampaignStatus::Paused);
}

#[tokio::test]
async fn sqlite_list_returns_every_saved_campaign() {
  let (store, _dir) = scratch_store().await;
  let gateway = PersistenceGateway::new(store);
  let graph = small_graph();

  let first = gateway
    .save(None, &graph.nodes, &graph.edges, Some("First"), CampaignStatus::Draft, None)
    .await
    .expect("save");
  let second = gateway
    .save(None, &graph.nodes, &graph.edges, Some("Second"), CampaignStatus::Draft, None)
    .await
    .expect("save");

  let records = gateway.list().await.expect("list");
  assert_eq!(records.len(), 2);
  let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
  assert!(ids.contains(&first.id.as_str()));
  assert!(ids.contains(&second.id.as_str()));
}

#[tokio::test]
async fn sqlite_missing_id_is_not_found() {
  let (store, _dir) = scratch_store().await;
  let result = PersistenceGateway::new(store).load("nope").await;
  assert!(matches!(result, Err(StoreError::NotFound(_))));
}

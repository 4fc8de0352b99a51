//! Gateway behavior over the in-memory store: create-vs-update routing,
//! metadata merge-preserve and the session contract.

use journey_graph::{
  ActionConfig, CampaignEdge, CampaignGraph, CampaignNode, ChannelConfig, ChannelKey, CompareOp,
  NodeConfig, NodeKind, OfferSelection, Position, ProductRef, SegmentConfig, SegmentCriteria,
  Tier, TriggerConfig, TriggerRule, UsageRule,
};
use journey_store::{
  CampaignStatus, CampaignStore, Catalog, Coupon, MemoryStore, Offer, PersistenceGateway,
  Product, StoreError, is_transient_id, transient_id,
};
use serde_json::{Map, json};
use uuid::Uuid;

fn demo_graph() -> CampaignGraph {
  let mut segment = CampaignNode::blank("segment-1", NodeKind::Segment, Position::default());
  segment.config = NodeConfig::Segment(SegmentConfig {
    criteria: Some(SegmentCriteria {
      tier: Some(Tier::Diamond),
      ..SegmentCriteria::default()
    }),
  });

  let mut trigger = CampaignNode::blank("trigger-1", NodeKind::Trigger, Position::default());
  trigger.config = NodeConfig::Trigger(TriggerConfig {
    rule: Some(TriggerRule::Data(UsageRule {
      operator: CompareOp::Gt,
      threshold: 900.0,
      unit: "MB".to_string(),
    })),
    window: None,
  });

  let mut action = CampaignNode::blank("action-1", NodeKind::Action, Position::default());
  action.config = NodeConfig::Action(ActionConfig {
    offer: Some(OfferSelection::Product(ProductRef {
      product_id: "p4".to_string(),
      product_name: "Weekend Data 5GB".to_string(),
      product_kind: "data".to_string(),
      price: 1500.0,
    })),
    ..ActionConfig::default()
  });

  let mut channel = CampaignNode::blank("channel-1", NodeKind::Channel, Position::default());
  channel.config = NodeConfig::Channel(ChannelConfig {
    selected_channels: vec![ChannelKey::Sms, ChannelKey::Email],
    ..ChannelConfig::default()
  });

  let edge = |id: &str, source: &str, target: &str| CampaignEdge {
    id: id.to_string(),
    source: source.to_string(),
    source_handle: None,
    target: target.to_string(),
  };

  CampaignGraph {
    nodes: vec![segment, trigger, action, channel],
    edges: vec![
      edge("e1", "segment-1", "trigger-1"),
      edge("e2", "trigger-1", "action-1"),
      edge("e3", "action-1", "channel-1"),
    ],
  }
}

#[tokio::test]
async fn save_then_load_roundtrip() {
  let gateway = PersistenceGateway::new(MemoryStore::new());
  let graph = demo_graph();

  let outcome = gateway
    .save(
      None,
      &graph.nodes,
      &graph.edges,
      Some("Diamond weekend push"),
      CampaignStatus::Draft,
      None,
    )
    .await
    .expect("save");

  assert!(outcome.created);
  assert!(Uuid::parse_str(&outcome.id).is_ok(), "durable id must be a uuid");

  let record = gateway.load(&outcome.id).await.expect("load");
  assert_eq!(record.name, "Diamond weekend push");
  assert_eq!(record.flow_definition.nodes.len(), 4);
  assert_eq!(record.flow_definition.edges.len(), 3);

  let channel = record
    .flow_definition
    .nodes
    .iter()
    .find(|n| n.kind() == NodeKind::Channel)
    .expect("channel node");
  match &channel.config {
    NodeConfig::Channel(c) => {
      assert_eq!(c.selected_channels, vec![ChannelKey::Sms, ChannelKey::Email]);
    }
    other => panic!("expected channel config, got {other:?}"),
  }
}

#[tokio::test]
async fn transient_id_routes_to_create() {
  let gateway = PersistenceGateway::new(MemoryStore::new());
  let graph = demo_graph();

  let placeholder = transient_id();
  assert!(is_transient_id(&placeholder));

  let outcome = gateway
    .save(
      Some(&placeholder),
      &graph.nodes,
      &graph.edges,
      None,
      CampaignStatus::Draft,
      None,
    )
    .await
    .expect("save");

  assert!(outcome.created);
  assert!(!is_transient_id(&outcome.id));
  let record = gateway.load(&outcome.id).await.expect("load");
  assert_eq!(record.name, "Untitled campaign");
}

#[tokio::test]
async fn update_merges_metadata_instead_of_clobbering() {
  let gateway = PersistenceGateway::new(MemoryStore::new());
  let graph = demo_graph();

  let mut initial = Map::new();
  initial.insert("demoRecipients".to_string(), json!(["+23480000001"]));
  initial.insert("owner".to_string(), json!("growth-team"));

  let outcome = gateway
    .save(
      None,
      &graph.nodes,
      &graph.edges,
      Some("Merge test"),
      CampaignStatus::Draft,
      Some(initial),
    )
    .await
    .expect("create");

  // Second save supplies only one metadata key; the other must survive.
  let mut aux = Map::new();
  aux.insert("demoRecipients".to_string(), json!(["+23480000002"]));

  let second = gateway
    .save(
      Some(&outcome.id),
      &graph.nodes,
      &graph.edges,
      None,
      CampaignStatus::Active,
      Some(aux),
    )
    .await
    .expect("update");
  assert!(!second.created);
  assert_eq!(second.id, outcome.id);

  let record = gateway.load(&outcome.id).await.expect("load");
  assert_eq!(record.status, CampaignStatus::Active);
  assert_eq!(record.name, "Merge test", "name must survive a nameless update");
  assert_eq!(
    record.flow_definition.metadata.get("owner"),
    Some(&json!("growth-team"))
  );
  assert_eq!(
    record.flow_definition.metadata.get("demoRecipients"),
    Some(&json!(["+23480000002"]))
  );
}

#[tokio::test]
async fn update_of_missing_campaign_is_not_found() {
  let gateway = PersistenceGateway::new(MemoryStore::new());
  let graph = demo_graph();

  let result = gateway
    .save(
      Some("2c0acd14-0000-0000-0000-000000000000"),
      &graph.nodes,
      &graph.edges,
      None,
      CampaignStatus::Draft,
      None,
    )
    .await;
  assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn signed_out_catalog_fails_closed_and_writes_surface() {
  let store = MemoryStore::with_catalog(
    vec![Product {
      id: "p4".to_string(),
      name: "Weekend Data 5GB".to_string(),
      product_kind: "data".to_string(),
      price: 1500.0,
    }],
    vec![Coupon {
      id: "c1".to_string(),
      name: "Welcome back".to_string(),
      value: 200.0,
    }],
    vec![Offer {
      id: "o1".to_string(),
      name: "Weekend bundle".to_string(),
      category: "data".to_string(),
      price: 1500.0,
      product_id: Some("p4".to_string()),
      coupon_id: None,
    }],
  );
  store.set_authenticated(false);

  // Reads fail closed with an empty list, not an error.
  assert!(store.list_products().await.expect("catalog read").is_empty());
  assert!(store.list_coupons().await.expect("catalog read").is_empty());
  assert!(store.list_offers().await.expect("catalog read").is_empty());
  // Campaign reads are session-gated and raise instead.
  assert!(matches!(
    store.list().await,
    Err(StoreError::NotAuthenticated)
  ));

  let gateway = PersistenceGateway::new(store);
  let graph = demo_graph();
  let result = gateway
    .save(
      None,
      &graph.nodes,
      &graph.edges,
      None,
      CampaignStatus::Draft,
      None,
    )
    .await;
  assert!(matches!(result, Err(StoreError::NotAuthenticated)));
}

//! Tests for the persisted node document shape and graph invariants.

use journey_graph::{
  ActionConfig, CampaignEdge, CampaignGraph, CampaignNode, ChannelConfig, ChannelContent,
  ChannelKey, CompareOp, GraphError, Icon, LogicConfig, NodeConfig, NodeKind, OfferSelection,
  Position, ProductRef, SegmentConfig, SegmentCriteria, Tier, TriggerConfig, TriggerRule,
  UsageRule, WaitConfig, WaitMode, Branch, BranchCondition, DurationUnit,
};
use serde_json::json;

fn segment_node(id: &str) -> CampaignNode {
  let mut node = CampaignNode::blank(id, NodeKind::Segment, Position { x: 100.0, y: 80.0 });
  node.config = NodeConfig::Segment(SegmentConfig {
    criteria: Some(SegmentCriteria {
      tier: Some(Tier::Diamond),
      city: Some("Lagos".to_string()),
      tags: vec!["high-value".to_string()],
      ..SegmentCriteria::default()
    }),
  });
  node.audience_size = Some(48_000);
  node
}

fn trigger_node(id: &str) -> CampaignNode {
  let mut node = CampaignNode::blank(id, NodeKind::Trigger, Position { x: 100.0, y: 200.0 });
  node.config = NodeConfig::Trigger(TriggerConfig {
    rule: Some(TriggerRule::Data(UsageRule {
      operator: CompareOp::Gt,
      threshold: 900.0,
      unit: "MB".to_string(),
    })),
    window: None,
  });
  node
}

fn action_node(id: &str) -> CampaignNode {
  let mut node = CampaignNode::blank(id, NodeKind::Action, Position { x: 100.0, y: 320.0 });
  node.config = NodeConfig::Action(ActionConfig {
    offer: Some(OfferSelection::Product(ProductRef {
      product_id: "p4".to_string(),
      product_name: "Weekend Data 5GB".to_string(),
      product_kind: "data".to_string(),
      price: 1500.0,
    })),
    ..ActionConfig::default()
  });
  node.sub_label = Some("data · 1500".to_string());
  node
}

fn channel_node(id: &str) -> CampaignNode {
  let mut node = CampaignNode::blank(id, NodeKind::Channel, Position { x: 100.0, y: 440.0 });
  let mut config = ChannelConfig {
    selected_channels: vec![ChannelKey::Sms, ChannelKey::Email],
    ..ChannelConfig::default()
  };
  config.channel_content.insert(
    ChannelKey::Sms,
    ChannelContent {
      text: Some("5GB for the weekend. Reply YES to grab it.".to_string()),
      ..ChannelContent::default()
    },
  );
  node.config = NodeConfig::Channel(config);
  node
}

fn edge(id: &str, source: &str, target: &str) -> CampaignEdge {
  CampaignEdge {
    id: id.to_string(),
    source: source.to_string(),
    source_handle: None,
    target: target.to_string(),
  }
}

fn sample_graph() -> CampaignGraph {
  CampaignGraph {
    nodes: vec![
      segment_node("segment-1"),
      trigger_node("trigger-1"),
      action_node("action-1"),
      channel_node("channel-1"),
    ],
    edges: vec![
      edge("e1", "segment-1", "trigger-1"),
      edge("e2", "trigger-1", "action-1"),
      edge("e3", "action-1", "channel-1"),
    ],
  }
}

#[test]
fn roundtrip_preserves_structure() {
  let graph = sample_graph();
  let json = serde_json::to_string(&graph).expect("serialize");
  let back: CampaignGraph = serde_json::from_str(&json).expect("deserialize");
  assert_eq!(graph, back);
}

#[test]
fn node_document_shape() {
  let node = trigger_node("trigger-1");
  let value = serde_json::to_value(&node).expect("serialize");

  assert_eq!(value["id"], "trigger-1");
  assert_eq!(value["kind"], "trigger");
  assert_eq!(value["position"]["y"], 200.0);
  assert_eq!(value["data"]["label"], "Trigger");
  assert_eq!(value["data"]["icon"], "zap");
  assert_eq!(value["data"]["category"], "data");
  assert_eq!(value["data"]["threshold"], 900.0);
  assert_eq!(value["data"]["unit"], "MB");
}

#[test]
fn non_string_icon_decodes_to_default() {
  let doc = json!({
    "id": "action-1",
    "kind": "action",
    "position": { "x": 0.0, "y": 0.0 },
    "data": {
      "label": "Offer",
      "icon": { "render": "GiftIcon", "size": 24 }
    }
  });

  let node: CampaignNode = serde_json::from_value(doc).expect("deserialize");
  assert_eq!(node.icon, Icon::Default);

  let out = serde_json::to_value(&node).expect("serialize");
  assert_eq!(out["data"]["icon"], "default");
}

#[test]
fn unknown_icon_key_decodes_to_default() {
  let doc = json!({
    "id": "n1",
    "kind": "wait",
    "position": { "x": 0.0, "y": 0.0 },
    "data": { "icon": "hourglass" }
  });

  let node: CampaignNode = serde_json::from_value(doc).expect("deserialize");
  assert_eq!(node.icon, Icon::Default);
}

#[test]
fn empty_data_yields_unconfigured_node() {
  let doc = json!({
    "id": "segment-9",
    "kind": "segment",
    "position": { "x": 40.0, "y": 40.0 },
    "data": {}
  });

  let node: CampaignNode = serde_json::from_value(doc).expect("deserialize");
  assert_eq!(node.kind(), NodeKind::Segment);
  assert!(node.is_unconfigured());
  // Label falls back to the kind default.
  assert_eq!(node.label, "Audience segment");
}

#[test]
fn wait_mode_roundtrips_through_wait_type_tag() {
  let mut node = CampaignNode::blank("wait-1", NodeKind::Wait, Position::default());
  node.config = NodeConfig::Wait(WaitConfig {
    mode: Some(WaitMode::Duration {
      value: 2,
      unit: DurationUnit::Days,
    }),
    window: None,
  });

  let value = serde_json::to_value(&node).expect("serialize");
  assert_eq!(value["data"]["waitType"], "duration");
  assert_eq!(value["data"]["value"], 2);

  let back: CampaignNode = serde_json::from_value(value).expect("deserialize");
  assert_eq!(node, back);
}

#[test]
fn logic_unconfigured_flips_after_first_branch() {
  let mut node = CampaignNode::blank("logic-1", NodeKind::Logic, Position::default());
  assert!(node.is_unconfigured());

  node.config = NodeConfig::Logic(LogicConfig {
    branches: vec![Branch {
      label: "High ARPU".to_string(),
      conditions: vec![BranchCondition {
        field: "arpu".to_string(),
        operator: CompareOp::Gte,
        value: "5000".to_string(),
      }],
    }],
  });
  assert!(!node.is_unconfigured());
}

#[test]
fn channel_node_is_never_unconfigured() {
  let node = CampaignNode::blank("channel-9", NodeKind::Channel, Position::default());
  assert!(!node.is_unconfigured());
}

#[test]
fn validate_rejects_dangling_edges() {
  let mut graph = sample_graph();
  graph.edges.push(edge("e4", "channel-1", "ghost"));

  match graph.validate() {
    Err(GraphError::DanglingEdge { edge_id, node_id }) => {
      assert_eq!(edge_id, "e4");
      assert_eq!(node_id, "ghost");
    }
    other => panic!("expected dangling edge error, got {:?}", other),
  }
}

#[test]
fn validate_rejects_duplicate_node_ids() {
  let mut graph = sample_graph();
  graph.nodes.push(segment_node("segment-1"));
  assert!(matches!(
    graph.validate(),
    Err(GraphError::DuplicateNodeId(id)) if id == "segment-1"
  ));
}

#[test]
fn channel_selection_roundtrips_in_order() {
  let node = channel_node("channel-1");
  let value = serde_json::to_value(&node).expect("serialize");
  assert_eq!(value["data"]["selectedChannels"], json!(["sms", "email"]));

  let back: CampaignNode = serde_json::from_value(value).expect("deserialize");
  match back.config {
    NodeConfig::Channel(c) => {
      assert_eq!(c.selected_channels, vec![ChannelKey::Sms, ChannelKey::Email]);
      assert!(c.channel_content.contains_key(&ChannelKey::Sms));
    }
    other => panic!("expected channel config, got {:?}", other),
  }
}

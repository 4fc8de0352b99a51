//! Persisted node document format.
//!
//! Stored campaigns keep each node as `{id, kind, position, data}` where
//! `data` folds the display fields (`label`, `subLabel`, `icon`,
//! `audienceSize`) together with the kind-specific configuration fields.
//! The in-memory model keeps those apart, so [`CampaignNode`] round-trips
//! through this wire struct via `serde(try_from/into)`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{ActionConfig, NodeConfig, OfferSelection, TriggerConfig, WaitConfig};
use crate::enums::NodeKind;
use crate::error::GraphError;
use crate::node::{CampaignNode, Icon, Position, default_label};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeWire {
  pub id: String,
  pub kind: NodeKind,
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub data: Value,
}

impl From<CampaignNode> for NodeWire {
  fn from(node: CampaignNode) -> Self {
    let mut data = Map::new();
    data.insert("label".to_string(), Value::String(node.label));
    if let Some(sub) = node.sub_label {
      data.insert("subLabel".to_string(), Value::String(sub));
    }
    // Always a primitive string key, never a renderable value.
    data.insert(
      "icon".to_string(),
      Value::String(node.icon.key().to_string()),
    );
    if let Some(size) = node.audience_size {
      data.insert("audienceSize".to_string(), Value::from(size));
    }

    let kind = node.config.kind();
    for (key, value) in config_fields(&node.config) {
      data.insert(key, value);
    }

    NodeWire {
      id: node.id,
      kind,
      position: node.position,
      data: Value::Object(data),
    }
  }
}

impl TryFrom<NodeWire> for CampaignNode {
  type Error = GraphError;

  fn try_from(wire: NodeWire) -> Result<Self, GraphError> {
    let mut data = match wire.data {
      Value::Object(map) => map,
      Value::Null => Map::new(),
      _ => {
        return Err(GraphError::InvalidNode {
          id: wire.id,
          message: "node data must be an object".to_string(),
        });
      }
    };

    let label = data
      .remove("label")
      .and_then(|v| v.as_str().map(str::to_string))
      .unwrap_or_else(|| default_label(wire.kind).to_string());
    let sub_label = data
      .remove("subLabel")
      .and_then(|v| v.as_str().map(str::to_string));
    let icon = data
      .remove("icon")
      .map(|v| Icon::from_value(&v))
      .unwrap_or_else(|| Icon::for_kind(wire.kind));
    let audience_size = data.remove("audienceSize").and_then(|v| v.as_u64());

    let config = match wire.kind {
      NodeKind::Trigger => NodeConfig::Trigger(parse_trigger(&wire.id, data)?),
      NodeKind::Segment => NodeConfig::Segment(parse_config(&wire.id, Value::Object(data))?),
      NodeKind::Action => NodeConfig::Action(parse_action(&wire.id, data)?),
      NodeKind::Channel => NodeConfig::Channel(parse_config(&wire.id, Value::Object(data))?),
      NodeKind::Logic => NodeConfig::Logic(parse_config(&wire.id, Value::Object(data))?),
      NodeKind::Wait => NodeConfig::Wait(parse_wait(&wire.id, data)?),
    };

    Ok(CampaignNode {
      id: wire.id,
      position: wire.position,
      label,
      sub_label,
      icon,
      audience_size,
      config,
    })
  }
}

fn config_fields(config: &NodeConfig) -> Map<String, Value> {
  let value = match config {
    NodeConfig::Trigger(c) => serde_json::to_value(c),
    NodeConfig::Segment(c) => serde_json::to_value(c),
    NodeConfig::Action(c) => serde_json::to_value(c),
    NodeConfig::Channel(c) => serde_json::to_value(c),
    NodeConfig::Logic(c) => serde_json::to_value(c),
    NodeConfig::Wait(c) => serde_json::to_value(c),
  };
  match value {
    Ok(Value::Object(map)) => map,
    _ => Map::new(),
  }
}

fn parse_config<T: DeserializeOwned>(id: &str, data: Value) -> Result<T, GraphError> {
  serde_json::from_value(data).map_err(|e| GraphError::InvalidNode {
    id: id.to_string(),
    message: e.to_string(),
  })
}

fn take_field<T: DeserializeOwned>(
  id: &str,
  data: &mut Map<String, Value>,
  key: &str,
) -> Result<Option<T>, GraphError> {
  match data.remove(key) {
    None | Some(Value::Null) => Ok(None),
    Some(value) => parse_config(id, value).map(Some),
  }
}

// The flattened enums in trigger/action/wait configs are optional: a node
// straight off the palette has none of their fields. Presence is decided by
// the discriminating key so an empty `data` object parses as unconfigured.

fn parse_trigger(id: &str, mut data: Map<String, Value>) -> Result<TriggerConfig, GraphError> {
  let window = take_field(id, &mut data, "window")?;
  let rule = if data.contains_key("category") {
    Some(parse_config(id, Value::Object(data))?)
  } else {
    None
  };
  Ok(TriggerConfig { rule, window })
}

fn parse_action(id: &str, mut data: Map<String, Value>) -> Result<ActionConfig, GraphError> {
  let action_type = take_field(id, &mut data, "actionType")?.unwrap_or_default();
  let offer_category = take_field(id, &mut data, "offerCategory")?;
  let message = take_field(id, &mut data, "message")?;
  let landing_url = take_field(id, &mut data, "landingUrl")?;

  let offer = if data.contains_key("productId") {
    Some(OfferSelection::Product(parse_config(
      id,
      Value::Object(data),
    )?))
  } else if data.contains_key("couponId") {
    Some(OfferSelection::Coupon(parse_config(
      id,
      Value::Object(data),
    )?))
  } else {
    None
  };

  Ok(ActionConfig {
    action_type,
    offer_category,
    offer,
    message,
    landing_url,
  })
}

fn parse_wait(id: &str, mut data: Map<String, Value>) -> Result<WaitConfig, GraphError> {
  let window = take_field(id, &mut data, "window")?;
  let mode = if data.contains_key("waitType") {
    Some(parse_config(id, Value::Object(data))?)
  } else {
    None
  };
  Ok(WaitConfig { mode, window })
}

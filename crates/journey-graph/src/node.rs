use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::enums::NodeKind;
use crate::wire::NodeWire;

/// Canvas coordinate of a node. Layout only, no behavioral meaning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

/// Closed icon vocabulary for persisted nodes.
///
/// Icons always serialize as their string key. A document carrying anything
/// else in the icon slot (an object, a number, an unknown key) decodes to
/// [`Icon::Default`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
  Zap,
  Users,
  Gift,
  Send,
  GitBranch,
  Clock,
  Wifi,
  MapPin,
  Smartphone,
  Default,
}

impl Default for Icon {
  fn default() -> Self {
    Icon::Default
  }
}

impl Icon {
  pub fn key(&self) -> &'static str {
    match self {
      Icon::Zap => "zap",
      Icon::Users => "users",
      Icon::Gift => "gift",
      Icon::Send => "send",
      Icon::GitBranch => "git-branch",
      Icon::Clock => "clock",
      Icon::Wifi => "wifi",
      Icon::MapPin => "map-pin",
      Icon::Smartphone => "smartphone",
      Icon::Default => "default",
    }
  }

  /// The icon a freshly added node of the given kind gets.
  pub fn for_kind(kind: NodeKind) -> Self {
    match kind {
      NodeKind::Trigger => Icon::Zap,
      NodeKind::Segment => Icon::Users,
      NodeKind::Action => Icon::Gift,
      NodeKind::Channel => Icon::Send,
      NodeKind::Logic => Icon::GitBranch,
      NodeKind::Wait => Icon::Clock,
    }
  }

  /// Decode an icon slot from an arbitrary JSON value, substituting
  /// [`Icon::Default`] for anything that is not a known string key.
  pub fn from_value(value: &serde_json::Value) -> Self {
    serde_json::from_value(value.clone()).unwrap_or_default()
  }
}

/// One step in a campaign graph.
///
/// `label`, `sub_label` and `audience_size` are display caches recomputed by
/// other components (the canvas controller, the audience estimator). They are
/// never sources of truth and may be invalidated at any time; the
/// configuration payload is the authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeWire", into = "NodeWire")]
pub struct CampaignNode {
  pub id: String,
  pub position: Position,
  pub label: String,
  pub sub_label: Option<String>,
  pub icon: Icon,
  pub audience_size: Option<u64>,
  pub config: NodeConfig,
}

impl CampaignNode {
  /// Create a node with the empty configuration and display defaults for a kind.
  pub fn blank(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
    Self {
      id: id.into(),
      position,
      label: default_label(kind).to_string(),
      sub_label: None,
      icon: Icon::for_kind(kind),
      audience_size: None,
      config: NodeConfig::empty(kind),
    }
  }

  pub fn kind(&self) -> NodeKind {
    self.config.kind()
  }

  /// Whether the node is still missing the mandatory configuration for its
  /// kind. Channel nodes are never flagged: they carry implicit defaults.
  pub fn is_unconfigured(&self) -> bool {
    match &self.config {
      NodeConfig::Trigger(c) => c.rule.is_none(),
      NodeConfig::Segment(c) => c.criteria.is_none(),
      NodeConfig::Action(c) => {
        c.offer.is_none() && c.landing_url.is_none() && c.message.is_none()
      }
      NodeConfig::Channel(_) => false,
      NodeConfig::Logic(c) => c.branches.is_empty(),
      NodeConfig::Wait(c) => c.mode.is_none(),
    }
  }
}

/// Default display label for a freshly added node.
pub fn default_label(kind: NodeKind) -> &'static str {
  match kind {
    NodeKind::Trigger => "Trigger",
    NodeKind::Segment => "Audience segment",
    NodeKind::Action => "Offer",
    NodeKind::Channel => "Channels",
    NodeKind::Logic => "Branch",
    NodeKind::Wait => "Wait",
  }
}

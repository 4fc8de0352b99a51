use std::collections::HashMap;

use journey_audience::{EstimateTracker, EstimateUpdate};
use journey_graph::{
  Branch, CampaignEdge, CampaignGraph, CampaignNode, ChannelContent, ChannelKey, DailyWindow,
  NodeConfig, NodeKind, OfferSelection, Position, ScheduleWindow, SegmentCriteria, TriggerRule,
  WaitMode,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::CanvasError;
use crate::palette::PaletteMenu;

/// A targeted update to one node's configuration.
///
/// The source UI sent loosely-shaped partial objects; here every patch names
/// the kind it applies to, so applying a trigger patch to a wait node is a
/// visible no-op instead of a silently ignored field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigPatch {
  TriggerRule(TriggerRule),
  TriggerWindow(Option<ScheduleWindow>),
  SegmentCriteria(SegmentCriteria),
  ActionType(journey_graph::ActionType),
  OfferCategory(String),
  ActionOffer(OfferSelection),
  ActionMessage(String),
  LandingUrl(String),
  Channels(Vec<ChannelKey>),
  ChannelContent(ChannelKey, ChannelContent),
  LogicBranches(Vec<Branch>),
  WaitMode(WaitMode),
  WaitWindow(Option<DailyWindow>),
}

/// Owns the live campaign graph and all canvas-side state.
#[derive(Debug, Default)]
pub struct CanvasState {
  graph: CampaignGraph,
  selection: Option<String>,
  active_channel_tab: Option<ChannelKey>,
  palette: PaletteMenu,
  estimate_trackers: HashMap<String, EstimateTracker>,
}

impl CanvasState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start editing a previously loaded graph.
  pub fn from_graph(graph: CampaignGraph) -> Self {
    Self {
      graph,
      ..Self::default()
    }
  }

  pub fn graph(&self) -> &CampaignGraph {
    &self.graph
  }

  pub fn into_graph(self) -> CampaignGraph {
    self.graph
  }

  pub fn selection(&self) -> Option<&str> {
    self.selection.as_deref()
  }

  pub fn active_channel_tab(&self) -> Option<ChannelKey> {
    self.active_channel_tab
  }

  pub fn palette(&mut self) -> &mut PaletteMenu {
    &mut self.palette
  }

  /// Append a node of the given kind with its empty configuration.
  /// Returns the new node's id.
  pub fn add_node(&mut self, kind: NodeKind) -> String {
    let id = format!("{kind}-{}", Uuid::new_v4());
    let count = self.graph.nodes.len() as f64;
    let position = Position {
      x: 160.0 + (count % 3.0) * 60.0,
      y: 120.0 + count * 90.0,
    };
    self
      .graph
      .nodes
      .push(CampaignNode::blank(id.clone(), kind, position));
    debug!(node_id = %id, %kind, "node added");
    id
  }

  /// Apply a configuration patch plus its kind-specific side effects.
  ///
  /// Returns `false` (and changes nothing) when the node id is unknown or the
  /// patch targets a different kind.
  pub fn update_node_config(&mut self, node_id: &str, patch: ConfigPatch) -> bool {
    let Some(node) = self.graph.node_mut(node_id) else {
      debug!(node_id, "config update for unknown node ignored");
      return false;
    };

    match (&mut node.config, patch) {
      (NodeConfig::Trigger(config), ConfigPatch::TriggerRule(rule)) => {
        config.rule = Some(rule);
      }
      (NodeConfig::Trigger(config), ConfigPatch::TriggerWindow(window)) => {
        config.window = window;
      }
      (NodeConfig::Segment(config), ConfigPatch::SegmentCriteria(criteria)) => {
        config.criteria = Some(criteria);
        // The cached count no longer matches the criteria.
        node.audience_size = None;
      }
      (NodeConfig::Action(config), ConfigPatch::ActionType(action_type)) => {
        config.action_type = action_type;
      }
      (NodeConfig::Action(config), ConfigPatch::OfferCategory(category)) => {
        config.offer_category = Some(category);
      }
      (NodeConfig::Action(config), ConfigPatch::ActionOffer(offer)) => {
        // Replacing the selection drops whichever of product/coupon was set
        // before; the sum type cannot hold both.
        node.sub_label = Some(match &offer {
          OfferSelection::Product(p) => format!("{} · {}", p.product_kind, p.price),
          OfferSelection::Coupon(c) => format!("Coupon · {}", c.value),
        });
        config.offer = Some(offer);
      }
      (NodeConfig::Action(config), ConfigPatch::ActionMessage(message)) => {
        config.message = Some(message);
      }
      (NodeConfig::Action(config), ConfigPatch::LandingUrl(url)) => {
        config.landing_url = Some(url);
      }
      (NodeConfig::Channel(config), ConfigPatch::Channels(selected)) => {
        config
          .channel_content
          .retain(|key, _| selected.contains(key));
        config.selected_channels = selected;
        if self.selection.as_deref() == Some(node_id) {
          let still_active = self
            .active_channel_tab
            .is_some_and(|tab| config.selected_channels.contains(&tab));
          if !still_active {
            self.active_channel_tab = config.selected_channels.first().copied();
          }
        }
      }
      (NodeConfig::Channel(config), ConfigPatch::ChannelContent(key, content)) => {
        if !config.selected_channels.contains(&key) {
          debug!(node_id, channel = ?key, "content for unselected channel ignored");
          return false;
        }
        config.channel_content.insert(key, content);
      }
      (NodeConfig::Logic(config), ConfigPatch::LogicBranches(branches)) => {
        config.branches = branches;
      }
      (NodeConfig::Wait(config), ConfigPatch::WaitMode(mode)) => {
        config.mode = Some(mode);
      }
      (NodeConfig::Wait(config), ConfigPatch::WaitWindow(window)) => {
        config.window = window;
      }
      (config, patch) => {
        debug!(
          node_id,
          kind = %config.kind(),
          ?patch,
          "config patch does not match node kind, ignored"
        );
        return false;
      }
    }

    true
  }

  /// Remove a node, cascade-prune every edge touching it and clear the
  /// selection if it pointed at the deleted node.
  pub fn delete_node(&mut self, node_id: &str) -> bool {
    let before = self.graph.nodes.len();
    self.graph.nodes.retain(|n| n.id != node_id);
    if self.graph.nodes.len() == before {
      return false;
    }

    self
      .graph
      .edges
      .retain(|e| e.source != node_id && e.target != node_id);
    if self.selection.as_deref() == Some(node_id) {
      self.selection = None;
      self.active_channel_tab = None;
    }
    self.estimate_trackers.remove(node_id);
    debug!(node_id, "node deleted with cascading edges");
    true
  }

  /// Connect two existing nodes. Logic sources must name a `"true"` or
  /// `"false"` handle; an identical source/target/handle triple is rejected.
  pub fn connect(
    &mut self,
    source: &str,
    target: &str,
    source_handle: Option<&str>,
  ) -> Result<String, CanvasError> {
    let source_kind = self
      .graph
      .node(source)
      .map(CampaignNode::kind)
      .ok_or_else(|| CanvasError::UnknownNode(source.to_string()))?;
    if !self.graph.contains_node(target) {
      return Err(CanvasError::UnknownNode(target.to_string()));
    }

    if source_kind == NodeKind::Logic && !matches!(source_handle, Some("true") | Some("false")) {
      return Err(CanvasError::InvalidHandle {
        node_id: source.to_string(),
        handle: source_handle.map(str::to_string),
      });
    }

    let duplicate = self.graph.edges.iter().any(|e| {
      e.source == source && e.target == target && e.source_handle.as_deref() == source_handle
    });
    if duplicate {
      return Err(CanvasError::DuplicateEdge {
        source_id: source.to_string(),
        target: target.to_string(),
      });
    }

    let id = format!("edge-{}", Uuid::new_v4());
    self.graph.edges.push(CampaignEdge {
      id: id.clone(),
      source: source.to_string(),
      source_handle: source_handle.map(str::to_string),
      target: target.to_string(),
    });
    Ok(id)
  }

  /// Set the single active selection. Selecting a channel node resets the
  /// content tab to its first selected channel. Unknown ids leave the
  /// selection untouched.
  pub fn select(&mut self, node_id: Option<&str>) -> bool {
    match node_id {
      None => {
        self.selection = None;
        self.active_channel_tab = None;
        true
      }
      Some(id) => {
        let Some(node) = self.graph.node(id) else {
          return false;
        };
        self.active_channel_tab = match &node.config {
          NodeConfig::Channel(c) => c.selected_channels.first().copied(),
          _ => None,
        };
        self.selection = Some(id.to_string());
        true
      }
    }
  }

  /// Write a resolved audience estimate onto a segment node.
  ///
  /// Stale sequence numbers are discarded, so an older in-flight response
  /// can never overwrite a newer count.
  pub fn apply_estimate(&mut self, node_id: &str, update: EstimateUpdate) -> bool {
    let Some(node) = self.graph.node_mut(node_id) else {
      return false;
    };
    if node.kind() != NodeKind::Segment {
      return false;
    }

    let tracker = self
      .estimate_trackers
      .entry(node_id.to_string())
      .or_default();
    if !tracker.accept(update.seq) {
      debug!(node_id, seq = update.seq, "stale audience estimate discarded");
      return false;
    }

    node.audience_size = update.count;
    true
  }
}

use journey_graph::{CampaignGraph, ChannelKey, NodeConfig, NodeKind, OfferSelection};

use crate::error::SimError;

/// Everything a run needs, resolved once from a graph snapshot before any
/// recipient task starts.
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
  pub segment_id: String,
  pub action_id: String,
  pub offer: OfferSelection,
  /// First selected channel of the first channel node, if any.
  pub channel: Option<ChannelKey>,
  /// Message text sent to every recipient.
  pub message: String,
}

impl ResolvedPlan {
  pub fn resolve(graph: &CampaignGraph) -> Result<Self, SimError> {
    let segment = graph
      .first_of_kind(NodeKind::Segment)
      .ok_or(SimError::MissingSegment)?;

    let (action_id, offer) = graph
      .nodes
      .iter()
      .find_map(|node| match &node.config {
        NodeConfig::Action(config) => {
          config.offer.clone().map(|offer| (node.id.clone(), offer))
        }
        _ => None,
      })
      .ok_or(SimError::MissingOffer)?;

    let mut channel = None;
    let mut message = None;
    if let Some(node) = graph.first_of_kind(NodeKind::Channel) {
      if let NodeConfig::Channel(config) = &node.config {
        channel = config.selected_channels.first().copied();
        message = channel
          .and_then(|key| config.channel_content.get(&key))
          .and_then(|content| content.text.clone());
      }
    }
    let message = message.unwrap_or_else(|| {
      format!("Don't miss out: {} is waiting for you.", offer.display_name())
    });

    Ok(Self {
      segment_id: segment.id.clone(),
      action_id,
      offer,
      channel,
      message,
    })
  }

  /// Human-readable channel label for event messages.
  pub fn channel_label(&self) -> &'static str {
    self.channel.map(|key| key.display_name()).unwrap_or("default channel")
  }
}

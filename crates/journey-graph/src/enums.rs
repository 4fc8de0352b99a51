use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of campaign node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  Trigger,
  Segment,
  Action,
  Channel,
  Logic,
  Wait,
}

impl NodeKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      NodeKind::Trigger => "trigger",
      NodeKind::Segment => "segment",
      NodeKind::Action => "action",
      NodeKind::Channel => "channel",
      NodeKind::Logic => "logic",
      NodeKind::Wait => "wait",
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Delivery channels a channel node can activate.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKey {
  Sms,
  Email,
  Chatbox,
  Ussd,
  Push,
  Facebook,
  Instagram,
  Linkedin,
}

impl ChannelKey {
  pub fn display_name(&self) -> &'static str {
    match self {
      ChannelKey::Sms => "SMS",
      ChannelKey::Email => "Email",
      ChannelKey::Chatbox => "Chatbox",
      ChannelKey::Ussd => "USSD",
      ChannelKey::Push => "Push Notification",
      ChannelKey::Facebook => "Facebook",
      ChannelKey::Instagram => "Instagram",
      ChannelKey::Linkedin => "LinkedIn",
    }
  }
}

/// Comparison operator shared by trigger rules, activity filters and
/// logic branch conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
  Gt,
  Gte,
  Lt,
  Lte,
  Eq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
  Marketing,
  Info,
}

impl Default for ActionType {
  fn default() -> Self {
    ActionType::Marketing
  }
}

/// Subscriber loyalty tier used in segment criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  Standard,
  Silver,
  Gold,
  Platinum,
  Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
  Male,
  Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimType {
  Prepaid,
  Postpaid,
}

/// Subscriber activity a segment can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  Topup,
  Data,
  Voice,
  Login,
}

/// Cadence of a trigger schedule window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
  Daily,
  Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
  Minutes,
  Hours,
  Days,
}

//! Per-kind node configuration payloads.
//!
//! Each node kind carries a fixed configuration schema. Readers discriminate
//! on the [`NodeConfig`] variant before touching kind-specific fields, so a
//! trigger threshold simply does not exist on a segment node.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::enums::{
  ActionType, ActivityKind, Cadence, ChannelKey, CompareOp, DurationUnit, Gender, NodeKind,
  SimType, Tier,
};

/// Kind-discriminated configuration payload of a campaign node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
  Trigger(TriggerConfig),
  Segment(SegmentConfig),
  Action(ActionConfig),
  Channel(ChannelConfig),
  Logic(LogicConfig),
  Wait(WaitConfig),
}

impl NodeConfig {
  pub fn kind(&self) -> NodeKind {
    match self {
      NodeConfig::Trigger(_) => NodeKind::Trigger,
      NodeConfig::Segment(_) => NodeKind::Segment,
      NodeConfig::Action(_) => NodeKind::Action,
      NodeConfig::Channel(_) => NodeKind::Channel,
      NodeConfig::Logic(_) => NodeKind::Logic,
      NodeConfig::Wait(_) => NodeKind::Wait,
    }
  }

  /// The empty configuration a freshly added node of the given kind starts with.
  pub fn empty(kind: NodeKind) -> Self {
    match kind {
      NodeKind::Trigger => NodeConfig::Trigger(TriggerConfig::default()),
      NodeKind::Segment => NodeConfig::Segment(SegmentConfig::default()),
      NodeKind::Action => NodeConfig::Action(ActionConfig::default()),
      NodeKind::Channel => NodeConfig::Channel(ChannelConfig::default()),
      NodeKind::Logic => NodeConfig::Logic(LogicConfig::default()),
      NodeKind::Wait => NodeConfig::Wait(WaitConfig::default()),
    }
  }
}

// ---------------------------------------------------------------------------
// Trigger

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerConfig {
  /// What fires the trigger. `None` means the node is not configured yet.
  #[serde(flatten)]
  pub rule: Option<TriggerRule>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub window: Option<ScheduleWindow>,
}

/// Trigger rule, discriminated by its `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum TriggerRule {
  Topup(UsageRule),
  Data(UsageRule),
  Voice(UsageRule),
  Location(LocationRule),
  App(AppRule),
  Schedule,
}

/// Numeric usage rule shared by the topup/data/voice categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRule {
  pub operator: CompareOp,
  pub threshold: f64,
  pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRule {
  pub name: String,
  pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRule {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
}

/// Date range plus an optional daily/weekly time-of-day window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleWindow {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_date: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cadence: Option<Cadence>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from: Option<NaiveTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to: Option<NaiveTime>,
}

// ---------------------------------------------------------------------------
// Segment

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub criteria: Option<SegmentCriteria>,
}

/// Structured audience filter of a segment node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentCriteria {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tier: Option<Tier>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gender: Option<Gender>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sim_type: Option<SimType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub age: Option<AgeRange>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub activity: Option<ActivityFilter>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub arpu: Option<NumericRange>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub balance: Option<NumericRange>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgeRange {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min: Option<u8>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumericRange {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFilter {
  pub kind: ActivityKind,
  pub operator: CompareOp,
  pub value: f64,
}

// ---------------------------------------------------------------------------
// Action

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionConfig {
  pub action_type: ActionType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub offer_category: Option<String>,
  /// Exactly one of product/coupon; the sum type makes the mutual exclusion
  /// structural rather than a pair of nullable id fields.
  #[serde(flatten)]
  pub offer: Option<OfferSelection>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub landing_url: Option<String>,
}

/// The marketed thing an action node attaches: a catalog product or a coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OfferSelection {
  Product(ProductRef),
  Coupon(CouponRef),
}

impl OfferSelection {
  pub fn id(&self) -> &str {
    match self {
      OfferSelection::Product(p) => &p.product_id,
      OfferSelection::Coupon(c) => &c.coupon_id,
    }
  }

  pub fn display_name(&self) -> &str {
    match self {
      OfferSelection::Product(p) => &p.product_name,
      OfferSelection::Coupon(c) => &c.coupon_name,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
  pub product_id: String,
  pub product_name: String,
  pub product_kind: String,
  pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRef {
  pub coupon_id: String,
  pub coupon_name: String,
  pub value: f64,
}

// ---------------------------------------------------------------------------
// Channel

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelConfig {
  /// Channels the send goes out on, in selection order.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub selected_channels: Vec<ChannelKey>,
  /// One content block per selected channel.
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub channel_content: BTreeMap<ChannelKey, ChannelContent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelContent {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub action_label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub action_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Logic

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogicConfig {
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
  pub label: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub conditions: Vec<BranchCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCondition {
  pub field: String,
  pub operator: CompareOp,
  pub value: String,
}

// ---------------------------------------------------------------------------
// Wait

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitConfig {
  #[serde(flatten)]
  pub mode: Option<WaitMode>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub window: Option<DailyWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "waitType", rename_all = "snake_case")]
pub enum WaitMode {
  Duration { value: u32, unit: DurationUnit },
  Date { date: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWindow {
  pub from: NaiveTime,
  pub to: NaiveTime,
}

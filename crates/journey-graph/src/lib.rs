//! Journey Graph
//!
//! This crate contains the campaign graph data model for the journey builder:
//! the closed set of node kinds, the per-kind configuration payloads, edges,
//! and the persisted document format.
//!
//! A campaign graph can be loaded from:
//! - JSON files (via the CLI)
//! - The campaign document store (as the `flow_definition` blob)
//!
//! The canvas controller mutates these types in memory; the persistence
//! gateway and the simulation engine only ever see them through this crate's
//! contracts.

mod config;
mod edge;
mod enums;
mod error;
mod graph;
mod node;
mod wire;

pub use config::{
  ActionConfig, ActivityFilter, AgeRange, AppRule, Branch, BranchCondition, ChannelConfig,
  ChannelContent, CouponRef, DailyWindow, LocationRule, LogicConfig, NodeConfig, NumericRange,
  OfferSelection, ProductRef, ScheduleWindow, SegmentConfig, SegmentCriteria, TriggerConfig,
  TriggerRule, UsageRule, WaitConfig, WaitMode,
};
pub use edge::CampaignEdge;
pub use enums::{
  ActionType, ActivityKind, Cadence, ChannelKey, CompareOp, DurationUnit, Gender, NodeKind,
  SimType, Tier,
};
pub use error::GraphError;
pub use graph::CampaignGraph;
pub use node::{CampaignNode, Icon, Position, default_label};

//! Journey Sim
//!
//! Drives a simulated multi-recipient campaign run: resolves the audience
//! segment, the offer and the channel content from a campaign graph, then
//! walks one cooperative state machine per recipient
//! (`queued -> sending -> sent -> clicked -> converted`, with `failed`
//! reachable from `sending` or `sent`), emitting a progress event on every
//! transition.
//!
//! Recipients run as independent tokio tasks joined at the end; one
//! recipient's failure never blocks another's progress. The campaign must be
//! durably saved before a run starts — [`SimulationEngine::ensure_saved`]
//! performs the save transparently and aborts the run on failure without
//! emitting a single per-recipient event.

mod engine;
mod error;
mod events;
mod plan;

pub use engine::{RunReport, SimulationConfig, SimulationEngine};
pub use error::SimError;
pub use events::{ChannelNotifier, NoopNotifier, RunEvent, RunNotifier, RunStage};
pub use plan::ResolvedPlan;

use serde_json::{Map, Value};

/// Read the demo recipient list from a campaign's open metadata map.
///
/// The canvas stores it under `demoRecipients`; the metadata merge in the
/// persistence gateway keeps it alive across saves.
pub fn demo_recipients(metadata: &Map<String, Value>) -> Option<Vec<String>> {
  metadata.get("demoRecipients")?.as_array().map(|entries| {
    entries
      .iter()
      .filter_map(|v| v.as_str().map(str::to_string))
      .collect()
  })
}

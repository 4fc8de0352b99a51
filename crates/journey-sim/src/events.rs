//! Run events and notifiers.
//!
//! Events are emitted on every per-recipient stage transition so consumers
//! can observe progress, stream to a UI, or record outcomes. Events from
//! distinct recipients interleave in completion order; consumers must not
//! assume cross-recipient ordering.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Lifecycle stage of one simulated recipient.
///
/// Stages occur in the listed order within a recipient, no stage is skipped
/// and none repeats. `Failed` is reachable from `Sending` or `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
  Queued,
  Sending,
  Sent,
  Clicked,
  Converted,
  Failed,
}

impl RunStage {
  pub fn is_terminal(&self) -> bool {
    matches!(self, RunStage::Converted | RunStage::Failed)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      RunStage::Queued => "queued",
      RunStage::Sending => "sending",
      RunStage::Sent => "sent",
      RunStage::Clicked => "clicked",
      RunStage::Converted => "converted",
      RunStage::Failed => "failed",
    }
  }
}

/// One progress event of a simulated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
  pub recipient: String,
  pub stage: RunStage,
  pub message: String,
}

/// Trait for receiving run events.
///
/// The engine calls `notify` for each stage transition - implementations
/// decide what to do with them (stream, record, log, ignore).
pub trait RunNotifier: Send + Sync {
  fn notify(&self, event: RunEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl RunNotifier for NoopNotifier {
  fn notify(&self, _event: RunEvent) {
    // Intentionally empty
  }
}

/// A notifier that sends events to an unbounded channel.
///
/// Unbounded so a slow consumer never blocks the engine; the volume is a
/// handful of events per recipient, so memory growth is not a concern.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<RunEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with its receiving end.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self { sender }, receiver)
  }
}

impl RunNotifier for ChannelNotifier {
  fn notify(&self, event: RunEvent) {
    // Ignore send errors - the consumer may have navigated away.
    let _ = self.sender.send(event);
  }
}

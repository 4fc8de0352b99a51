//! The simulated run engine.
//!
//! One tokio task per recipient, coordinated by a fan-out/fan-in join. Tasks
//! share nothing but the notifier sink; cancellation stops further events for
//! in-flight recipients without rewriting stages already recorded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use journey_graph::CampaignGraph;
use journey_store::{CampaignStatus, CampaignStore, PersistenceGateway, is_transient_id};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SimError;
use crate::events::{NoopNotifier, RunEvent, RunNotifier, RunStage};
use crate::plan::ResolvedPlan;

/// Tuning knobs for a simulated run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
  /// Base delay between stage transitions.
  pub step_delay: Duration,
  /// Extra per-transition delay, sampled uniformly from `0..jitter`.
  pub jitter: Duration,
  /// Probability that a recipient fails (at `sending` or `sent`).
  pub failure_rate: f64,
  /// Seed for deterministic outcome sampling. `None` seeds from the OS.
  pub seed: Option<u64>,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      step_delay: Duration::from_millis(120),
      jitter: Duration::from_millis(80),
      failure_rate: 0.15,
      seed: None,
    }
  }
}

/// Final stages of a settled run, one per recipient.
#[derive(Debug)]
pub struct RunReport {
  pub outcomes: HashMap<String, RunStage>,
}

impl RunReport {
  /// True when every recipient reached `converted` or `failed`.
  pub fn all_terminal(&self) -> bool {
    self.outcomes.values().all(RunStage::is_terminal)
  }
}

/// The simulated run engine.
///
/// Generic over `N: RunNotifier` to allow different event consumers. Use
/// `SimulationEngine::new()` for a silent engine, or `with_notifier()` to
/// stream events to a UI.
pub struct SimulationEngine<N: RunNotifier = NoopNotifier> {
  config: SimulationConfig,
  notifier: Arc<N>,
}

impl SimulationEngine<NoopNotifier> {
  /// Create an engine that discards all events.
  pub fn new(config: SimulationConfig) -> Self {
    Self::with_notifier(config, NoopNotifier)
  }
}

impl<N: RunNotifier + 'static> SimulationEngine<N> {
  pub fn with_notifier(config: SimulationConfig, notifier: N) -> Self {
    Self {
      config,
      notifier: Arc::new(notifier),
    }
  }

  /// Guarantee the campaign is durably saved before a run.
  ///
  /// A missing or transient id performs the save here; a save failure aborts
  /// the whole run as [`SimError::CannotStart`], with zero recipient events.
  pub async fn ensure_saved<S: CampaignStore>(
    &self,
    gateway: &PersistenceGateway<S>,
    campaign_id: Option<&str>,
    graph: &CampaignGraph,
    name: Option<&str>,
  ) -> Result<String, SimError> {
    match campaign_id {
      Some(id) if !is_transient_id(id) => Ok(id.to_string()),
      other => {
        info!("campaign not durably saved yet, saving before run");
        let outcome = gateway
          .save(
            other,
            &graph.nodes,
            &graph.edges,
            name,
            CampaignStatus::Draft,
            None,
          )
          .await
          .map_err(SimError::CannotStart)?;
        Ok(outcome.id)
      }
    }
  }

  /// Run the simulation against a snapshot of the graph.
  ///
  /// Resolves the plan first; a resolution failure emits no events at all.
  pub async fn run(
    &self,
    graph: &CampaignGraph,
    recipients: &[String],
    cancel: CancellationToken,
  ) -> Result<RunReport, SimError> {
    if cancel.is_cancelled() {
      return Err(SimError::Cancelled);
    }

    let plan = ResolvedPlan::resolve(graph)?;
    info!(
      segment = %plan.segment_id,
      action = %plan.action_id,
      offer = %plan.offer.display_name(),
      channel = plan.channel_label(),
      recipients = recipients.len(),
      "simulation starting"
    );

    let mut handles = Vec::with_capacity(recipients.len());
    for (index, recipient) in recipients.iter().enumerate() {
      handles.push(tokio::spawn(run_recipient(
        recipient.clone(),
        plan.clone(),
        self.config.clone(),
        index as u64,
        Arc::clone(&self.notifier),
        cancel.clone(),
      )));
    }

    let results = futures::future::join_all(handles).await;
    let mut outcomes = HashMap::new();
    for result in results {
      match result {
        Ok((recipient, stage)) => {
          outcomes.insert(recipient, stage);
        }
        Err(error) => warn!(%error, "recipient task aborted"),
      }
    }

    let report = RunReport { outcomes };
    info!(
      settled = report.outcomes.len(),
      converted = report
        .outcomes
        .values()
        .filter(|s| **s == RunStage::Converted)
        .count(),
      "simulation settled"
    );
    Ok(report)
  }
}

/// Walk one recipient through its lifecycle, emitting an event per
/// transition. Returns the last stage reached (terminal unless cancelled).
async fn run_recipient<N: RunNotifier + 'static>(
  recipient: String,
  plan: ResolvedPlan,
  config: SimulationConfig,
  index: u64,
  notifier: Arc<N>,
  cancel: CancellationToken,
) -> (String, RunStage) {
  let mut rng = match config.seed {
    Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(index)),
    None => SmallRng::from_os_rng(),
  };

  // Sample the outcome up front so the walk itself is a straight line.
  let fail_at = if rng.random::<f64>() < config.failure_rate {
    if rng.random_bool(0.5) {
      Some(RunStage::Sending)
    } else {
      Some(RunStage::Sent)
    }
  } else {
    None
  };

  let mut stage = RunStage::Queued;
  notifier.notify(RunEvent {
    recipient: recipient.clone(),
    stage,
    message: "queued for delivery".to_string(),
  });

  for next in [
    RunStage::Sending,
    RunStage::Sent,
    RunStage::Clicked,
    RunStage::Converted,
  ] {
    if !step_delay(&config, &mut rng, &cancel).await {
      debug!(%recipient, last_stage = stage.as_str(), "recipient stopped by cancellation");
      return (recipient, stage);
    }

    stage = next;
    notifier.notify(RunEvent {
      recipient: recipient.clone(),
      stage,
      message: stage_message(stage, &plan),
    });

    if fail_at == Some(stage) {
      if !step_delay(&config, &mut rng, &cancel).await {
        return (recipient, stage);
      }
      stage = RunStage::Failed;
      notifier.notify(RunEvent {
        recipient: recipient.clone(),
        stage,
        message: format!("delivery failed on {}", plan.channel_label()),
      });
      return (recipient, stage);
    }
  }

  (recipient, stage)
}

/// Sleep out one simulated-latency step. Returns false when cancelled.
async fn step_delay(
  config: &SimulationConfig,
  rng: &mut SmallRng,
  cancel: &CancellationToken,
) -> bool {
  let delay = config.step_delay + config.jitter.mul_f64(rng.random::<f64>());
  tokio::select! {
    _ = tokio::time::sleep(delay) => true,
    _ = cancel.cancelled() => false,
  }
}

fn stage_message(stage: RunStage, plan: &ResolvedPlan) -> String {
  match stage {
    RunStage::Queued => "queued for delivery".to_string(),
    RunStage::Sending => format!("sending via {}: {}", plan.channel_label(), plan.message),
    RunStage::Sent => "delivered".to_string(),
    RunStage::Clicked => "clicked the call-to-action".to_string(),
    RunStage::Converted => format!("converted on {}", plan.offer.display_name()),
    RunStage::Failed => format!("delivery failed on {}", plan.channel_label()),
  }
}

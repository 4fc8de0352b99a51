use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use journey_audience::{AudienceBackend, HeuristicBackend};
use journey_canvas::CanvasState;
use journey_graph::{NodeConfig, NodeKind};
use journey_sim::{ChannelNotifier, SimulationConfig, SimulationEngine, demo_recipients};
use journey_store::{
  CampaignStatus, FlowDefinition, MemoryStore, PersistenceGateway, SqliteStore,
};

/// Journey - a campaign canvas and simulated-send engine
#[derive(Parser)]
#[command(name = "journey")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.journey)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Scaffold a starter campaign file (segment -> action -> channel)
  New {
    /// Where to write the campaign JSON
    output: PathBuf,
  },

  /// Check a campaign file's graph structure
  Validate {
    /// Path to the campaign file (JSON)
    campaign_file: PathBuf,
  },

  /// Estimate the reachable audience of each segment node
  Estimate {
    campaign_file: PathBuf,
  },

  /// Persist a campaign file into the local store
  Save {
    campaign_file: PathBuf,

    /// Campaign display name
    #[arg(long)]
    name: Option<String>,

    /// Update an existing campaign instead of creating one
    #[arg(long)]
    id: Option<String>,
  },

  /// Load a stored campaign and print its flow definition
  Load {
    id: String,
  },

  /// List stored campaigns, most recently updated first
  List,

  /// Run a simulated send against a campaign file
  Simulate {
    campaign_file: PathBuf,

    /// Comma-separated recipient list. Falls back to the campaign's
    /// demoRecipients metadata, then to a built-in demo list.
    #[arg(long)]
    recipients: Option<String>,

    /// Probability that a recipient's delivery fails
    #[arg(long)]
    failure_rate: Option<f64>,

    /// Seed for deterministic outcomes
    #[arg(long)]
    seed: Option<u64>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .init();

  let cli = Cli::parse();

  let data_dir = cli.data_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".journey")
  });

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::New { output }) => new_campaign(output)?,
    Some(Commands::Validate { campaign_file }) => validate(campaign_file)?,
    Some(Commands::Estimate { campaign_file }) => rt.block_on(estimate(campaign_file))?,
    Some(Commands::Save {
      campaign_file,
      name,
      id,
    }) => rt.block_on(save(campaign_file, name, id, data_dir))?,
    Some(Commands::Load { id }) => rt.block_on(load(id, data_dir))?,
    Some(Commands::List) => rt.block_on(list_campaigns(data_dir))?,
    Some(Commands::Simulate {
      campaign_file,
      recipients,
      failure_rate,
      seed,
    }) => rt.block_on(simulate(campaign_file, recipients, failure_rate, seed))?,
    None => {
      println!("journey - use --help to see available commands");
    }
  }

  Ok(())
}

fn read_flow(path: &PathBuf) -> Result<FlowDefinition> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read campaign file: {}", path.display()))?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse campaign file: {}", path.display()))
}

fn new_campaign(output: PathBuf) -> Result<()> {
  let mut canvas = CanvasState::new();
  let segment = canvas.add_node(NodeKind::Segment);
  let action = canvas.add_node(NodeKind::Action);
  let channel = canvas.add_node(NodeKind::Channel);
  canvas
    .connect(&segment, &action, None)
    .and_then(|_| canvas.connect(&action, &channel, None))
    .map_err(|e| anyhow::anyhow!("failed to scaffold campaign: {e}"))?;

  let flow = FlowDefinition::from_graph(canvas.graph(), serde_json::Map::new());
  std::fs::write(&output, serde_json::to_string_pretty(&flow)?)
    .with_context(|| format!("failed to write {}", output.display()))?;
  println!("Wrote starter campaign to {}", output.display());
  Ok(())
}

fn validate(campaign_file: PathBuf) -> Result<()> {
  let flow = read_flow(&campaign_file)?;
  let graph = flow.to_graph();
  graph.validate().context("campaign graph is invalid")?;

  println!(
    "Campaign ok: {} nodes, {} edges",
    graph.nodes.len(),
    graph.edges.len()
  );
  for node in &graph.nodes {
    let state = if node.is_unconfigured() {
      "unconfigured"
    } else {
      "configured"
    };
    println!("  {:8} {:40} {}", node.kind().as_str(), node.id, state);
  }
  Ok(())
}

async fn estimate(campaign_file: PathBuf) -> Result<()> {
  let graph = read_flow(&campaign_file)?.to_graph();
  let backend = HeuristicBackend::default();

  let mut found = false;
  for node in &graph.nodes {
    if let NodeConfig::Segment(config) = &node.config {
      found = true;
      match &config.criteria {
        Some(criteria) => {
          let count = backend
            .count(criteria)
            .await
            .map_err(|e| anyhow::anyhow!("estimate failed: {e}"))?;
          println!("{}: ~{count} reachable subscribers", node.id);
        }
        None => println!("{}: no criteria set", node.id),
      }
    }
  }
  if !found {
    println!("No segment nodes in this campaign.");
  }
  Ok(())
}

async fn open_gateway(data_dir: PathBuf) -> Result<PersistenceGateway<SqliteStore>> {
  std::fs::create_dir_all(&data_dir)
    .with_context(|| format!("failed to create {}", data_dir.display()))?;
  let url = format!("sqlite://{}", data_dir.join("journey.db").display());
  let store = SqliteStore::connect(&url)
    .await
    .map_err(|e| anyhow::anyhow!("failed to open campaign store: {e}"))?;
  Ok(PersistenceGateway::new(store))
}

async fn save(
  campaign_file: PathBuf,
  name: Option<String>,
  id: Option<String>,
  data_dir: PathBuf,
) -> Result<()> {
  let flow = read_flow(&campaign_file)?;
  let graph = flow.to_graph();
  graph
    .validate()
    .context("refusing to save an invalid graph")?;

  let gateway = open_gateway(data_dir).await?;
  let outcome = gateway
    .save(
      id.as_deref(),
      &graph.nodes,
      &graph.edges,
      name.as_deref(),
      CampaignStatus::Draft,
      Some(flow.metadata),
    )
    .await
    .map_err(|e| anyhow::anyhow!("save failed: {e}"))?;

  if outcome.created {
    println!("Created campaign {}", outcome.id);
  } else {
    println!("Updated campaign {}", outcome.id);
  }
  Ok(())
}

async fn load(id: String, data_dir: PathBuf) -> Result<()> {
  let gateway = open_gateway(data_dir).await?;
  let record = gateway
    .load(&id)
    .await
    .map_err(|e| anyhow::anyhow!("load failed: {e}"))?;

  eprintln!(
    "{} ({}) - updated {}",
    record.name,
    record.status.as_str(),
    record.updated_at
  );
  println!("{}", serde_json::to_string_pretty(&record.flow_definition)?);
  Ok(())
}

async fn list_campaigns(data_dir: PathBuf) -> Result<()> {
  let gateway = open_gateway(data_dir).await?;
  let records = gateway
    .list()
    .await
    .map_err(|e| anyhow::anyhow!("list failed: {e}"))?;

  if records.is_empty() {
    println!("No campaigns saved yet.");
    return Ok(());
  }
  for record in records {
    println!(
      "{}  {:6}  {}  {}",
      record.id,
      record.status.as_str(),
      record.updated_at.format("%Y-%m-%d %H:%M"),
      record.name
    );
  }
  Ok(())
}

async fn simulate(
  campaign_file: PathBuf,
  recipients: Option<String>,
  failure_rate: Option<f64>,
  seed: Option<u64>,
) -> Result<()> {
  let flow = read_flow(&campaign_file)?;
  let graph = flow.to_graph();

  let recipients: Vec<String> = recipients
    .map(|list| {
      list
        .split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
    })
    .or_else(|| demo_recipients(&flow.metadata))
    .unwrap_or_else(|| {
      vec![
        "+23480000001".to_string(),
        "+23480000002".to_string(),
        "+23480000003".to_string(),
      ]
    });

  let mut config = SimulationConfig::default();
  if let Some(rate) = failure_rate {
    config.failure_rate = rate.clamp(0.0, 1.0);
  }
  config.seed = seed;

  let (notifier, mut events) = ChannelNotifier::channel();
  let engine = SimulationEngine::with_notifier(config, notifier);

  // A run requires a durable save first. The CLI demo saves into an
  // in-memory store so nothing lands on disk.
  let gateway = PersistenceGateway::new(MemoryStore::new());
  let campaign_id = engine
    .ensure_saved(&gateway, None, &graph, Some("Simulation demo"))
    .await
    .map_err(|e| anyhow::anyhow!("{e}"))?;
  eprintln!(
    "Simulating campaign {campaign_id} for {} recipients",
    recipients.len()
  );

  let printer = tokio::spawn(async move {
    while let Some(event) = events.recv().await {
      println!(
        "[{:9}] {} - {}",
        event.stage.as_str(),
        event.recipient,
        event.message
      );
    }
  });

  let report = engine
    .run(&graph, &recipients, CancellationToken::new())
    .await
    .map_err(|e| anyhow::anyhow!("{e}"))?;

  // Dropping the engine drops the only remaining sender, ending the printer.
  drop(engine);
  let _ = printer.await;

  let converted = report
    .outcomes
    .values()
    .filter(|s| s.as_str() == "converted")
    .count();
  println!(
    "Run settled: {}/{} converted",
    converted,
    report.outcomes.len()
  );
  Ok(())
}

//! `postwright`: run content plans from JSON files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use postwright_coordinator::{ContentPlanRequest, Orchestrator, PostwrightConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postwright")]
#[command(about = "Multi-agent social media content generation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "POSTWRIGHT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a complete content plan for one request
    Plan {
        /// JSON file holding a content plan request
        request: PathBuf,

        /// Research trends first and weave them into the content
        #[arg(long)]
        research: bool,

        /// Suggest a posting time for every generated item
        #[arg(long)]
        schedule: bool,

        /// Owner of stored brand context and examples
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Generate plans for a JSON array of requests in batches
    Bulk {
        /// JSON file holding an array of content plan requests
        requests: PathBuf,

        /// Plans generated concurrently per batch
        #[arg(short, long)]
        batch_size: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,postwright=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            PostwrightConfig::from_file(path)?
        }
        None => PostwrightConfig::default(),
    };
    let orchestrator = Orchestrator::from_config(&config)?;

    match cli.command {
        Commands::Plan {
            request,
            research,
            schedule,
            user_id,
        } => {
            let mut plan: ContentPlanRequest = read_json(&request)?;
            plan.include_research |= research;
            plan.include_scheduling |= schedule;
            if user_id.is_some() {
                plan.user_id = user_id;
            }

            let result = orchestrator.generate_complete_content_plan(&plan).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Bulk {
            requests,
            batch_size,
        } => {
            let plans: Vec<ContentPlanRequest> = read_json(&requests)?;
            let results = orchestrator.bulk_generate_content(&plans, batch_size).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in '{}'", path.display()))
}

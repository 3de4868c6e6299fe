mod render;

use std::time::Duration;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use grocery_core::{
    ClientConfig, OptimizerClient, SearchInput, Session, SessionState, UreqTransport,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grocery-cli")]
#[command(about = "Plan the cheapest grocery run across nearby stores")]
struct Cli {
    /// Base URL of the optimization service.
    #[arg(long, global = true, env = "GROCERY_OPTIMIZER_URL")]
    optimizer_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "GROCERY_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Request an optimized shopping plan.
    Plan(PlanArgs),
    /// Check that the optimization service is reachable.
    Ping,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Starting address, e.g. "123 Main St, Charlotte, NC 28202".
    #[arg(long)]
    address: String,

    /// Comma-separated grocery list, e.g. "bread, eggs, milk".
    #[arg(long)]
    items: String,

    /// Budget in dollars (advisory).
    #[arg(long)]
    budget: String,

    /// Maximum number of stores to visit (1-10).
    #[arg(long, default_value = "3")]
    max_stores: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = ClientConfig::load()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    if let Some(url) = cli.optimizer_url {
        config.optimizer_url = url;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    tracing::debug!(
        optimizer_url = %config.optimizer_url,
        csv_path = %config.csv_path,
        timeout_secs = config.request_timeout.as_secs(),
        "resolved client config"
    );

    let client = OptimizerClient::new(&config.optimizer_url, &config.csv_path);
    let transport = UreqTransport::new(config.request_timeout);

    match cli.command {
        Commands::Plan(args) => {
            let input = SearchInput {
                home_address: args.address,
                grocery_list: args.items,
                budget: args.budget,
                max_stores: args.max_stores,
            };
            plan(client, transport, &input).await
        }
        Commands::Ping => {
            let base_url = client.base_url().to_string();
            let banner =
                tokio::task::spawn_blocking(move || client.check_health(&transport)).await??;
            println!("{base_url}: {banner}");
            Ok(())
        }
    }
}

async fn plan(
    client: OptimizerClient,
    transport: UreqTransport,
    input: &SearchInput,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    if let Ok(submission) = session.submit(input) {
        let request = submission.request().clone();
        let outcome =
            tokio::task::spawn_blocking(move || client.execute(&transport, &request)).await?;
        session.resolve(submission, outcome);
    }

    match session.state() {
        SessionState::Success(plan) => {
            tracing::info!(
                stores = plan.stores.len(),
                items = plan.line_items.len(),
                rejected = plan.rejected_items.len(),
                "plan ready"
            );
            print!("{}", render::render_plan(plan));
            Ok(())
        }
        SessionState::Error(info) => {
            tracing::warn!(kind = ?info.kind, "planning failed");
            bail!("{}", info.message)
        }
        SessionState::Idle | SessionState::Loading => bail!("planning did not complete"),
    }
}

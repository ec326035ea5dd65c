//! ecs-scout - Command line tools for AWS ECS clusters
//!
//! Lists clusters, services, tasks and container instances with health and
//! utilization summaries, and updates a service's desired task count. Uses
//! the AWS SDK for Rust for cloud integration.

mod aws;
mod cli;
mod commands;
mod config;
mod error;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use aws::EcsClient;
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` raises the filter to
/// debug. Log lines go to stderr so report output on stdout stays clean.
fn init_tracing(verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Main application logic: one aggregator/renderer pair or one mutation.
async fn run(cli: Cli) -> Result<()> {
    // Completion is generated statically, no AWS client or config needed
    if let Commands::Completion(options) = &cli.command {
        commands::completion::run(options);
        return Ok(());
    }

    let config = Config::load()?;
    config.apply_color_mode();

    let region = cli.region.clone().or_else(|| config.aws.region.clone());
    let profile = cli.profile.clone().or_else(|| config.aws.profile.clone());
    let client = EcsClient::new(region, profile).await?;
    debug!("AWS clients initialized");

    match &cli.command {
        Commands::Clusters(options) => commands::clusters::run(&client, options).await,
        Commands::Services(options) => commands::services::run(&client, options).await,
        Commands::Tasks(options) => commands::tasks::run(&client, options).await,
        Commands::Instances(options) => commands::instances::run(&client, options).await,
        Commands::Images(options) => commands::images::run(&client, options).await,
        Commands::Events(options) => commands::events::run(&client, options).await,
        Commands::Update(options) => commands::update::run(&client, options).await,
        Commands::Completion(_) => unreachable!("handled earlier"),
    }
}

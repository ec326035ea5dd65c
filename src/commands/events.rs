//! The `events` subcommand: chronological deployment events across services.

use anyhow::Result;
use clap::Args;

use crate::aws::services::{ServiceEvent, STEADY_STATE_PHRASE};
use crate::aws::EcsClient;
use crate::cli::LaunchTypeFilter;
use crate::render;

#[derive(Debug, Args)]
pub struct EventsOptions {
    /// Filter by the name of the ECS cluster
    #[arg(short = 'c', long = "cluster", default_value = "")]
    pub cluster_filter: String,

    /// Filter by the name of the ECS service
    #[arg(short = 's', long = "service", default_value = "")]
    pub service_filter: String,

    /// Filter by service launch type
    #[arg(short = 't', long = "type", value_enum)]
    pub launch_type: Option<LaunchTypeFilter>,

    /// Don't display events that say the service is steady
    #[arg(long = "skip-steady")]
    pub skip_steady: bool,
}

pub async fn run(client: &EcsClient, options: &EventsOptions) -> Result<()> {
    let cluster_names = client.list_clusters(&options.cluster_filter).await?;

    let mut events: Vec<ServiceEvent> = Vec::new();
    for cluster in client.describe_clusters(&cluster_names).await? {
        let services = client
            .list_services(
                &cluster.name,
                &options.service_filter,
                options.launch_type.map(Into::into),
            )
            .await?;
        events.extend(services.into_iter().flat_map(|service| service.events));
    }

    events.sort_by_key(|event| event.created_at);
    for event in &events {
        if options.skip_steady && event.message.contains(STEADY_STATE_PHRASE) {
            continue;
        }
        println!("{}", render::event_line(event));
    }
    Ok(())
}

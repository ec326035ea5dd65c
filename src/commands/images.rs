//! The `images` subcommand: print container image references per service.

use anyhow::Result;
use clap::Args;

use crate::aws::EcsClient;
use crate::cli::LaunchTypeFilter;
use crate::render;

#[derive(Debug, Args)]
pub struct ImagesOptions {
    /// Filter by the name of the ECS cluster
    #[arg(short = 'c', long = "cluster", default_value = "")]
    pub cluster_filter: String,

    /// Filter by the name of the ECS service
    #[arg(short = 's', long = "service", default_value = "")]
    pub service_filter: String,

    /// Filter by service launch type
    #[arg(short = 't', long = "type", value_enum)]
    pub launch_type: Option<LaunchTypeFilter>,
}

pub async fn run(client: &EcsClient, options: &ImagesOptions) -> Result<()> {
    let cluster_names = client.list_clusters(&options.cluster_filter).await?;

    for cluster in client.describe_clusters(&cluster_names).await? {
        let services = client
            .list_services(
                &cluster.name,
                &options.service_filter,
                options.launch_type.map(Into::into),
            )
            .await?;

        println!("{}", render::images_header(&cluster.name, services.len()));
        for service in &services {
            let task_definition = client.task_definition(&service.task_definition).await?;
            for container in &task_definition.containers {
                println!("{}: {}", service.name, container.image);
            }
        }
    }
    Ok(())
}

//! The `instances` subcommand: list container instances and their utilization.

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::aws::EcsClient;
use crate::render;

#[derive(Debug, Args)]
pub struct InstancesOptions {
    /// Filter by the name of the ECS cluster
    #[arg(short = 'c', long = "cluster", default_value = "")]
    pub cluster_filter: String,

    /// Enable detailed output of containers instances
    #[arg(short = 'l', long)]
    pub long: bool,
}

pub async fn run(client: &EcsClient, options: &InstancesOptions) -> Result<()> {
    let cluster_names = client.list_clusters(&options.cluster_filter).await?;

    for cluster in client.describe_clusters(&cluster_names).await? {
        let instances = client.list_container_instances(&cluster.name).await?;
        println!(
            "{}",
            render::instances_header(&cluster.name, instances.len())
        );
        if instances.is_empty() {
            println!();
            continue;
        }

        let now = Utc::now();
        println!("{}", render::instance_header());
        for instance in &instances {
            println!("{}", render::instance_row(instance, now));
            if options.long {
                print!("{}", render::instance_detail(instance));
            }
        }
        println!();
    }
    Ok(())
}

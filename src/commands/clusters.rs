//! The `clusters` subcommand: summarize clusters and their resource counts.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::aws::EcsClient;
use crate::render;

#[derive(Debug, Args)]
pub struct ClustersOptions {
    /// Filter by the name of the ECS cluster
    #[arg(short = 'c', long = "cluster", default_value = "")]
    pub cluster_filter: String,
}

pub async fn run(client: &EcsClient, options: &ClustersOptions) -> Result<()> {
    let cluster_names = client.list_clusters(&options.cluster_filter).await?;
    let clusters = client.describe_clusters(&cluster_names).await?;

    if clusters.is_empty() {
        println!("No cluster found");
        return Ok(());
    }

    println!("{}", render::clusters_table_header());
    for cluster in &clusters {
        debug!("Described cluster {}", cluster.arn);
        println!("{}", render::cluster_row(cluster));
    }
    Ok(())
}

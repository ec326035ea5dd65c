//! The `tasks` subcommand: list running tasks per cluster.

use anyhow::Result;
use clap::Args;

use crate::aws::EcsClient;
use crate::render;

#[derive(Debug, Args)]
pub struct TasksOptions {
    /// Filter by the name of the ECS cluster
    #[arg(short = 'c', long = "cluster", default_value = "")]
    pub cluster_filter: String,

    /// Filter by the name of the ECS service
    #[arg(short = 's', long = "service", default_value = "")]
    pub service_filter: String,

    /// Enable detailed output of containers parameters
    #[arg(short = 'l', long)]
    pub long: bool,
}

pub async fn run(client: &EcsClient, options: &TasksOptions) -> Result<()> {
    let cluster_names = client.list_clusters(&options.cluster_filter).await?;

    for cluster in client.describe_clusters(&cluster_names).await? {
        let tasks = client
            .list_tasks(&cluster.name, &options.service_filter)
            .await?;
        if tasks.is_empty() {
            continue;
        }

        println!("{}", render::tasks_header(&cluster.name, tasks.len()));
        for task in &tasks {
            println!("{}", render::task_row(task));
            if options.long {
                let task_definition = client.task_definition(&task.task_definition_arn).await?;
                print!("{}", render::task_detail(&task_definition));
            }
        }
    }
    Ok(())
}

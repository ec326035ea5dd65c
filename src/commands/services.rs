//! The `services` subcommand: list services and their health per cluster.

use anyhow::Result;
use clap::Args;

use crate::aws::EcsClient;
use crate::cli::LaunchTypeFilter;
use crate::render;

#[derive(Debug, Args)]
pub struct ServicesOptions {
    /// Filter by the name of the ECS cluster
    #[arg(short = 'c', long = "cluster", default_value = "")]
    pub cluster_filter: String,

    /// Filter by the name of the ECS service
    #[arg(short = 's', long = "service", default_value = "")]
    pub service_filter: String,

    /// Filter by service launch type
    #[arg(short = 't', long = "type", value_enum)]
    pub launch_type: Option<LaunchTypeFilter>,

    /// Print all services, ignoring their status
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Enable detailed output of containers parameters
    #[arg(short = 'l', long)]
    pub long: bool,
}

pub async fn run(client: &EcsClient, options: &ServicesOptions) -> Result<()> {
    let cluster_names = client.list_clusters(&options.cluster_filter).await?;

    for cluster in client.describe_clusters(&cluster_names).await? {
        let services = client
            .list_services(
                &cluster.name,
                &options.service_filter,
                options.launch_type.map(Into::into),
            )
            .await?;

        let displayed = render::displayed_services(&services, options.all);
        if displayed.is_empty() {
            continue;
        }

        println!(
            "{}",
            render::services_header(&cluster.name, displayed.len(), services.len(), options.all)
        );
        for service in displayed {
            println!("{}", render::service_row(service));
            if options.long {
                let task_definition = client.task_definition(&service.task_definition).await?;
                let mut target_groups = Vec::new();
                for arn in &service.target_group_arns {
                    if let Some(target_group) = client.describe_target_group(arn).await? {
                        target_groups.push(target_group);
                    }
                }
                print!(
                    "{}",
                    render::service_detail(service, &task_definition, &target_groups)
                );
            }
        }
    }
    Ok(())
}

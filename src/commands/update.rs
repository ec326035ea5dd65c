//! The `update` subcommand: change a service's DesiredCount or force a redeploy.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::aws::EcsClient;

#[derive(Debug, Args)]
pub struct UpdateOptions {
    /// Name of the ECS cluster
    #[arg(short = 'c', long, required = true)]
    pub cluster: String,

    /// Name of the ECS service
    #[arg(short = 's', long, required = true)]
    pub service: String,

    /// New DesiredCount
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..))]
    pub count: Option<i32>,

    /// Force a new deployment of the service
    #[arg(short = 'f', long)]
    pub force: bool,
}

pub async fn run(client: &EcsClient, options: &UpdateOptions) -> Result<()> {
    let service = client
        .find_service(&options.cluster, &options.service)
        .await?;

    let mut desired_count = None;
    match options.count {
        // Unchanged count is a no-op, unless a redeploy was asked for as well
        Some(count) if count == service.desired_count && !options.force => {
            println!(
                "Service {} already has a DesiredCount of {}",
                options.service.yellow(),
                count
            );
            return Ok(());
        }
        Some(count) if count != service.desired_count => {
            println!(
                "Updating {} / DesiredCount[{} -> {}] RunningCount={{{}}}",
                options.service.yellow(),
                service.desired_count,
                count,
                service.running_count
            );
            desired_count = Some(count);
        }
        Some(_) => {}
        None if !options.force => {
            println!(
                "Service {} left unchanged (no --count or --force given)",
                options.service.yellow()
            );
            return Ok(());
        }
        None => {}
    }

    client
        .update_service(&options.cluster, &options.service, desired_count, options.force)
        .await?;

    match desired_count {
        Some(count) => println!(
            "Service {} successfully updated: DesiredCount={}",
            options.service.yellow(),
            count
        ),
        None => println!(
            "Service {}: new deployment forced",
            options.service.yellow()
        ),
    }
    Ok(())
}

//! Command line interface definition.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands;

#[derive(Debug, Parser)]
#[command(name = "ecs-scout", version)]
#[command(about = "Command line tools to interact with your ECS clusters")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// AWS region name
    #[arg(short = 'r', long, global = true, env = "AWS_DEFAULT_REGION")]
    pub region: Option<String>,

    /// AWS profile from ~/.aws/credentials
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize your ECS clusters
    Clusters(commands::clusters::ClustersOptions),

    /// List services in your ECS clusters
    Services(commands::services::ServicesOptions),

    /// List tasks running in your ECS clusters
    Tasks(commands::tasks::TasksOptions),

    /// List container instances in your ECS clusters
    Instances(commands::instances::InstancesOptions),

    /// List the Docker images of services running in ECS
    Images(commands::images::ImagesOptions),

    /// List events for services running in your ECS clusters
    Events(commands::events::EventsOptions),

    /// Update the service to a specific DesiredCount
    Update(commands::update::UpdateOptions),

    /// Generate completion script
    Completion(commands::completion::CompletionOptions),
}

/// Launch type filter accepted by the listing subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LaunchTypeFilter {
    Fargate,
    Ec2,
}

impl From<LaunchTypeFilter> for aws_sdk_ecs::types::LaunchType {
    fn from(filter: LaunchTypeFilter) -> Self {
        match filter {
            LaunchTypeFilter::Fargate => aws_sdk_ecs::types::LaunchType::Fargate,
            LaunchTypeFilter::Ec2 => aws_sdk_ecs::types::LaunchType::Ec2,
        }
    }
}

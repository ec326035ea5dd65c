//! AWS ECS, EC2 and ELBv2 integration.
//!
//! This module provides a client wrapper around the AWS SDK services the tool
//! talks to, together with the small lookup and chunking helpers shared by
//! the per-resource aggregators in the submodules.

pub mod clusters;
pub mod instances;
pub mod services;
pub mod tasks;

use anyhow::Result;
use aws_sdk_ec2::Client as Ec2Client;
use aws_sdk_ecs::types::{Attribute, Resource};
use aws_sdk_ecs::Client;
use aws_sdk_elasticloadbalancingv2::Client as ElbClient;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Client for interacting with AWS ECS, EC2 and Elastic Load Balancing v2.
///
/// Wraps the AWS SDK clients and provides the aggregation methods used by the
/// report commands. Constructed once per invocation and passed by reference
/// into every command.
pub struct EcsClient {
    /// AWS ECS SDK client
    client: Client,
    /// AWS EC2 SDK client, used to join instance details onto container instances
    ec2_client: Ec2Client,
    /// AWS ELBv2 SDK client, used for target-group lookups in verbose output
    elb_client: ElbClient,
}

impl EcsClient {
    /// Creates a new client wrapper with optional region and profile configuration.
    ///
    /// # Arguments
    /// * `region` - Optional AWS region override (e.g., "us-east-1")
    /// * `profile` - Optional AWS profile name from ~/.aws/credentials
    ///
    /// # Errors
    /// This function will return an error if AWS credentials cannot be
    /// resolved or the specified profile doesn't exist.
    pub async fn new(region: Option<String>, profile: Option<String>) -> Result<Self> {
        let mut config_loader = aws_config::from_env();

        if let Some(region_str) = region {
            debug!("Using AWS region: {region_str}");
            config_loader = config_loader.region(aws_config::Region::new(region_str));
        }

        if let Some(profile_name) = profile {
            debug!("Using AWS profile: {profile_name}");
            config_loader = config_loader.profile_name(profile_name);
        }

        let config = config_loader.load().await;
        Ok(Self {
            client: Client::new(&config),
            ec2_client: Ec2Client::new(&config),
            elb_client: ElbClient::new(&config),
        })
    }
}

/// Extracts the short task definition name (family:revision) from an ARN.
pub fn short_task_definition_name(task_definition: &str) -> &str {
    task_definition
        .split('/')
        .next_back()
        .unwrap_or(task_definition)
}

/// Extracts the cluster name from a cluster ARN.
///
/// Plain names pass through unchanged, so the helper accepts both forms.
pub fn cluster_name_from_arn(cluster_arn: &str) -> &str {
    cluster_arn.split('/').next_back().unwrap_or(cluster_arn)
}

/// Splits a list of identifiers into consecutive batches of at most
/// `max_batch` items.
///
/// The last batch may be smaller; empty input yields no batches. Used to
/// respect the describe-API limits (10 for services, 100 for tasks and
/// container instances).
pub fn batches<T>(items: &[T], max_batch: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(max_batch)
}

/// Builds a console URL for an IAM role.
pub fn link_to_iam(role_name: &str) -> String {
    format!("https://console.aws.amazon.com/iam/home#/roles/{role_name}")
}

/// Builds a console URL for a service's events page.
///
/// The region is taken from the service ARN rather than any ambient state.
pub fn link_to_console(service_arn: &str, cluster: &str, service_name: &str) -> String {
    let region = service_arn.split(':').nth(3).unwrap_or_default();
    format!(
        "https://{region}.console.aws.amazon.com/ecs/home?region={region}#/clusters/{cluster}/services/{service_name}/events"
    )
}

/// Finds a resource by name in a container instance's resource list.
///
/// Absence is a valid outcome; callers render missing resources as `-`.
pub fn find_resource<'a>(resources: &'a [Resource], name: &str) -> Option<&'a Resource> {
    resources.iter().find(|res| res.name() == Some(name))
}

/// Finds an attribute by name in a container instance's attribute list.
pub fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|attr| attr.name() == name)
}

/// Finds an EC2 tag by key.
pub fn find_tag<'a>(tags: &'a [aws_sdk_ec2::types::Tag], key: &str) -> Option<&'a aws_sdk_ec2::types::Tag> {
    tags.iter().find(|tag| tag.key() == Some(key))
}

/// Converts an AWS SDK timestamp into a chrono UTC datetime.
pub(crate) fn to_chrono(dt: &aws_sdk_ecs::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

//! Container instance aggregation.
//!
//! Container instances are listed per cluster, batch-described, then joined
//! with the matching EC2 instances for private IP and AMI details.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{batches, find_attribute, find_resource, find_tag, to_chrono, EcsClient};
use crate::error::ScoutError;

/// DescribeContainerInstances accepts at most this many instances per call.
const DESCRIBE_INSTANCES_BATCH: usize = 100;

/// Attribute names carrying this marker describe host capabilities.
pub const CAPABILITY_MARKER: &str = "ecs.capability.";

/// Capabilities in this sub-namespace are internal API versions, skipped in reports.
pub const INTERNAL_CAPABILITY_PREFIX: &str = "docker-remote-api.";

/// An attribute registered on a container instance.
#[derive(Debug, Clone)]
pub struct InstanceAttribute {
    pub name: String,
    pub value: Option<String>,
}

/// A container instance with its joined EC2 details.
#[derive(Debug, Clone)]
pub struct ContainerInstance {
    /// EC2 instance id backing this container instance
    pub ec2_instance_id: String,
    /// Registration status (e.g., ACTIVE, DRAINING)
    pub status: String,
    /// Whether the ECS agent is connected
    pub agent_connected: bool,
    /// Number of tasks currently running on the instance
    pub running_tasks_count: i32,
    /// Registered CPU units, absent when not reported
    pub registered_cpu: Option<i32>,
    /// Remaining CPU units, absent when not reported
    pub remaining_cpu: Option<i32>,
    /// Registered memory in MiB, absent when not reported
    pub registered_memory: Option<i32>,
    /// Remaining memory in MiB, absent when not reported
    pub remaining_memory: Option<i32>,
    /// ECS agent version
    pub agent_version: Option<String>,
    /// Docker version, without the "DockerVersion: " prefix
    pub docker_version: Option<String>,
    /// When the instance registered with the cluster
    pub registered_at: Option<DateTime<Utc>>,
    /// Instance type, from the ecs.instance-type attribute
    pub instance_type: Option<String>,
    /// All registered attributes
    pub attributes: Vec<InstanceAttribute>,
    /// Private IP address of the EC2 instance
    pub private_ip: Option<String>,
    /// AMI the EC2 instance was launched from
    pub image_id: Option<String>,
    /// Value of the EC2 Name tag
    pub name: Option<String>,
}

/// EC2 details joined onto a container instance.
struct Ec2Details {
    private_ip: Option<String>,
    image_id: Option<String>,
    name: Option<String>,
}

impl ContainerInstance {
    fn from_sdk(
        instance: &aws_sdk_ecs::types::ContainerInstance,
        ec2: Option<&Ec2Details>,
    ) -> Self {
        let registered = instance.registered_resources();
        let remaining = instance.remaining_resources();

        Self {
            ec2_instance_id: instance.ec2_instance_id().unwrap_or_default().to_string(),
            status: instance.status().unwrap_or_default().to_string(),
            agent_connected: instance.agent_connected(),
            running_tasks_count: instance.running_tasks_count(),
            registered_cpu: find_resource(registered, "CPU").map(|r| r.integer_value()),
            remaining_cpu: find_resource(remaining, "CPU").map(|r| r.integer_value()),
            registered_memory: find_resource(registered, "MEMORY").map(|r| r.integer_value()),
            remaining_memory: find_resource(remaining, "MEMORY").map(|r| r.integer_value()),
            agent_version: instance
                .version_info()
                .and_then(|v| v.agent_version())
                .map(ToString::to_string),
            docker_version: instance
                .version_info()
                .and_then(|v| v.docker_version())
                .map(|v| v.trim_start_matches("DockerVersion: ").to_string()),
            registered_at: instance.registered_at().and_then(to_chrono),
            instance_type: find_attribute(instance.attributes(), "ecs.instance-type")
                .and_then(|attr| attr.value())
                .map(ToString::to_string),
            attributes: instance
                .attributes()
                .iter()
                .map(|attr| InstanceAttribute {
                    name: attr.name().to_string(),
                    value: attr.value().map(ToString::to_string),
                })
                .collect(),
            private_ip: ec2.and_then(|details| details.private_ip.clone()),
            image_id: ec2.and_then(|details| details.image_id.clone()),
            name: ec2.and_then(|details| details.name.clone()),
        }
    }
}

impl EcsClient {
    /// Lists and describes the container instances of a cluster.
    ///
    /// Instance ARNs are collected with full pagination and described in
    /// batches of 100; EC2 details are joined in with one DescribeInstances
    /// call keyed by instance id. A cluster without container instances
    /// (e.g., Fargate-only) yields an empty list.
    pub async fn list_container_instances(&self, cluster: &str) -> Result<Vec<ContainerInstance>> {
        debug!("Listing container instances in cluster {cluster}");

        let mut instance_arns: Vec<String> = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let mut request = self.client.list_container_instances().cluster(cluster);
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let response = request.send().await.map_err(ScoutError::aws)?;
            instance_arns.extend(response.container_instance_arns().iter().cloned());

            next_token = response.next_token().map(ToString::to_string);
            if next_token.is_none() {
                break;
            }
        }

        if instance_arns.is_empty() {
            return Ok(Vec::new());
        }

        let mut sdk_instances = Vec::new();
        for batch in batches(&instance_arns, DESCRIBE_INSTANCES_BATCH) {
            let response = self
                .client
                .describe_container_instances()
                .cluster(cluster)
                .set_container_instances(Some(batch.to_vec()))
                .send()
                .await
                .map_err(ScoutError::aws)?;

            sdk_instances.extend(response.container_instances().iter().cloned());
        }

        let instance_ids: Vec<String> = sdk_instances
            .iter()
            .filter_map(|instance| instance.ec2_instance_id())
            .map(ToString::to_string)
            .collect();
        let ec2_details = self.describe_ec2_instances(&instance_ids).await?;

        Ok(sdk_instances
            .iter()
            .map(|instance| {
                let details = instance
                    .ec2_instance_id()
                    .and_then(|id| ec2_details.get(id));
                ContainerInstance::from_sdk(instance, details)
            })
            .collect())
    }

    /// Describes the EC2 instances backing the container instances.
    async fn describe_ec2_instances(
        &self,
        instance_ids: &[String],
    ) -> Result<HashMap<String, Ec2Details>> {
        let mut details = HashMap::new();
        if instance_ids.is_empty() {
            return Ok(details);
        }

        let mut next_token: Option<String> = None;
        loop {
            let mut request = self
                .ec2_client
                .describe_instances()
                .set_instance_ids(Some(instance_ids.to_vec()));
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let response = request.send().await.map_err(ScoutError::aws)?;
            for reservation in response.reservations() {
                for instance in reservation.instances() {
                    let Some(id) = instance.instance_id() else {
                        continue;
                    };
                    details.insert(
                        id.to_string(),
                        Ec2Details {
                            private_ip: instance.private_ip_address().map(ToString::to_string),
                            image_id: instance.image_id().map(ToString::to_string),
                            name: find_tag(instance.tags(), "Name")
                                .and_then(|tag| tag.value())
                                .map(ToString::to_string),
                        },
                    );
                }
            }

            next_token = response.next_token().map(ToString::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(details)
    }
}

//! Cluster listing and description.

use anyhow::Result;
use tracing::debug;

use super::{cluster_name_from_arn, EcsClient};
use crate::error::ScoutError;

/// Summary of an ECS cluster.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Cluster name
    pub name: String,
    /// Full cluster ARN
    pub arn: String,
    /// Lifecycle status (e.g., ACTIVE)
    pub status: String,
    /// Number of services in ACTIVE state
    pub active_services_count: i32,
    /// Number of tasks in RUNNING state
    pub running_tasks_count: i32,
    /// Number of tasks in PENDING state
    pub pending_tasks_count: i32,
    /// Number of registered container instances
    pub registered_container_instances_count: i32,
}

impl Cluster {
    fn from_sdk(cluster: &aws_sdk_ecs::types::Cluster) -> Self {
        Self {
            name: cluster.cluster_name().unwrap_or_default().to_string(),
            arn: cluster.cluster_arn().unwrap_or_default().to_string(),
            status: cluster.status().unwrap_or_default().to_string(),
            active_services_count: cluster.active_services_count(),
            running_tasks_count: cluster.running_tasks_count(),
            pending_tasks_count: cluster.pending_tasks_count(),
            registered_container_instances_count: cluster.registered_container_instances_count(),
        }
    }
}

impl EcsClient {
    /// Lists all cluster names in the region, sorted lexically.
    ///
    /// An empty filter returns every cluster; otherwise the filter is a
    /// case-insensitive substring match on the cluster's short name (the
    /// last path segment of the ARN). Pagination is driven to completion.
    pub async fn list_clusters(&self, filter: &str) -> Result<Vec<String>> {
        debug!("Listing clusters (filter: {filter:?})");

        let mut cluster_arns: Vec<String> = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let mut request = self.client.list_clusters();
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let response = request.send().await.map_err(ScoutError::aws)?;
            cluster_arns.extend(response.cluster_arns().iter().cloned());

            next_token = response.next_token().map(ToString::to_string);
            if next_token.is_none() {
                break;
            }
        }

        let needle = filter.to_lowercase();
        let mut cluster_names: Vec<String> = cluster_arns
            .iter()
            .map(|arn| cluster_name_from_arn(arn).to_string())
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .collect();
        cluster_names.sort();

        debug!("Found {} clusters", cluster_names.len());
        Ok(cluster_names)
    }

    /// Describes the given clusters, sorted by name.
    ///
    /// Empty input yields empty output without issuing any call.
    pub async fn describe_clusters(&self, names: &[String]) -> Result<Vec<Cluster>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .describe_clusters()
            .set_clusters(Some(names.to_vec()))
            .send()
            .await
            .map_err(ScoutError::aws)?;

        let mut clusters: Vec<Cluster> = response.clusters().iter().map(Cluster::from_sdk).collect();
        clusters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_cluster(name: &str) -> aws_sdk_ecs::types::Cluster {
        aws_sdk_ecs::types::Cluster::builder()
            .cluster_name(name)
            .cluster_arn(format!("arn:aws:ecs:us-east-1:123456789012:cluster/{name}"))
            .status("ACTIVE")
            .active_services_count(3)
            .running_tasks_count(7)
            .pending_tasks_count(1)
            .registered_container_instances_count(2)
            .build()
    }

    #[test]
    fn test_cluster_from_sdk() {
        let cluster = Cluster::from_sdk(&sdk_cluster("prod"));

        assert_eq!(cluster.name, "prod");
        assert_eq!(
            cluster.arn,
            "arn:aws:ecs:us-east-1:123456789012:cluster/prod"
        );
        assert_eq!(cluster.status, "ACTIVE");
        assert_eq!(cluster.active_services_count, 3);
        assert_eq!(cluster.running_tasks_count, 7);
        assert_eq!(cluster.pending_tasks_count, 1);
        assert_eq!(cluster.registered_container_instances_count, 2);
    }

    #[test]
    fn test_cluster_from_sdk_with_missing_fields() {
        let cluster = Cluster::from_sdk(&aws_sdk_ecs::types::Cluster::builder().build());

        assert_eq!(cluster.name, "");
        assert_eq!(cluster.status, "");
        assert_eq!(cluster.active_services_count, 0);
    }

    // The filter/sort step is pure; exercise it the way list_clusters does
    #[test]
    fn test_cluster_name_filtering_and_sort() {
        let arns = [
            "arn:aws:ecs:us-east-1:123456789012:cluster/staging",
            "arn:aws:ecs:us-east-1:123456789012:cluster/prod-web",
            "arn:aws:ecs:us-east-1:123456789012:cluster/PROD-batch",
        ];

        let needle = "prod";
        let mut names: Vec<String> = arns
            .iter()
            .map(|arn| cluster_name_from_arn(arn).to_string())
            .filter(|name| name.to_lowercase().contains(needle))
            .collect();
        names.sort();

        assert_eq!(names, vec!["PROD-batch", "prod-web"]);
    }
}

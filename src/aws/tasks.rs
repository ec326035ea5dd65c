//! Task listing and description.

use anyhow::Result;
use tracing::debug;

use super::{batches, EcsClient};
use crate::error::ScoutError;

/// DescribeTasks accepts at most this many tasks per call.
const DESCRIBE_TASKS_BATCH: usize = 100;

/// A running task with the fields the reports consume.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task definition ARN the task was started from
    pub task_definition_arn: String,
    /// Last reported status (e.g., RUNNING, PENDING)
    pub last_status: String,
    /// Task-level CPU reservation, absent for tasks sized per container
    pub cpu: Option<String>,
    /// Task-level memory reservation, absent for tasks sized per container
    pub memory: Option<String>,
}

impl Task {
    fn from_sdk(task: &aws_sdk_ecs::types::Task) -> Self {
        Self {
            task_definition_arn: task.task_definition_arn().unwrap_or_default().to_string(),
            last_status: task.last_status().unwrap_or_default().to_string(),
            cpu: task.cpu().map(ToString::to_string),
            memory: task.memory().map(ToString::to_string),
        }
    }
}

impl EcsClient {
    /// Lists and describes the tasks of a cluster.
    ///
    /// Task ARNs are collected with full pagination and described in batches
    /// of 100; the result is filtered by substring match on the task
    /// definition ARN and sorted by it.
    pub async fn list_tasks(&self, cluster: &str, name_filter: &str) -> Result<Vec<Task>> {
        debug!("Listing tasks in cluster {cluster}");

        let mut task_arns: Vec<String> = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let mut request = self.client.list_tasks().cluster(cluster);
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let response = request.send().await.map_err(ScoutError::aws)?;
            task_arns.extend(response.task_arns().iter().cloned());

            next_token = response.next_token().map(ToString::to_string);
            if next_token.is_none() {
                break;
            }
        }

        let mut tasks: Vec<Task> = Vec::new();
        for batch in batches(&task_arns, DESCRIBE_TASKS_BATCH) {
            let response = self
                .client
                .describe_tasks()
                .cluster(cluster)
                .set_tasks(Some(batch.to_vec()))
                .send()
                .await
                .map_err(ScoutError::aws)?;

            tasks.extend(
                response
                    .tasks()
                    .iter()
                    .map(Task::from_sdk)
                    .filter(|task| task.task_definition_arn.contains(name_filter)),
            );
        }

        tasks.sort_by(|a, b| a.task_definition_arn.cmp(&b.task_definition_arn));
        debug!("Described {} tasks in cluster {cluster}", tasks.len());
        Ok(tasks)
    }
}

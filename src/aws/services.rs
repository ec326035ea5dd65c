//! Service aggregation, lookup and health classification.
//!
//! Services are listed per cluster with full pagination, filtered and sorted,
//! then batch-described and mapped into owned model structs so the report
//! rendering and the health classifier never touch SDK types directly.

use anyhow::Result;
use aws_sdk_ecs::types::LaunchType;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{batches, to_chrono, EcsClient};
use crate::error::ScoutError;

/// Phrase emitted by ECS in the most recent event of a stabilized service.
pub const STEADY_STATE_PHRASE: &str = "has reached a steady state";

/// DescribeServices accepts at most this many services per call.
const DESCRIBE_SERVICES_BATCH: usize = 10;

/// Three-state health classification for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceHealth {
    /// Steady and running at least one task
    Ok,
    /// Steady but running zero tasks
    Warn,
    /// Not steady
    Ko,
}

/// A deployment event attached to a service.
#[derive(Debug, Clone)]
pub struct ServiceEvent {
    /// Event creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Event message text
    pub message: String,
}

/// awsvpc networking attached to a service.
#[derive(Debug, Clone)]
pub struct AwsvpcConfig {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
}

/// An ECS service with the fields the reports consume.
#[derive(Debug, Clone)]
pub struct Service {
    /// Service name
    pub name: String,
    /// Full service ARN
    pub arn: String,
    /// ARN of the owning cluster
    pub cluster_arn: String,
    /// Lifecycle status (e.g., ACTIVE, DRAINING)
    pub status: String,
    /// Launch type (FARGATE, EC2), empty when scheduled via capacity providers
    pub launch_type: String,
    /// Number of tasks that should be running
    pub desired_count: i32,
    /// Number of tasks currently running
    pub running_count: i32,
    /// Task definition ARN the service runs
    pub task_definition: String,
    /// Deployment events, newest first as returned by the API
    pub events: Vec<ServiceEvent>,
    /// Target group ARNs of attached load balancers
    pub target_group_arns: Vec<String>,
    /// awsvpc networking, when configured
    pub network: Option<AwsvpcConfig>,
}

impl Service {
    pub(crate) fn from_sdk(service: &aws_sdk_ecs::types::Service) -> Self {
        let events = service
            .events()
            .iter()
            .map(|event| ServiceEvent {
                created_at: event.created_at().and_then(to_chrono),
                message: event.message().unwrap_or_default().to_string(),
            })
            .collect();

        let target_group_arns = service
            .load_balancers()
            .iter()
            .filter_map(|lb| lb.target_group_arn())
            .map(ToString::to_string)
            .collect();

        let network = service
            .network_configuration()
            .and_then(|net| net.awsvpc_configuration())
            .map(|vpc| AwsvpcConfig {
                subnets: vpc.subnets().to_vec(),
                security_groups: vpc.security_groups().to_vec(),
            });

        Self {
            name: service.service_name().unwrap_or_default().to_string(),
            arn: service.service_arn().unwrap_or_default().to_string(),
            cluster_arn: service.cluster_arn().unwrap_or_default().to_string(),
            status: service.status().unwrap_or_default().to_string(),
            launch_type: service
                .launch_type()
                .map(|lt| lt.as_str().to_string())
                .unwrap_or_default(),
            desired_count: service.desired_count(),
            running_count: service.running_count(),
            task_definition: service.task_definition().unwrap_or_default().to_string(),
            events,
            target_group_arns,
            network,
        }
    }

    /// Whether the service has stabilized: desired equals running and the
    /// most recent event reports a steady state.
    pub fn is_steady(&self) -> bool {
        self.desired_count == self.running_count
            && self
                .events
                .first()
                .is_some_and(|event| event.message.contains(STEADY_STATE_PHRASE))
    }

    /// Classifies the service health.
    ///
    /// Steadiness is necessary but not sufficient for OK: a steady service
    /// running zero tasks is downgraded to WARN.
    pub fn health(&self) -> ServiceHealth {
        if !self.is_steady() {
            ServiceHealth::Ko
        } else if self.running_count == 0 {
            ServiceHealth::Warn
        } else {
            ServiceHealth::Ok
        }
    }

    /// Whether the services report hides this row by default.
    pub fn is_ok(&self) -> bool {
        self.health() == ServiceHealth::Ok
    }
}

/// A described task definition.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    /// Full task definition ARN
    pub arn: String,
    /// IAM role the tasks assume, when set
    pub task_role_arn: Option<String>,
    /// Container definitions in declaration order
    pub containers: Vec<ContainerDefinition>,
}

/// A container definition within a task definition.
#[derive(Debug, Clone)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    /// CPU units, absent when not reserved
    pub cpu: Option<i32>,
    /// Memory limit in MiB, absent when not reserved
    pub memory: Option<i32>,
    /// (host, container) port pairs
    pub port_mappings: Vec<(Option<i32>, Option<i32>)>,
    /// Environment variables in declaration order
    pub environment: Vec<(String, String)>,
    /// Legacy container links
    pub links: Vec<String>,
    /// Log driver configuration, when set
    pub log_configuration: Option<LogConfig>,
}

/// Log driver configuration of a container definition.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub driver: String,
    /// Driver options sorted by key for deterministic output
    pub options: Vec<(String, String)>,
}

impl TaskDefinition {
    fn from_sdk(task_definition: &aws_sdk_ecs::types::TaskDefinition) -> Self {
        let containers = task_definition
            .container_definitions()
            .iter()
            .map(|container| {
                let log_configuration = container.log_configuration().map(|log| {
                    let mut options: Vec<(String, String)> = log
                        .options()
                        .map(|opts| {
                            opts.iter()
                                .map(|(key, value)| (key.clone(), value.clone()))
                                .collect()
                        })
                        .unwrap_or_default();
                    options.sort();
                    LogConfig {
                        driver: log.log_driver().as_str().to_string(),
                        options,
                    }
                });

                ContainerDefinition {
                    name: container.name().unwrap_or_default().to_string(),
                    image: container.image().unwrap_or_default().to_string(),
                    cpu: (container.cpu() != 0).then_some(container.cpu()),
                    memory: container.memory(),
                    port_mappings: container
                        .port_mappings()
                        .iter()
                        .map(|port| (port.host_port(), port.container_port()))
                        .collect(),
                    environment: container
                        .environment()
                        .iter()
                        .map(|env| {
                            (
                                env.name().unwrap_or_default().to_string(),
                                env.value().unwrap_or_default().to_string(),
                            )
                        })
                        .collect(),
                    links: container.links().to_vec(),
                    log_configuration,
                }
            })
            .collect();

        Self {
            arn: task_definition
                .task_definition_arn()
                .unwrap_or_default()
                .to_string(),
            task_role_arn: task_definition.task_role_arn().map(ToString::to_string),
            containers,
        }
    }
}

/// Health-check summary of a load balancer target group.
#[derive(Debug, Clone)]
pub struct TargetGroupSummary {
    pub arn: String,
    pub protocol: String,
    pub health_check_path: Option<String>,
    pub health_check_port: Option<String>,
    pub port: Option<i32>,
}

impl EcsClient {
    /// Lists and describes the services of a cluster.
    ///
    /// Service ARNs are collected with full pagination (optionally narrowed
    /// server-side by launch type), filtered client-side by substring match
    /// on the ARN, sorted lexically, then described in batches of 10.
    pub async fn list_services(
        &self,
        cluster: &str,
        name_filter: &str,
        launch_type: Option<LaunchType>,
    ) -> Result<Vec<Service>> {
        debug!("Listing services in cluster {cluster}");

        let mut service_arns: Vec<String> = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let mut request = self.client.list_services().cluster(cluster);
            if let Some(lt) = &launch_type {
                request = request.launch_type(lt.clone());
            }
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let response = request.send().await.map_err(ScoutError::aws)?;
            service_arns.extend(response.service_arns().iter().cloned());

            next_token = response.next_token().map(ToString::to_string);
            if next_token.is_none() {
                break;
            }
        }

        service_arns.retain(|arn| arn.contains(name_filter));
        service_arns.sort();

        let mut services = Vec::new();
        for batch in batches(&service_arns, DESCRIBE_SERVICES_BATCH) {
            services.extend(self.describe_services(cluster, batch).await?);
        }

        debug!("Described {} services in cluster {cluster}", services.len());
        Ok(services)
    }

    /// Describes one batch of services in a cluster.
    async fn describe_services(&self, cluster: &str, names: &[String]) -> Result<Vec<Service>> {
        let response = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(names.to_vec()))
            .send()
            .await
            .map_err(ScoutError::aws)?;

        Ok(response.services().iter().map(Service::from_sdk).collect())
    }

    /// Resolves exactly one service by exact name within a cluster.
    ///
    /// Zero matches is a `ServiceNotFound` failure, more than one is
    /// `AmbiguousService`; both are command-level failures distinct from
    /// transport errors.
    pub async fn find_service(&self, cluster: &str, service: &str) -> Result<Service> {
        let mut services = self
            .describe_services(cluster, &[service.to_string()])
            .await?;

        if services.is_empty() {
            return Err(ScoutError::ServiceNotFound {
                service: service.to_string(),
                cluster: cluster.to_string(),
            }
            .into());
        }
        if services.len() > 1 {
            return Err(ScoutError::AmbiguousService {
                service: service.to_string(),
                cluster: cluster.to_string(),
            }
            .into());
        }
        Ok(services.remove(0))
    }

    /// Describes the task definition referenced by a service or task.
    pub async fn task_definition(&self, task_definition: &str) -> Result<TaskDefinition> {
        let response = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .map_err(ScoutError::aws)?;

        let task_definition = response
            .task_definition()
            .map(TaskDefinition::from_sdk)
            .unwrap_or_else(|| TaskDefinition {
                arn: task_definition.to_string(),
                task_role_arn: None,
                containers: Vec::new(),
            });
        debug!("Described task definition {}", task_definition.arn);
        Ok(task_definition)
    }

    /// Describes a load balancer target group for the verbose services report.
    pub async fn describe_target_group(&self, arn: &str) -> Result<Option<TargetGroupSummary>> {
        let response = self
            .elb_client
            .describe_target_groups()
            .target_group_arns(arn)
            .send()
            .await
            .map_err(ScoutError::aws)?;

        Ok(response.target_groups().first().map(|tg| TargetGroupSummary {
            arn: tg.target_group_arn().unwrap_or_default().to_string(),
            protocol: tg
                .protocol()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            health_check_path: tg.health_check_path().map(ToString::to_string),
            health_check_port: tg.health_check_port().map(ToString::to_string),
            port: tg.port(),
        }))
    }

    /// Updates a service's desired count and/or forces a new deployment.
    pub async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        desired_count: Option<i32>,
        force: bool,
    ) -> Result<()> {
        let mut request = self
            .client
            .update_service()
            .cluster(cluster)
            .service(service)
            .force_new_deployment(force);
        if let Some(count) = desired_count {
            request = request.desired_count(count);
        }

        request.send().await.map_err(ScoutError::aws)?;
        Ok(())
    }
}

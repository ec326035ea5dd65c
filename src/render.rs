//! Report rendering.
//!
//! Pure formatting functions from the aggregated model structs to strings.
//! Commands do the printing; nothing in here performs I/O or talks to AWS,
//! which keeps the report layouts testable with constructed models.

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::aws::clusters::Cluster;
use crate::aws::instances::{ContainerInstance, CAPABILITY_MARKER, INTERNAL_CAPABILITY_PREFIX};
use crate::aws::services::{
    ContainerDefinition, Service, ServiceEvent, ServiceHealth, TargetGroupSummary, TaskDefinition,
};
use crate::aws::tasks::Task;
use crate::aws::{link_to_console, link_to_iam, cluster_name_from_arn, short_task_definition_name};

/// Placeholder for values the upstream API did not report.
const ABSENT: &str = "-";

/// Renders the colored status tag for a service health classification.
pub fn health_tag(health: ServiceHealth) -> String {
    match health {
        ServiceHealth::Ok => "[OK]".green().to_string(),
        ServiceHealth::Warn => "[WARN]".yellow().to_string(),
        ServiceHealth::Ko => "[KO]".red().to_string(),
    }
}

/// Selects the services shown by the services report.
///
/// By default healthy rows are hidden; `show_all` shows everything.
pub fn displayed_services<'a>(services: &'a [Service], show_all: bool) -> Vec<&'a Service> {
    services
        .iter()
        .filter(|service| show_all || !service.is_ok())
        .collect()
}

/// Renders the cluster header of the services report.
///
/// In filtered mode the header carries "listing shown/total" counts.
pub fn services_header(cluster: &str, shown: usize, total: usize, show_all: bool) -> String {
    if show_all {
        format!("--- CLUSTER: {cluster} ({total} services)")
    } else {
        format!("--- CLUSTER: {cluster} (listing {shown}/{total} services)")
    }
}

/// Renders the cluster header of the tasks report.
pub fn tasks_header(cluster: &str, count: usize) -> String {
    format!("--- CLUSTER: {cluster} ({count} tasks)")
}

/// Renders the cluster header of the instances report.
pub fn instances_header(cluster: &str, count: usize) -> String {
    format!("--- CLUSTER: {cluster} ({count} registered instances)")
}

/// Renders the cluster header of the images report.
pub fn images_header(cluster: &str, count: usize) -> String {
    format!("--- CLUSTER: {cluster} ({count} services)")
}

/// Renders one row of the services report.
pub fn service_row(service: &Service) -> String {
    format!(
        "{:<15}  {:<70} {:<7} {:<8} running {}/{}  ({})",
        health_tag(service.health()),
        service.name.yellow(),
        service.launch_type,
        service.status,
        service.running_count,
        service.desired_count,
        short_task_definition_name(&service.task_definition),
    )
}

/// Renders the verbose detail block under a service row.
pub fn service_detail(
    service: &Service,
    task_definition: &TaskDefinition,
    target_groups: &[TargetGroupSummary],
) -> String {
    let mut out = String::new();

    out.push_str(&link_to_console(
        &service.arn,
        cluster_name_from_arn(&service.cluster_arn),
        &service.name,
    ));
    out.push('\n');

    if let Some(role_arn) = &task_definition.task_role_arn {
        out.push_str(&format!(
            "IAM Role: {}\n",
            link_to_iam(short_task_definition_name(role_arn))
        ));
    }

    for target_group in target_groups {
        out.push_str("Load Balancing:\n");
        out.push_str(&format!("  Target Group: {}\n", target_group.arn));
        out.push_str(&format!(
            "  Healthcheck: {} {} -> {}({})\n",
            target_group.protocol,
            target_group.health_check_path.as_deref().unwrap_or(ABSENT),
            target_group.health_check_port.as_deref().unwrap_or(ABSENT),
            target_group
                .port
                .map(|p| p.to_string())
                .unwrap_or_else(|| ABSENT.to_string()),
        ));
    }

    if let Some(network) = &service.network {
        if !network.security_groups.is_empty() {
            out.push_str(&format!(
                "Security Group: [{}]\n",
                network.security_groups.join(" ")
            ));
        }
        if !network.subnets.is_empty() {
            out.push_str(&format!("VPC Subnets: [{}]\n", network.subnets.join(" ")));
        }
    }

    for container in &task_definition.containers {
        out.push_str(&service_container_detail(container));
    }
    out.push('\n');

    out
}

/// Renders one container of a service's verbose detail.
fn service_container_detail(container: &ContainerDefinition) -> String {
    let mut out = String::new();

    out.push_str(&format!("- Container: {}\n", container.name.green()));
    out.push_str(&format!("  Image: {}\n", container.image.yellow()));
    out.push_str(&format!(
        "  Memory: {} / CPU: {}\n",
        optional_count(container.memory),
        optional_count(container.cpu),
    ));

    if !container.port_mappings.is_empty() {
        out.push_str("  Ports:\n");
        for (host, container_port) in &container.port_mappings {
            out.push_str(&format!(
                "   - Host:{} -> Container:{}\n",
                optional_count(*host),
                optional_count(*container_port),
            ));
        }
    }

    if let Some(log) = &container.log_configuration {
        out.push_str("  Logs:\n");
        out.push_str(&format!("   - log-driver: {}\n", log.driver));
        for (name, option) in &log.options {
            out.push_str(&format!("   - {name}: {option}\n"));
        }
    }

    if !container.environment.is_empty() {
        out.push_str("  Environment:\n");
        for (name, value) in &container.environment {
            out.push_str(&format!("   - {name}: {value}\n"));
        }
    }

    out
}

/// Renders one row of the tasks report.
pub fn task_row(task: &Task) -> String {
    let mut out = format!(
        "{:<60}  {:<10}",
        short_task_definition_name(&task.task_definition_arn),
        task.last_status,
    );
    if let Some(cpu) = &task.cpu {
        out.push_str(&format!("  Cpu: {cpu:>4}"));
    }
    if let Some(memory) = &task.memory {
        out.push_str(&format!("  Memory: {memory:>4}"));
    }
    out
}

/// Renders the verbose detail block under a task row.
pub fn task_detail(task_definition: &TaskDefinition) -> String {
    let mut out = String::new();

    for container in &task_definition.containers {
        out.push_str(&format!("- Container: {}\n", container.name.green()));
        out.push_str(&format!("  Image: {}\n", container.image));
        out.push_str(&format!(
            "  Memory: {} / CPU: {}\n",
            optional_count(container.memory),
            optional_count(container.cpu),
        ));

        if !container.port_mappings.is_empty() {
            out.push_str("  Ports:\n");
            for (host, container_port) in &container.port_mappings {
                out.push_str(&format!(
                    "   - Host:{} -> Container:{}\n",
                    optional_count(*host),
                    optional_count(*container_port),
                ));
            }
        }

        if !container.environment.is_empty() {
            out.push_str("  Environment:\n");
            for (name, value) in &container.environment {
                out.push_str(&format!("   - {name}: {value}\n"));
            }
        }

        if !container.links.is_empty() {
            out.push_str(&format!("  Links: {}\n", container.links.join(",")));
        }

        if let Some(log) = &container.log_configuration {
            out.push_str(&format!("  Logs: {}", log.driver));
            let option = |key: &str| {
                log.options
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or(ABSENT)
            };
            match log.driver.as_str() {
                "awslogs" => out.push_str(&format!(" ({})\n", option("awslogs-group"))),
                "fluentd" => out.push_str(&format!(" (tag: {})\n", option("tag"))),
                _ => out.push('\n'),
            }
        }
    }
    out.push('\n');

    out
}

/// Renders the column header of the instances report.
pub fn instance_header() -> String {
    format!(
        "{:<20}  {:<8} {:>5}  {:>10}  {:>10}  {:>15} {:>10}  {:>6}  {:<21}  {:<6}  {:>10}",
        "INSTANCE ID",
        "STATUS",
        "TASKS",
        "CPU:used/free",
        "MEM:used/free",
        "PRIVATE IP",
        "INST.TYPE",
        "AGENT",
        "AMI",
        "DOCKER",
        "AGE",
    )
}

/// Renders one row of the instances report.
///
/// `now` is passed in so the age column stays deterministic under test.
pub fn instance_row(instance: &ContainerInstance, now: DateTime<Utc>) -> String {
    let agent_version = match &instance.agent_version {
        Some(version) if instance.agent_connected => version.green().to_string(),
        Some(version) => version.red().to_string(),
        None => ABSENT.to_string(),
    };

    let age = instance
        .registered_at
        .map(|registered| {
            let days = (now - registered).num_seconds() as f64 / 86_400.0;
            format!("{days:4.1} days")
        })
        .unwrap_or_else(|| ABSENT.to_string());

    format!(
        "{:<20}  {:<8} {:>5}  {:>13}  {:>13}  {:>15} {:>10}  {:<6}  {:>12}  {:>7}  {}",
        instance.ec2_instance_id,
        instance.status,
        instance.running_tasks_count,
        used_free(instance.registered_cpu, instance.remaining_cpu),
        used_free(instance.registered_memory, instance.remaining_memory),
        instance.private_ip.as_deref().unwrap_or(ABSENT),
        instance.instance_type.as_deref().unwrap_or(ABSENT),
        agent_version,
        instance.image_id.as_deref().unwrap_or(ABSENT),
        instance.docker_version.as_deref().unwrap_or(ABSENT),
        age,
    )
}

/// Renders the verbose attribute/capability block under an instance row.
///
/// Capabilities are the attributes carrying the capability marker, minus the
/// internal docker-remote-api sub-namespace; both lists are sorted.
pub fn instance_detail(instance: &ContainerInstance) -> String {
    let mut attributes: Vec<String> = Vec::new();
    let mut capabilities: Vec<String> = Vec::new();

    for attr in &instance.attributes {
        if let Some((_, capability)) = attr.name.split_once(CAPABILITY_MARKER) {
            if capability.starts_with(INTERNAL_CAPABILITY_PREFIX) {
                continue;
            }
            capabilities.push(attribute_line(capability, attr.value.as_deref()));
        } else {
            attributes.push(attribute_line(&attr.name, attr.value.as_deref()));
        }
    }
    attributes.sort();
    capabilities.sort();

    let mut out = String::new();
    if let Some(name) = &instance.name {
        out.push_str(&format!("Name: {name}\n"));
    }
    out.push_str("Attributes:\n");
    for line in &attributes {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("Capabilities:\n");
    for line in &capabilities {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    out
}

fn attribute_line(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!(" - {:<22} {}", name, value.yellow()),
        None => format!(" - {name}"),
    }
}

/// Renders one line of the events report.
pub fn event_line(event: &ServiceEvent) -> String {
    let timestamp = event
        .created_at
        .map(|t| t.to_string())
        .unwrap_or_else(|| ABSENT.to_string());
    format!("{}: {}", timestamp, event.message)
}

/// Renders the column header of the clusters report.
pub fn clusters_table_header() -> String {
    format!(
        "{:<30}  {:<10} {:>9} {:>8} {:>8} {:>10}",
        "NAME", "STATUS", "SERVICES", "RUNNING", "PENDING", "INSTANCES",
    )
}

/// Renders one row of the clusters report.
pub fn cluster_row(cluster: &Cluster) -> String {
    format!(
        "{:<30}  {:<10} {:>9} {:>8} {:>8} {:>10}",
        cluster.name,
        cluster.status,
        cluster.active_services_count,
        cluster.running_tasks_count,
        cluster.pending_tasks_count,
        cluster.registered_container_instances_count,
    )
}

fn used_free(registered: Option<i32>, remaining: Option<i32>) -> String {
    match (registered, remaining) {
        (Some(registered), Some(remaining)) => {
            format!("{}/{}", registered - remaining, remaining)
        }
        _ => ABSENT.to_string(),
    }
}

fn optional_count(value: Option<i32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| ABSENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::instances::InstanceAttribute;
    use crate::aws::services::{AwsvpcConfig, LogConfig};
    use chrono::TimeZone;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn service(name: &str, desired: i32, running: i32, steady: bool) -> Service {
        Service {
            name: name.to_string(),
            arn: format!("arn:aws:ecs:us-east-1:123456789012:service/prod/{name}"),
            cluster_arn: "arn:aws:ecs:us-east-1:123456789012:cluster/prod".to_string(),
            status: "ACTIVE".to_string(),
            launch_type: "FARGATE".to_string(),
            desired_count: desired,
            running_count: running,
            task_definition: format!(
                "arn:aws:ecs:us-east-1:123456789012:task-definition/{name}:7"
            ),
            events: if steady {
                vec![ServiceEvent {
                    created_at: None,
                    message: format!("(service {name}) has reached a steady state."),
                }]
            } else {
                Vec::new()
            },
            target_group_arns: Vec::new(),
            network: None,
        }
    }

    #[test]
    fn test_health_tags() {
        no_color();
        assert_eq!(health_tag(ServiceHealth::Ok), "[OK]");
        assert_eq!(health_tag(ServiceHealth::Warn), "[WARN]");
        assert_eq!(health_tag(ServiceHealth::Ko), "[KO]");
    }

    // End-to-end shape of the services report: a steady 3/3 service is
    // hidden by default, a steady 0/2... 0/0 service shows as WARN.
    #[test]
    fn test_services_report_hides_healthy_rows_by_default() {
        no_color();
        let services = vec![service("web", 3, 3, true), service("worker", 0, 0, true)];

        let displayed = displayed_services(&services, false);
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].name, "worker");

        let header = services_header("prod", displayed.len(), services.len(), false);
        assert_eq!(header, "--- CLUSTER: prod (listing 1/2 services)");

        let row = service_row(displayed[0]);
        assert!(row.contains("[WARN]"));
        assert!(row.contains("worker"));
        assert!(row.contains("running 0/0"));
    }

    #[test]
    fn test_services_report_all_shows_everything() {
        no_color();
        let services = vec![service("web", 3, 3, true), service("worker", 0, 0, true)];

        let displayed = displayed_services(&services, true);
        assert_eq!(displayed.len(), 2);

        let header = services_header("prod", displayed.len(), services.len(), true);
        assert_eq!(header, "--- CLUSTER: prod (2 services)");

        assert!(service_row(displayed[0]).contains("[OK]"));
        assert!(service_row(displayed[1]).contains("[WARN]"));
    }

    #[test]
    fn test_service_row_fields() {
        no_color();
        let row = service_row(&service("web", 3, 2, false));
        assert!(row.starts_with("[KO]"));
        assert!(row.contains("FARGATE"));
        assert!(row.contains("ACTIVE"));
        assert!(row.contains("running 2/3"));
        assert!(row.contains("(web:7)"));
        // The full ARN never shows, only the short task definition name
        assert!(!row.contains("task-definition"));
    }

    #[test]
    fn test_service_detail_layout() {
        no_color();
        let mut svc = service("web", 2, 2, true);
        svc.target_group_arns =
            vec!["arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/web/abc".into()];
        svc.network = Some(AwsvpcConfig {
            subnets: vec!["subnet-1".to_string(), "subnet-2".to_string()],
            security_groups: vec!["sg-1".to_string()],
        });

        let task_definition = TaskDefinition {
            arn: svc.task_definition.clone(),
            task_role_arn: Some("arn:aws:iam::123456789012:role/web-task".to_string()),
            containers: vec![ContainerDefinition {
                name: "app".to_string(),
                image: "nginx:1.27".to_string(),
                cpu: Some(256),
                memory: None,
                port_mappings: vec![(Some(0), Some(80))],
                environment: vec![("PORT".to_string(), "80".to_string())],
                links: Vec::new(),
                log_configuration: Some(LogConfig {
                    driver: "awslogs".to_string(),
                    options: vec![("awslogs-group".to_string(), "/ecs/web".to_string())],
                }),
            }],
        };

        let target_groups = vec![TargetGroupSummary {
            arn: svc.target_group_arns[0].clone(),
            protocol: "HTTP".to_string(),
            health_check_path: Some("/health".to_string()),
            health_check_port: Some("traffic-port".to_string()),
            port: Some(80),
        }];

        let detail = service_detail(&svc, &task_definition, &target_groups);
        assert!(detail.contains(
            "https://us-east-1.console.aws.amazon.com/ecs/home?region=us-east-1#/clusters/prod/services/web/events"
        ));
        assert!(detail
            .contains("IAM Role: https://console.aws.amazon.com/iam/home#/roles/web-task"));
        assert!(detail.contains("  Healthcheck: HTTP /health -> traffic-port(80)"));
        assert!(detail.contains("Security Group: [sg-1]"));
        assert!(detail.contains("VPC Subnets: [subnet-1 subnet-2]"));
        assert!(detail.contains("- Container: app"));
        assert!(detail.contains("  Image: nginx:1.27"));
        // Unset memory renders as the absent placeholder
        assert!(detail.contains("  Memory: - / CPU: 256"));
        assert!(detail.contains("   - Host:0 -> Container:80"));
        assert!(detail.contains("   - log-driver: awslogs"));
        assert!(detail.contains("   - awslogs-group: /ecs/web"));
        assert!(detail.contains("   - PORT: 80"));
    }

    #[test]
    fn test_task_row_with_and_without_reservations() {
        no_color();
        let task = Task {
            task_definition_arn: "arn:aws:ecs:us-east-1:123456789012:task-definition/web:3"
                .to_string(),
            last_status: "RUNNING".to_string(),
            cpu: Some("256".to_string()),
            memory: Some("512".to_string()),
        };
        let row = task_row(&task);
        assert!(row.starts_with("web:3"));
        assert!(row.contains("RUNNING"));
        assert!(row.contains("Cpu:  256"));
        assert!(row.contains("Memory:  512"));

        let bare = Task {
            cpu: None,
            memory: None,
            ..task
        };
        let row = task_row(&bare);
        assert!(!row.contains("Cpu:"));
        assert!(!row.contains("Memory:"));
    }

    #[test]
    fn test_task_detail_log_driver_summaries() {
        no_color();
        let container = |driver: &str, options: Vec<(String, String)>| ContainerDefinition {
            name: "app".to_string(),
            image: "app:1".to_string(),
            cpu: None,
            memory: None,
            port_mappings: Vec::new(),
            environment: Vec::new(),
            links: vec!["db:db".to_string()],
            log_configuration: Some(LogConfig {
                driver: driver.to_string(),
                options,
            }),
        };

        let awslogs = task_detail(&TaskDefinition {
            arn: "td".to_string(),
            task_role_arn: None,
            containers: vec![container(
                "awslogs",
                vec![("awslogs-group".to_string(), "/ecs/app".to_string())],
            )],
        });
        assert!(awslogs.contains("  Logs: awslogs (/ecs/app)"));
        assert!(awslogs.contains("  Links: db:db"));

        let fluentd = task_detail(&TaskDefinition {
            arn: "td".to_string(),
            task_role_arn: None,
            containers: vec![container(
                "fluentd",
                vec![("tag".to_string(), "app.{{.ID}}".to_string())],
            )],
        });
        assert!(fluentd.contains("  Logs: fluentd (tag: app.{{.ID}})"));

        let journald = task_detail(&TaskDefinition {
            arn: "td".to_string(),
            task_role_arn: None,
            containers: vec![container("journald", Vec::new())],
        });
        assert!(journald.contains("  Logs: journald\n"));
    }

    fn instance() -> ContainerInstance {
        ContainerInstance {
            ec2_instance_id: "i-0123456789abcdef0".to_string(),
            status: "ACTIVE".to_string(),
            agent_connected: true,
            running_tasks_count: 4,
            registered_cpu: Some(2048),
            remaining_cpu: Some(1024),
            registered_memory: Some(3884),
            remaining_memory: Some(1836),
            agent_version: Some("1.79.2".to_string()),
            docker_version: Some("25.0.3".to_string()),
            registered_at: Some(Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap()),
            instance_type: Some("m5.large".to_string()),
            attributes: vec![
                InstanceAttribute {
                    name: "ecs.ami-id".to_string(),
                    value: Some("ami-0abcdef12".to_string()),
                },
                InstanceAttribute {
                    name: "ecs.capability.privileged-container".to_string(),
                    value: None,
                },
                InstanceAttribute {
                    name: "ecs.capability.docker-remote-api.1.44".to_string(),
                    value: None,
                },
                InstanceAttribute {
                    name: "ecs.capability.execution-role-ecr-pull".to_string(),
                    value: None,
                },
            ],
            private_ip: Some("10.0.1.23".to_string()),
            image_id: Some("ami-0abcdef12".to_string()),
            name: Some("ecs-node-1".to_string()),
        }
    }

    #[test]
    fn test_instance_row_used_free_and_age() {
        no_color();
        let now = Utc.with_ymd_and_hms(2026, 7, 11, 0, 0, 0).unwrap();
        let row = instance_row(&instance(), now);

        assert!(row.starts_with("i-0123456789abcdef0"));
        // used = registered - remaining, free = remaining
        assert!(row.contains("1024/1024"));
        assert!(row.contains("2048/1836"));
        assert!(row.contains("10.0.1.23"));
        assert!(row.contains("m5.large"));
        assert!(row.contains("1.79.2"));
        assert!(row.contains("25.0.3"));
        assert!(row.contains(" 9.5 days"));
    }

    #[test]
    fn test_instance_row_absent_values() {
        no_color();
        let bare = ContainerInstance {
            registered_cpu: None,
            remaining_cpu: None,
            registered_memory: None,
            remaining_memory: None,
            agent_version: None,
            docker_version: None,
            registered_at: None,
            instance_type: None,
            private_ip: None,
            image_id: None,
            name: None,
            ..instance()
        };

        let now = Utc.with_ymd_and_hms(2026, 7, 11, 0, 0, 0).unwrap();
        let row = instance_row(&bare, now);
        // Every missing value renders as the placeholder instead of a zero
        assert!(!row.contains("0/0"));
        assert!(row.contains('-'));
        assert!(!row.contains("days"));
    }

    #[test]
    fn test_instance_detail_splits_capabilities() {
        no_color();
        let detail = instance_detail(&instance());

        assert!(detail.contains("Name: ecs-node-1"));
        assert!(detail.contains("Attributes:\n"));
        assert!(detail.contains(" - ecs.ami-id"));
        assert!(detail.contains("Capabilities:\n"));
        // Marker prefix is stripped from capability names
        assert!(detail.contains(" - privileged-container"));
        assert!(detail.contains(" - execution-role-ecr-pull"));
        // Internal API capabilities are excluded entirely
        assert!(!detail.contains("docker-remote-api"));

        // Capabilities are sorted
        let execution = detail.find("execution-role-ecr-pull").unwrap();
        let privileged = detail.find("privileged-container").unwrap();
        assert!(execution < privileged);
    }

    #[test]
    fn test_event_line() {
        no_color();
        let event = ServiceEvent {
            created_at: Some(Utc.with_ymd_and_hms(2026, 7, 1, 12, 30, 0).unwrap()),
            message: "(service web) has reached a steady state.".to_string(),
        };
        assert_eq!(
            event_line(&event),
            "2026-07-01 12:30:00 UTC: (service web) has reached a steady state."
        );
    }

    #[test]
    fn test_cluster_row() {
        no_color();
        let cluster = Cluster {
            name: "prod".to_string(),
            arn: "arn:aws:ecs:us-east-1:123456789012:cluster/prod".to_string(),
            status: "ACTIVE".to_string(),
            active_services_count: 12,
            running_tasks_count: 40,
            pending_tasks_count: 2,
            registered_container_instances_count: 5,
        };

        let row = cluster_row(&cluster);
        assert!(row.starts_with("prod"));
        assert!(row.contains("ACTIVE"));
        assert!(row.contains("12"));
        assert!(row.contains("40"));
    }
}

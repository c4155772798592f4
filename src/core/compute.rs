use serde::Serialize;

pub const CONTAINER_IMAGE: &str =
    "914698808609.dkr.ecr.eu-west-1.amazonaws.com/api-pipeline-images:latest";
pub const CONTAINER_NAME: &str = "web";
pub const CONTAINER_PORT: u16 = 80;
pub const TASK_MEMORY_MIB: u32 = 512;
pub const TASK_CPU_UNITS: u32 = 256;
pub const DESIRED_COUNT: u32 = 1;
pub const LOG_RETENTION_DAYS: u32 = 30;

/// Registry-read actions granted to the execution role when enabled.
pub const REGISTRY_PULL_ACTIONS: [&str; 4] = [
    "ecr:GetAuthorizationToken",
    "ecr:BatchCheckLayerAvailability",
    "ecr:GetDownloadUrlForLayer",
    "ecr:BatchGetImage",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub container_insights: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeploymentController {
    /// ECS rolling update.
    Ecs,
}

impl DeploymentController {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentController::Ecs => "ECS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwsLogs {
    pub stream_prefix: String,
    pub retention_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub port: u16,
    pub logging: AwsLogs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeService {
    pub memory_mib: u32,
    pub cpu: u32,
    pub desired_count: u32,
    pub assign_public_ip: bool,
    pub deployment_controller: DeploymentController,
    pub container: ContainerSpec,
    /// Extra grant on the execution role, beyond log writes.
    pub registry_pull: Option<PolicyStatement>,
}

impl ComputeService {
    /// Fixed sizing; only the log prefix and the optional registry grant vary.
    pub fn new(stream_prefix: &str, registry_pull_resource: Option<&str>) -> Self {
        Self {
            memory_mib: TASK_MEMORY_MIB,
            cpu: TASK_CPU_UNITS,
            desired_count: DESIRED_COUNT,
            assign_public_ip: true,
            deployment_controller: DeploymentController::Ecs,
            container: ContainerSpec {
                name: CONTAINER_NAME.to_string(),
                image: CONTAINER_IMAGE.to_string(),
                port: CONTAINER_PORT,
                logging: AwsLogs {
                    stream_prefix: stream_prefix.to_string(),
                    retention_days: LOG_RETENTION_DAYS,
                },
            },
            registry_pull: registry_pull_resource.map(|resource| PolicyStatement {
                actions: REGISTRY_PULL_ACTIONS.iter().map(|a| a.to_string()).collect(),
                resources: vec![resource.to_string()],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing_is_fixed() {
        let service = ComputeService::new("DeploymentApiStack", None);
        assert_eq!(service.memory_mib, 512);
        assert_eq!(service.cpu, 256);
        assert_eq!(service.desired_count, 1);
        assert_eq!(service.container.port, 80);
        assert!(service.container.image.ends_with(":latest"));
        assert_eq!(service.deployment_controller.as_str(), "ECS");
        assert!(service.registry_pull.is_none());
    }

    #[test]
    fn test_registry_pull_grant_lists_exact_actions() {
        let service = ComputeService::new("DeploymentApiStack", Some("*"));
        let grant = service.registry_pull.unwrap();
        assert_eq!(grant.actions, REGISTRY_PULL_ACTIONS.to_vec());
        assert_eq!(grant.resources, vec!["*"]);
    }
}

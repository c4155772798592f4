//! Renders an [`InfrastructureGraph`] as a CloudFormation template.
//!
//! Logical ids are fixed and resources are kept in ordered maps, so rendering the
//! same graph twice yields byte-identical JSON. CloudFormation diffs that JSON
//! against the deployed stack; nothing here tracks previous state.

use crate::core::compute::ComputeService;
use crate::core::declaration::InfrastructureGraph;
use crate::core::edge::{CertificateValidation, HTTP_PORT};
use crate::core::network::{AvailabilityZone, NetworkTopology, Subnet, SubnetType};
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const VPC_ID: &str = "ApiVpc";
pub const INTERNET_GATEWAY_ID: &str = "ApiVpcIGW";
pub const GATEWAY_ATTACHMENT_ID: &str = "ApiVpcVPCGW";
pub const CLUSTER_ID: &str = "ApiCluster";
pub const CERTIFICATE_ID: &str = "ApiHttpsFargateAlbCertificate";
pub const RECORD_ID: &str = "ApiHttpsFargateAlbARecord";
pub const LOAD_BALANCER_ID: &str = "ApiAlbFargateLB";
pub const LB_SECURITY_GROUP_ID: &str = "ApiAlbFargateLBSecurityGroup";
pub const HTTPS_LISTENER_ID: &str = "ApiAlbFargateLBPublicListener";
pub const TARGET_GROUP_ID: &str = "ApiAlbFargateLBPublicListenerECSGroup";
pub const REDIRECT_LISTENER_ID: &str = "ApiAlbFargateLBPublicRedirectListener";
pub const LOG_GROUP_ID: &str = "ApiAlbFargateTaskDefwebLogGroup";
pub const TASK_ROLE_ID: &str = "ApiAlbFargateTaskDefTaskRole";
pub const EXECUTION_ROLE_ID: &str = "ApiAlbFargateTaskDefExecutionRole";
pub const EXECUTION_POLICY_ID: &str = "ApiAlbFargateTaskDefExecutionRoleDefaultPolicy";
pub const REGISTRY_PULL_POLICY_ID: &str = "ApiAlbFargateTaskDefExecutionRoleRegistryPullPolicy";
pub const TASK_DEFINITION_ID: &str = "ApiAlbFargateTaskDef";
pub const SERVICE_ID: &str = "ApiAlbFargateService";
pub const SERVICE_SECURITY_GROUP_ID: &str = "ApiAlbFargateServiceSecurityGroup";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    pub properties: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
}

impl Resource {
    pub fn new(resource_type: &str, properties: Value) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            properties,
            depends_on: Vec::new(),
            update_replace_policy: None,
            deletion_policy: None,
        }
    }

    pub fn depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self.depends_on.sort();
        self.depends_on.dedup();
        self
    }

    pub fn retained(mut self) -> Self {
        self.update_replace_policy = Some("Retain".to_string());
        self.deletion_policy = Some("Retain".to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub description: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, Resource>,
    #[serde(rename = "Outputs")]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }

    pub fn count_of_type(&self, resource_type: &str) -> usize {
        self.resources_of_type(resource_type).count()
    }
}

fn cfn_ref(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

fn az_value(az: &AvailabilityZone) -> Value {
    match az {
        AvailabilityZone::Named(name) => json!(name),
        AvailabilityZone::Indexed(i) => json!({ "Fn::Select": [i, { "Fn::GetAZs": "" }] }),
    }
}

fn region_value(region: Option<&str>) -> Value {
    match region {
        Some(region) => json!(region),
        None => cfn_ref("AWS::Region"),
    }
}

fn name_tag(stack_name: &str, path: &str) -> Value {
    json!([{ "Key": "Name", "Value": format!("{}/{}", stack_name, path) }])
}

fn assume_role_policy(service: &str) -> Value {
    json!({
        "Statement": [{
            "Action": "sts:AssumeRole",
            "Effect": "Allow",
            "Principal": { "Service": service }
        }],
        "Version": "2012-10-17"
    })
}

struct TemplateBuilder<'a> {
    graph: &'a InfrastructureGraph,
    resources: BTreeMap<String, Resource>,
}

impl<'a> TemplateBuilder<'a> {
    fn new(graph: &'a InfrastructureGraph) -> Self {
        Self {
            graph,
            resources: BTreeMap::new(),
        }
    }

    fn add(&mut self, logical_id: impl Into<String>, resource: Resource) {
        self.resources.insert(logical_id.into(), resource);
    }

    fn subnet_refs<'s>(subnets: impl Iterator<Item = &'s Subnet>) -> Vec<Value> {
        subnets
            .map(|s| cfn_ref(&format!("{}Subnet", s.logical_prefix())))
            .collect()
    }

    fn public_default_routes(network: &NetworkTopology) -> Vec<String> {
        network
            .public_subnets()
            .map(|s| format!("{}DefaultRoute", s.logical_prefix()))
            .collect()
    }

    fn network(&mut self) {
        let graph = self.graph;
        let stack = graph.stack_name.as_str();
        let network = &graph.network;

        self.add(
            VPC_ID,
            Resource::new(
                "AWS::EC2::VPC",
                json!({
                    "CidrBlock": network.cidr_block,
                    "EnableDnsHostnames": true,
                    "EnableDnsSupport": true,
                    "InstanceTenancy": "default",
                    "Tags": name_tag(stack, VPC_ID)
                }),
            ),
        );
        self.add(
            INTERNET_GATEWAY_ID,
            Resource::new(
                "AWS::EC2::InternetGateway",
                json!({ "Tags": name_tag(stack, VPC_ID) }),
            ),
        );
        self.add(
            GATEWAY_ATTACHMENT_ID,
            Resource::new(
                "AWS::EC2::VPCGatewayAttachment",
                json!({
                    "InternetGatewayId": cfn_ref(INTERNET_GATEWAY_ID),
                    "VpcId": cfn_ref(VPC_ID)
                }),
            ),
        );

        let nat_gateway_id = network
            .nat_subnet()
            .map(|s| format!("{}NATGateway", s.logical_prefix()));

        for subnet in &network.subnets {
            let prefix = subnet.logical_prefix();
            let subnet_id = format!("{}Subnet", prefix);
            let route_table_id = format!("{}RouteTable", prefix);
            let is_public = subnet.subnet_type == SubnetType::Public;
            let subnet_type_tag = if is_public { "Public" } else { "Private" };

            self.add(
                &subnet_id,
                Resource::new(
                    "AWS::EC2::Subnet",
                    json!({
                        "AvailabilityZone": az_value(&subnet.availability_zone),
                        "CidrBlock": subnet.cidr_block,
                        "MapPublicIpOnLaunch": is_public,
                        "Tags": [
                            { "Key": "deployment-api:subnet-name", "Value": subnet.subnet_type.group_name() },
                            { "Key": "deployment-api:subnet-type", "Value": subnet_type_tag },
                            { "Key": "Name", "Value": format!("{}/{}/{}", stack, VPC_ID, prefix) }
                        ],
                        "VpcId": cfn_ref(VPC_ID)
                    }),
                ),
            );
            self.add(
                &route_table_id,
                Resource::new(
                    "AWS::EC2::RouteTable",
                    json!({
                        "Tags": name_tag(stack, &format!("{}/{}", VPC_ID, prefix)),
                        "VpcId": cfn_ref(VPC_ID)
                    }),
                ),
            );
            self.add(
                format!("{}RouteTableAssociation", prefix),
                Resource::new(
                    "AWS::EC2::SubnetRouteTableAssociation",
                    json!({
                        "RouteTableId": cfn_ref(&route_table_id),
                        "SubnetId": cfn_ref(&subnet_id)
                    }),
                ),
            );

            let route = if is_public {
                Resource::new(
                    "AWS::EC2::Route",
                    json!({
                        "DestinationCidrBlock": "0.0.0.0/0",
                        "GatewayId": cfn_ref(INTERNET_GATEWAY_ID),
                        "RouteTableId": cfn_ref(&route_table_id)
                    }),
                )
                .depends_on([GATEWAY_ATTACHMENT_ID])
            } else {
                match &nat_gateway_id {
                    Some(nat) => Resource::new(
                        "AWS::EC2::Route",
                        json!({
                            "DestinationCidrBlock": "0.0.0.0/0",
                            "NatGatewayId": cfn_ref(nat),
                            "RouteTableId": cfn_ref(&route_table_id)
                        }),
                    ),
                    None => continue,
                }
            };
            self.add(format!("{}DefaultRoute", prefix), route);
        }

        if let Some(nat_subnet) = network.nat_subnet() {
            let prefix = nat_subnet.logical_prefix();
            let eip_id = format!("{}EIP", prefix);
            self.add(
                &eip_id,
                Resource::new(
                    "AWS::EC2::EIP",
                    json!({
                        "Domain": "vpc",
                        "Tags": name_tag(stack, &format!("{}/{}", VPC_ID, prefix))
                    }),
                ),
            );
            self.add(
                format!("{}NATGateway", prefix),
                Resource::new(
                    "AWS::EC2::NatGateway",
                    json!({
                        "AllocationId": get_att(&eip_id, "AllocationId"),
                        "SubnetId": cfn_ref(&format!("{}Subnet", prefix)),
                        "Tags": name_tag(stack, &format!("{}/{}", VPC_ID, prefix))
                    }),
                )
                .depends_on([
                    format!("{}DefaultRoute", prefix),
                    format!("{}RouteTableAssociation", prefix),
                ]),
            );
        }
    }

    fn cluster(&mut self) {
        let insights = if self.graph.cluster.container_insights {
            "enabled"
        } else {
            "disabled"
        };
        self.add(
            CLUSTER_ID,
            Resource::new(
                "AWS::ECS::Cluster",
                json!({
                    "ClusterSettings": [{ "Name": "containerInsights", "Value": insights }]
                }),
            ),
        );
    }

    fn certificate(&mut self) {
        let graph = self.graph;
        let certificate = &graph.edge.certificate;
        let validation_method = match certificate.validation {
            CertificateValidation::Dns => "DNS",
        };
        self.add(
            CERTIFICATE_ID,
            Resource::new(
                "AWS::CertificateManager::Certificate",
                json!({
                    "DomainName": certificate.domain_name,
                    "DomainValidationOptions": [{
                        "DomainName": certificate.domain_name,
                        "HostedZoneId": certificate.validation_zone_id
                    }],
                    "Tags": name_tag(&graph.stack_name, CERTIFICATE_ID),
                    "ValidationMethod": validation_method
                }),
            ),
        );
    }

    fn load_balancer(&mut self) {
        let graph = self.graph;
        let network = &graph.network;
        let service = &graph.service;
        let listener = &graph.edge.listener;

        self.add(
            LB_SECURITY_GROUP_ID,
            Resource::new(
                "AWS::EC2::SecurityGroup",
                json!({
                    "GroupDescription": format!("Automatically created Security Group for ELB {}{}", graph.stack_name, LOAD_BALANCER_ID),
                    "SecurityGroupIngress": [
                        {
                            "CidrIp": "0.0.0.0/0",
                            "Description": format!("Allow from anyone on port {}", listener.port),
                            "FromPort": listener.port,
                            "IpProtocol": "tcp",
                            "ToPort": listener.port
                        },
                        {
                            "CidrIp": "0.0.0.0/0",
                            "Description": format!("Allow from anyone on port {}", HTTP_PORT),
                            "FromPort": HTTP_PORT,
                            "IpProtocol": "tcp",
                            "ToPort": HTTP_PORT
                        }
                    ],
                    "VpcId": cfn_ref(VPC_ID)
                }),
            ),
        );
        self.add(
            format!("{}toServiceEgress", LB_SECURITY_GROUP_ID),
            Resource::new(
                "AWS::EC2::SecurityGroupEgress",
                json!({
                    "Description": "Load balancer to target",
                    "DestinationSecurityGroupId": get_att(SERVICE_SECURITY_GROUP_ID, "GroupId"),
                    "FromPort": service.container.port,
                    "GroupId": get_att(LB_SECURITY_GROUP_ID, "GroupId"),
                    "IpProtocol": "tcp",
                    "ToPort": service.container.port
                }),
            ),
        );
        self.add(
            LOAD_BALANCER_ID,
            Resource::new(
                "AWS::ElasticLoadBalancingV2::LoadBalancer",
                json!({
                    "LoadBalancerAttributes": [
                        { "Key": "deletion_protection.enabled", "Value": "false" }
                    ],
                    "Scheme": "internet-facing",
                    "SecurityGroups": [get_att(LB_SECURITY_GROUP_ID, "GroupId")],
                    "Subnets": Self::subnet_refs(network.public_subnets()),
                    "Type": "application"
                }),
            )
            .depends_on(Self::public_default_routes(network)),
        );
        self.add(
            TARGET_GROUP_ID,
            Resource::new(
                "AWS::ElasticLoadBalancingV2::TargetGroup",
                json!({
                    "Port": service.container.port,
                    "Protocol": "HTTP",
                    "TargetGroupAttributes": [
                        { "Key": "stickiness.enabled", "Value": "false" }
                    ],
                    "TargetType": "ip",
                    "VpcId": cfn_ref(VPC_ID)
                }),
            ),
        );
        self.add(
            HTTPS_LISTENER_ID,
            Resource::new(
                "AWS::ElasticLoadBalancingV2::Listener",
                json!({
                    "Certificates": [{ "CertificateArn": cfn_ref(CERTIFICATE_ID) }],
                    "DefaultActions": [{
                        "TargetGroupArn": cfn_ref(TARGET_GROUP_ID),
                        "Type": "forward"
                    }],
                    "LoadBalancerArn": cfn_ref(LOAD_BALANCER_ID),
                    "Port": listener.port,
                    "Protocol": "HTTPS"
                }),
            ),
        );

        if listener.redirect_http {
            self.add(
                REDIRECT_LISTENER_ID,
                Resource::new(
                    "AWS::ElasticLoadBalancingV2::Listener",
                    json!({
                        "DefaultActions": [{
                            "RedirectConfig": {
                                "Port": listener.port.to_string(),
                                "Protocol": "HTTPS",
                                "StatusCode": "HTTP_301"
                            },
                            "Type": "redirect"
                        }],
                        "LoadBalancerArn": cfn_ref(LOAD_BALANCER_ID),
                        "Port": HTTP_PORT,
                        "Protocol": "HTTP"
                    }),
                ),
            );
        }
    }

    fn execution_role(&mut self, service: &ComputeService) {
        self.add(
            EXECUTION_ROLE_ID,
            Resource::new(
                "AWS::IAM::Role",
                json!({ "AssumeRolePolicyDocument": assume_role_policy("ecs-tasks.amazonaws.com") }),
            ),
        );
        self.add(
            EXECUTION_POLICY_ID,
            Resource::new(
                "AWS::IAM::Policy",
                json!({
                    "PolicyDocument": {
                        "Statement": [{
                            "Action": ["logs:CreateLogStream", "logs:PutLogEvents"],
                            "Effect": "Allow",
                            "Resource": get_att(LOG_GROUP_ID, "Arn")
                        }],
                        "Version": "2012-10-17"
                    },
                    "PolicyName": EXECUTION_POLICY_ID,
                    "Roles": [cfn_ref(EXECUTION_ROLE_ID)]
                }),
            ),
        );

        if let Some(grant) = &service.registry_pull {
            let resource = match grant.resources.as_slice() {
                [single] => json!(single),
                many => json!(many),
            };
            self.add(
                REGISTRY_PULL_POLICY_ID,
                Resource::new(
                    "AWS::IAM::Policy",
                    json!({
                        "PolicyDocument": {
                            "Statement": [{
                                "Action": grant.actions,
                                "Effect": "Allow",
                                "Resource": resource
                            }],
                            "Version": "2012-10-17"
                        },
                        "PolicyName": REGISTRY_PULL_POLICY_ID,
                        "Roles": [cfn_ref(EXECUTION_ROLE_ID)]
                    }),
                ),
            );
        }
    }

    fn service(&mut self) {
        let graph = self.graph;
        let service = &graph.service;
        let container = &service.container;

        self.add(
            LOG_GROUP_ID,
            Resource::new(
                "AWS::Logs::LogGroup",
                json!({ "RetentionInDays": container.logging.retention_days }),
            )
            .retained(),
        );
        self.add(
            TASK_ROLE_ID,
            Resource::new(
                "AWS::IAM::Role",
                json!({ "AssumeRolePolicyDocument": assume_role_policy("ecs-tasks.amazonaws.com") }),
            ),
        );
        self.execution_role(service);

        self.add(
            TASK_DEFINITION_ID,
            Resource::new(
                "AWS::ECS::TaskDefinition",
                json!({
                    "ContainerDefinitions": [{
                        "Essential": true,
                        "Image": container.image,
                        "LogConfiguration": {
                            "LogDriver": "awslogs",
                            "Options": {
                                "awslogs-group": cfn_ref(LOG_GROUP_ID),
                                "awslogs-region": region_value(graph.region.as_deref()),
                                "awslogs-stream-prefix": container.logging.stream_prefix
                            }
                        },
                        "Name": container.name,
                        "PortMappings": [{ "ContainerPort": container.port, "Protocol": "tcp" }]
                    }],
                    "Cpu": service.cpu.to_string(),
                    "ExecutionRoleArn": get_att(EXECUTION_ROLE_ID, "Arn"),
                    "Family": format!("{}{}", graph.stack_name, TASK_DEFINITION_ID),
                    "Memory": service.memory_mib.to_string(),
                    "NetworkMode": "awsvpc",
                    "RequiresCompatibilities": ["FARGATE"],
                    "TaskRoleArn": get_att(TASK_ROLE_ID, "Arn")
                }),
            ),
        );

        self.add(
            SERVICE_SECURITY_GROUP_ID,
            Resource::new(
                "AWS::EC2::SecurityGroup",
                json!({
                    "GroupDescription": format!("{}/{}", graph.stack_name, SERVICE_SECURITY_GROUP_ID),
                    "SecurityGroupEgress": [{
                        "CidrIp": "0.0.0.0/0",
                        "Description": "Allow all outbound traffic by default",
                        "IpProtocol": "-1"
                    }],
                    "VpcId": cfn_ref(VPC_ID)
                }),
            ),
        );
        self.add(
            format!("{}fromLoadBalancerIngress", SERVICE_SECURITY_GROUP_ID),
            Resource::new(
                "AWS::EC2::SecurityGroupIngress",
                json!({
                    "Description": "Load balancer to target",
                    "FromPort": container.port,
                    "GroupId": get_att(SERVICE_SECURITY_GROUP_ID, "GroupId"),
                    "IpProtocol": "tcp",
                    "SourceSecurityGroupId": get_att(LB_SECURITY_GROUP_ID, "GroupId"),
                    "ToPort": container.port
                }),
            ),
        );

        let subnets = Self::subnet_refs(if service.assign_public_ip {
            graph.network.public_subnets().collect::<Vec<_>>().into_iter()
        } else {
            graph.network.private_subnets().collect::<Vec<_>>().into_iter()
        });

        let assign_public_ip = if service.assign_public_ip {
            "ENABLED"
        } else {
            "DISABLED"
        };

        let mut depends_on = vec![
            HTTPS_LISTENER_ID.to_string(),
            TARGET_GROUP_ID.to_string(),
            TASK_ROLE_ID.to_string(),
        ];
        if service.registry_pull.is_some() {
            // 拉取映像前需要先有權限
            depends_on.push(REGISTRY_PULL_POLICY_ID.to_string());
        }

        self.add(
            SERVICE_ID,
            Resource::new(
                "AWS::ECS::Service",
                json!({
                    "Cluster": cfn_ref(CLUSTER_ID),
                    "DeploymentConfiguration": {
                        "MaximumPercent": 200,
                        "MinimumHealthyPercent": 50
                    },
                    "DeploymentController": { "Type": service.deployment_controller.as_str() },
                    "DesiredCount": service.desired_count,
                    "EnableECSManagedTags": false,
                    "HealthCheckGracePeriodSeconds": 60,
                    "LaunchType": "FARGATE",
                    "LoadBalancers": [{
                        "ContainerName": container.name,
                        "ContainerPort": container.port,
                        "TargetGroupArn": cfn_ref(TARGET_GROUP_ID)
                    }],
                    "NetworkConfiguration": {
                        "AwsvpcConfiguration": {
                            "AssignPublicIp": assign_public_ip,
                            "SecurityGroups": [get_att(SERVICE_SECURITY_GROUP_ID, "GroupId")],
                            "Subnets": subnets
                        }
                    },
                    "TaskDefinition": cfn_ref(TASK_DEFINITION_ID)
                }),
            )
            .depends_on(depends_on),
        );
    }

    fn dns_record(&mut self) {
        let graph = self.graph;
        let record = &graph.edge.alias_record;
        self.add(
            RECORD_ID,
            Resource::new(
                "AWS::Route53::RecordSet",
                json!({
                    "AliasTarget": {
                        "DNSName": {
                            "Fn::Join": ["", ["dualstack.", get_att(LOAD_BALANCER_ID, "DNSName")]]
                        },
                        "HostedZoneId": get_att(LOAD_BALANCER_ID, "CanonicalHostedZoneID")
                    },
                    "HostedZoneId": record.zone_id,
                    "Name": format!("{}.", record.name),
                    "Type": "A"
                }),
            ),
        );
    }

    fn finish(self) -> Template {
        let graph = self.graph;
        let mut outputs = BTreeMap::new();
        outputs.insert(
            "LoadBalancerDNS".to_string(),
            Output {
                description: "Public DNS name of the application load balancer".to_string(),
                value: get_att(LOAD_BALANCER_ID, "DNSName"),
            },
        );
        outputs.insert(
            "ServiceURL".to_string(),
            Output {
                description: "HTTPS endpoint of the API".to_string(),
                value: json!(format!("https://{}", graph.edge.alias_record.name)),
            },
        );

        Template {
            format_version: "2010-09-09".to_string(),
            description: format!("{}: load-balanced Fargate API", graph.stack_name),
            resources: self.resources,
            outputs,
        }
    }
}

impl InfrastructureGraph {
    pub fn to_template(&self) -> Template {
        let mut builder = TemplateBuilder::new(self);
        builder.network();
        builder.cluster();
        builder.certificate();
        builder.load_balancer();
        builder.service();
        builder.dns_record();
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::declaration::DeploymentDeclaration;
    use crate::domain::model::{ResolvedParameters, StackConfiguration};

    fn resolved() -> ResolvedParameters {
        ResolvedParameters {
            certificate_domain_name: "api.example.com".to_string(),
            hosted_zone_id: "Z123".to_string(),
            hosted_zone_name: "example.com".to_string(),
            a_record_name: "api".to_string(),
        }
    }

    fn render(config: StackConfiguration) -> Template {
        DeploymentDeclaration::new(config).build(&resolved()).to_template()
    }

    #[test]
    fn test_singleton_resources() {
        let template = render(StackConfiguration::default());
        assert_eq!(template.count_of_type("AWS::EC2::VPC"), 1);
        assert_eq!(template.count_of_type("AWS::ECS::Cluster"), 1);
        assert_eq!(template.count_of_type("AWS::ECS::Service"), 1);
        assert_eq!(template.count_of_type("AWS::CertificateManager::Certificate"), 1);
        assert_eq!(template.count_of_type("AWS::Route53::RecordSet"), 1);
        assert_eq!(template.count_of_type("AWS::EC2::NatGateway"), 1);
        assert_eq!(template.count_of_type("AWS::EC2::Subnet"), 6);
    }

    #[test]
    fn test_rendering_is_byte_stable() {
        let first = render(StackConfiguration::default()).to_json_pretty().unwrap();
        let second = render(StackConfiguration::default()).to_json_pretty().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_https_listener_and_redirect() {
        let template = render(StackConfiguration::default());

        let https = template.resource(HTTPS_LISTENER_ID).unwrap();
        assert_eq!(https.properties["Port"], 443);
        assert_eq!(https.properties["Protocol"], "HTTPS");
        assert_eq!(
            https.properties["Certificates"][0]["CertificateArn"],
            json!({ "Ref": CERTIFICATE_ID })
        );

        let redirect = template.resource(REDIRECT_LISTENER_ID).unwrap();
        assert_eq!(redirect.properties["Port"], 80);
        let action = &redirect.properties["DefaultActions"][0];
        assert_eq!(action["Type"], "redirect");
        assert_eq!(action["RedirectConfig"]["Protocol"], "HTTPS");
        assert_eq!(action["RedirectConfig"]["StatusCode"], "HTTP_301");
    }

    #[test]
    fn test_certificate_validated_against_zone() {
        let template = render(StackConfiguration::default());
        let cert = template.resource(CERTIFICATE_ID).unwrap();
        assert_eq!(cert.properties["ValidationMethod"], "DNS");
        assert_eq!(cert.properties["DomainName"], "api.example.com");
        assert_eq!(
            cert.properties["DomainValidationOptions"][0]["HostedZoneId"],
            "Z123"
        );
    }

    #[test]
    fn test_task_definition_sizing() {
        let template = render(StackConfiguration::default());
        let task = template.resource(TASK_DEFINITION_ID).unwrap();
        assert_eq!(task.properties["Cpu"], "256");
        assert_eq!(task.properties["Memory"], "512");

        let container = &task.properties["ContainerDefinitions"][0];
        assert_eq!(container["PortMappings"][0]["ContainerPort"], 80);
        assert_eq!(
            container["LogConfiguration"]["Options"]["awslogs-region"],
            json!({ "Ref": "AWS::Region" })
        );

        let service = template.resource(SERVICE_ID).unwrap();
        assert_eq!(service.properties["DesiredCount"], 1);
        assert_eq!(service.properties["DeploymentController"]["Type"], "ECS");
        assert_eq!(
            service.properties["NetworkConfiguration"]["AwsvpcConfiguration"]["AssignPublicIp"],
            "ENABLED"
        );

        let logs = template.resource(LOG_GROUP_ID).unwrap();
        assert_eq!(logs.properties["RetentionInDays"], 30);
        assert_eq!(logs.deletion_policy.as_deref(), Some("Retain"));
    }

    #[test]
    fn test_description_does_not_carry_record_name() {
        let template = render(StackConfiguration::default());
        assert_eq!(template.description, "DeploymentApiStack: load-balanced Fargate API");
        assert!(!template.description.contains("api.example.com"));
    }

    #[test]
    fn test_baseline_has_no_registry_pull_policy() {
        let template = render(StackConfiguration::default());
        assert!(template.resource(REGISTRY_PULL_POLICY_ID).is_none());
        assert_eq!(template.count_of_type("AWS::IAM::Policy"), 1);
    }

    #[test]
    fn test_region_is_literal_when_configured() {
        let template = render(StackConfiguration {
            region: Some("eu-west-1".to_string()),
            ..StackConfiguration::default()
        });
        let task = template.resource(TASK_DEFINITION_ID).unwrap();
        assert_eq!(
            task.properties["ContainerDefinitions"][0]["LogConfiguration"]["Options"]
                ["awslogs-region"],
            "eu-west-1"
        );
    }

    #[test]
    fn test_private_subnets_route_through_single_nat() {
        let template = render(StackConfiguration::default());
        for (id, route) in template.resources_of_type("AWS::EC2::Route") {
            if id.starts_with("ApiVpcPrivate") {
                assert_eq!(
                    route.properties["NatGatewayId"],
                    json!({ "Ref": "ApiVpcPublicSubnet1NATGateway" })
                );
            }
        }
    }
}

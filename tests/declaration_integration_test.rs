use anyhow::Result;
use deployment_api::config::seeder::seed_values_from_lookup;
use deployment_api::core::compute::REGISTRY_PULL_ACTIONS;
use deployment_api::core::template::{
    EXECUTION_ROLE_ID, LOAD_BALANCER_ID, RECORD_ID, REGISTRY_PULL_POLICY_ID,
};
use deployment_api::core::Storage;
use deployment_api::utils::validation::Validate;
use deployment_api::{
    DeploymentDeclaration, InMemoryParameterStore, LocalStorage, ParameterSeeder,
    StackConfiguration, TomlConfig,
};
use serde_json::json;
use std::collections::HashMap;
use tempfile::TempDir;

async fn seeded_store() -> InMemoryParameterStore {
    let env: HashMap<&str, &str> = [
        ("CERTIFICATE_DOMAIN_NAME", "api.example.com"),
        ("HOSTED_ZONE_ID", "Z123"),
        ("HOSTED_ZONE_NAME", "example.com"),
        ("A_RECORD_NAME", "api"),
    ]
    .into_iter()
    .collect();
    let values = seed_values_from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

    let store = InMemoryParameterStore::new();
    let report = ParameterSeeder::new(store.clone(), false)
        .seed(&values.parameters())
        .await;
    assert!(report.is_complete_success());
    store
}

#[tokio::test]
async fn test_seed_then_synthesize_alias_record() -> Result<()> {
    let store = seeded_store().await;
    let declaration = DeploymentDeclaration::new(StackConfiguration::default());

    let graph = declaration.synthesize(&store).await?;
    assert_eq!(graph.edge.alias_record.name, "api.example.com");
    assert_eq!(graph.edge.alias_record.zone_name, "example.com");

    let template = graph.to_template();
    let record = template.resource(RECORD_ID).expect("alias record");
    assert_eq!(record.properties["Name"], "api.example.com.");
    assert_eq!(record.properties["Type"], "A");
    assert_eq!(record.properties["HostedZoneId"], "Z123");
    assert_eq!(
        record.properties["AliasTarget"]["HostedZoneId"],
        json!({ "Fn::GetAtt": [LOAD_BALANCER_ID, "CanonicalHostedZoneID"] })
    );
    assert_eq!(
        template.outputs["ServiceURL"].value,
        json!("https://api.example.com")
    );
    Ok(())
}

#[tokio::test]
async fn test_repeated_evaluation_produces_identical_template() -> Result<()> {
    let store = seeded_store().await;
    let declaration = DeploymentDeclaration::new(StackConfiguration::default());

    let first = declaration.synthesize(&store).await?.to_template();
    let second = declaration.synthesize(&store).await?.to_template();

    assert_eq!(first.to_json_pretty()?, second.to_json_pretty()?);
    for resource_type in [
        "AWS::EC2::VPC",
        "AWS::ECS::Cluster",
        "AWS::ECS::Service",
        "AWS::CertificateManager::Certificate",
        "AWS::Route53::RecordSet",
        "AWS::ElasticLoadBalancingV2::LoadBalancer",
    ] {
        assert_eq!(second.count_of_type(resource_type), 1, "{}", resource_type);
    }
    Ok(())
}

#[tokio::test]
async fn test_subnets_follow_zone_count_and_cap() -> Result<()> {
    let store = seeded_store().await;

    for (requested, expected_zones) in [(1, 1), (2, 2), (3, 3), (5, 3)] {
        let config = StackConfiguration {
            max_azs: requested,
            ..StackConfiguration::default()
        };
        let template = DeploymentDeclaration::new(config)
            .synthesize(&store)
            .await?
            .to_template();

        assert_eq!(
            template.count_of_type("AWS::EC2::Subnet"),
            2 * expected_zones,
            "max_azs = {}",
            requested
        );
        assert_eq!(template.count_of_type("AWS::EC2::NatGateway"), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_registry_pull_variant_grants_exact_actions() -> Result<()> {
    let store = seeded_store().await;
    let config = StackConfiguration {
        grant_registry_pull: true,
        ..StackConfiguration::default()
    };
    let template = DeploymentDeclaration::new(config)
        .synthesize(&store)
        .await?
        .to_template();

    let policy = template
        .resource(REGISTRY_PULL_POLICY_ID)
        .expect("registry pull policy");
    let statements = policy.properties["PolicyDocument"]["Statement"]
        .as_array()
        .expect("statements");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0]["Action"], json!(REGISTRY_PULL_ACTIONS));
    assert_eq!(statements[0]["Resource"], "*");
    assert_eq!(
        policy.properties["Roles"],
        json!([{ "Ref": EXECUTION_ROLE_ID }])
    );
    Ok(())
}

#[tokio::test]
async fn test_toml_config_and_local_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = seeded_store().await;

    let config = TomlConfig::from_toml_str(
        r#"
[stack]
name = "StagingApiStack"
region = "eu-west-1"

[network]
max_azs = 2
"#,
    )?;
    config.validate()?;

    let stack = config.to_stack_configuration();
    let template = DeploymentDeclaration::new(stack.clone())
        .synthesize(&store)
        .await?
        .to_template();

    let storage = LocalStorage::new(temp_dir.path().display().to_string());
    let path = storage
        .write_file(
            &format!("{}.template.json", stack.stack_name),
            template.to_json_pretty()?.as_bytes(),
        )
        .await?;

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["AWSTemplateFormatVersion"], "2010-09-09");
    assert_eq!(
        written["Resources"]["ApiAlbFargateTaskDef"]["Properties"]["ContainerDefinitions"][0]
            ["LogConfiguration"]["Options"]["awslogs-stream-prefix"],
        "StagingApiStack"
    );
    assert!(written["Resources"]["ApiVpcPublicSubnet3Subnet"].is_null());
    assert!(written["Resources"]["ApiVpcPrivateSubnet2Subnet"].is_object());
    Ok(())
}

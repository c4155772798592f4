use deployment_api::config::seeder::{load_env_file, seed_values_from_lookup};
use deployment_api::core::seeder::SeedStatus;
use deployment_api::core::ParameterStore;
use deployment_api::utils::validation::Validate;
use deployment_api::{InMemoryParameterStore, ParameterSeeder};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_env_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[tokio::test]
async fn test_env_file_to_fixed_parameter_paths() -> anyhow::Result<()> {
    let env_file = write_env_file(&[
        "CERTIFICATE_DOMAIN_NAME=api.example.com",
        "HOSTED_ZONE_ID=Z123",
        "HOSTED_ZONE_NAME=example.com",
        "A_RECORD_NAME=api",
    ]);

    let vars = load_env_file(env_file.path())?;
    let values = seed_values_from_lookup(|k| vars.get(k).cloned())?;

    let store = InMemoryParameterStore::new();
    let report = ParameterSeeder::new(store.clone(), false)
        .seed(&values.parameters())
        .await;

    assert!(report.is_complete_success());
    assert_eq!(store.len().await, 4);
    assert_eq!(store.get_parameter("/api/certificateDomainName").await?, "api.example.com");
    assert_eq!(store.get_parameter("/api/hostedZoneId").await?, "Z123");
    assert_eq!(store.get_parameter("/api/hostedZoneName").await?, "example.com");
    assert_eq!(store.get_parameter("/api/aRecordName").await?, "api");
    Ok(())
}

#[tokio::test]
async fn test_quoted_env_values_are_seeded_without_quotes() -> anyhow::Result<()> {
    let env_file = write_env_file(&[
        "# production zone",
        "CERTIFICATE_DOMAIN_NAME=\"api.example.com\"  # certificate",
        "HOSTED_ZONE_ID=\"Z123\" # prod zone",
        "HOSTED_ZONE_NAME='example.com'  # apex",
        "A_RECORD_NAME=\"api\" # subdomain",
    ]);

    let vars = load_env_file(env_file.path())?;
    let values = seed_values_from_lookup(|k| vars.get(k).cloned())?;
    values.validate()?;

    let store = InMemoryParameterStore::new();
    ParameterSeeder::new(store.clone(), false)
        .seed(&values.parameters())
        .await;

    assert_eq!(store.get_parameter("/api/certificateDomainName").await?, "api.example.com");
    assert_eq!(store.get_parameter("/api/hostedZoneId").await?, "Z123");
    assert_eq!(store.get_parameter("/api/hostedZoneName").await?, "example.com");
    assert_eq!(store.get_parameter("/api/aRecordName").await?, "api");
    Ok(())
}

#[tokio::test]
async fn test_one_attempt_per_entry_even_when_all_fail() {
    let names = [
        "/api/certificateDomainName",
        "/api/hostedZoneId",
        "/api/hostedZoneName",
        "/api/aRecordName",
    ];
    let store = InMemoryParameterStore::rejecting(names);
    let values = seed_values_from_lookup(|k| {
        Some(match k {
            "CERTIFICATE_DOMAIN_NAME" => "api.example.com".to_string(),
            "HOSTED_ZONE_ID" => "Z123".to_string(),
            "HOSTED_ZONE_NAME" => "example.com".to_string(),
            _ => "api".to_string(),
        })
    })
    .unwrap();

    let report = ParameterSeeder::new(store.clone(), true)
        .seed(&values.parameters())
        .await;

    assert_eq!(store.put_attempts().await, names.to_vec());
    assert_eq!(report.failed().count(), 4);
    for outcome in &report.outcomes {
        match &outcome.status {
            SeedStatus::Failed { error } => assert!(error.contains(&outcome.name)),
            SeedStatus::Created => panic!("{} should have failed", outcome.name),
        }
    }
}

#[test]
fn test_seeding_with_blocking_runtime() {
    let store = InMemoryParameterStore::new();
    let values = seed_values_from_lookup(|k| Some(format!("{}-value", k.to_lowercase()))).unwrap();

    let report = tokio_test::block_on(
        ParameterSeeder::new(store.clone(), false).seed(&values.parameters()),
    );

    assert_eq!(report.succeeded().count(), 4);
    assert_eq!(
        tokio_test::block_on(store.get_parameter("/api/hostedZoneId")).unwrap(),
        "hosted_zone_id-value"
    );
}

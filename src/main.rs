use clap::Parser;
use deployment_api::config::seeder::seed_values_from_env_file;
use deployment_api::core::{StackDeployer, Storage};
use deployment_api::utils::{logger, validation::Validate};
use deployment_api::{
    CliConfig, CloudFormationDeployer, DeployError, DeploymentDeclaration, InMemoryParameterStore,
    LocalStorage, ParameterSeeder, SsmParameterStore, StackConfiguration,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("🚀 Starting deployment-api");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Deployment failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), DeployError> {
    config.validate()?;
    let stack = config.stack_configuration()?;
    stack.validate()?;

    let wait_timeout = Duration::from_secs(config.wait_timeout_secs);

    if config.destroy {
        let deployer = CloudFormationDeployer::from_region(stack.region.as_deref(), wait_timeout).await;
        deployer.destroy(&stack.stack_name).await?;
        println!("🗑️ Stack {} destroyed", stack.stack_name);
        return Ok(());
    }

    let declaration = DeploymentDeclaration::new(stack.clone());
    let graph = match &config.values_env_file {
        Some(path) => {
            tracing::info!("🔍 Resolving parameters from {} (offline)", path);
            let store = offline_store(path, &stack).await?;
            declaration.synthesize(&store).await?
        }
        None => {
            let store = SsmParameterStore::from_region(stack.region.as_deref()).await;
            declaration.synthesize(&store).await?
        }
    };

    let template = graph.to_template();
    let body = template.to_json_pretty()?;

    let storage = LocalStorage::new(config.output_dir.clone());
    let template_path = storage
        .write_file(&format!("{}.template.json", stack.stack_name), body.as_bytes())
        .await?;

    tracing::info!(
        "📁 Synthesized {} resources to {}",
        template.resources.len(),
        template_path
    );
    println!("✅ Synthesized {}", template_path);
    println!("🌐 https://{}", graph.edge.alias_record.name);

    if config.deploy {
        let deployer = CloudFormationDeployer::from_region(stack.region.as_deref(), wait_timeout).await;
        let outcome = deployer.deploy(&stack.stack_name, &body).await?;
        println!("✅ Stack {} {}", stack.stack_name, outcome.label());
    }

    Ok(())
}

/// Seeds an in-memory store from an env file under the configured names.
/// Process environment variables take precedence, as for `seed-params`.
async fn offline_store(
    path: &str,
    stack: &StackConfiguration,
) -> Result<InMemoryParameterStore, DeployError> {
    let values = seed_values_from_env_file(path)?;
    values.validate()?;

    let seeder = ParameterSeeder::new(InMemoryParameterStore::new(), true);
    let report = seeder
        .seed(&values.parameters_named(stack.parameter_names()))
        .await;
    if let Some(failed) = report.failed().next() {
        return Err(DeployError::ParameterStoreError {
            name: failed.name.clone(),
            message: "offline store rejected the value".to_string(),
        });
    }

    Ok(seeder.store().clone())
}

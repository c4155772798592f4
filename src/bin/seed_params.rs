use clap::Parser;
use deployment_api::config::seeder::DEFAULT_SEED_REGION;
use deployment_api::core::seeder::SeedReport;
use deployment_api::utils::{logger, validation::Validate};
use deployment_api::{InMemoryParameterStore, ParameterSeeder, SeederConfig, SsmParameterStore};

#[derive(Parser)]
#[command(name = "seed-params")]
#[command(about = "Write the API's DNS and certificate settings to SSM Parameter Store")]
struct Args {
    /// Env file holding CERTIFICATE_DOMAIN_NAME, HOSTED_ZONE_ID, HOSTED_ZONE_NAME, A_RECORD_NAME
    #[arg(short, long, default_value = ".env")]
    env_file: String,

    #[arg(long, default_value = DEFAULT_SEED_REGION)]
    region: String,

    /// Replace entries that already exist
    #[arg(long)]
    overwrite: bool,

    /// Write to an in-memory store instead of SSM
    #[arg(long)]
    dry_run: bool,

    /// Print the seed report as JSON on stdout
    #[arg(long)]
    report_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting parameter seeder");
    tracing::info!("📁 Loading values from: {}", args.env_file);

    let config = match SeederConfig::from_env_file(&args.env_file, args.region.clone(), args.overwrite)
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load seed values from '{}': {}", args.env_file, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let parameters = config.values.parameters();
    for param in &parameters {
        // 值是機密，只記錄名稱與類型
        tracing::info!("📝 {} ({})", param.name, param.parameter_type.as_str());
    }

    let report = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - writing to an in-memory store");
        ParameterSeeder::new(InMemoryParameterStore::new(), config.overwrite)
            .seed(&parameters)
            .await
    } else {
        let store = SsmParameterStore::from_region(Some(config.region.as_str())).await;
        ParameterSeeder::new(store, config.overwrite)
            .seed(&parameters)
            .await
    };

    print_summary(&report);
    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    // 個別參數失敗不影響結束碼
    Ok(())
}

fn print_summary(report: &SeedReport) {
    let succeeded = report.succeeded().count();
    let failed = report.failed().count();
    tracing::info!(
        "📊 Seeded {} of {} parameters in {}ms",
        succeeded,
        report.outcomes.len(),
        (report.finished_at - report.started_at).num_milliseconds()
    );

    if failed > 0 {
        eprintln!("⚠️ {} parameter(s) failed:", failed);
        for outcome in report.failed() {
            eprintln!("   - {}", outcome.name);
        }
    } else {
        println!("✅ All {} parameters written", succeeded);
    }
}

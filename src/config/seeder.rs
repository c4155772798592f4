use crate::domain::model::SeedValues;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{
    validate_aws_region, validate_domain_name, validate_hosted_zone_id, Validate,
};
use std::collections::HashMap;
use std::path::Path;

pub const ENV_CERTIFICATE_DOMAIN_NAME: &str = "CERTIFICATE_DOMAIN_NAME";
pub const ENV_HOSTED_ZONE_ID: &str = "HOSTED_ZONE_ID";
pub const ENV_HOSTED_ZONE_NAME: &str = "HOSTED_ZONE_NAME";
pub const ENV_A_RECORD_NAME: &str = "A_RECORD_NAME";

pub const DEFAULT_SEED_REGION: &str = "eu-west-1";

/// Explicit input for one seeder run.
#[derive(Debug, Clone)]
pub struct SeederConfig {
    pub region: String,
    pub overwrite: bool,
    pub values: SeedValues,
}

impl SeederConfig {
    pub fn from_env_file<P: AsRef<Path>>(env_file: P, region: String, overwrite: bool) -> Result<Self> {
        Ok(Self {
            region,
            overwrite,
            values: seed_values_from_env_file(env_file)?,
        })
    }
}

impl Validate for SeederConfig {
    fn validate(&self) -> Result<()> {
        validate_aws_region("region", &self.region)?;
        self.values.validate()?;

        tracing::info!("✅ Seeder configuration validation passed");
        Ok(())
    }
}

impl Validate for SeedValues {
    fn validate(&self) -> Result<()> {
        validate_domain_name(ENV_CERTIFICATE_DOMAIN_NAME, &self.certificate_domain_name)?;
        validate_hosted_zone_id(ENV_HOSTED_ZONE_ID, &self.hosted_zone_id)?;
        validate_domain_name(ENV_HOSTED_ZONE_NAME, &self.hosted_zone_name)?;
        validate_domain_name(ENV_A_RECORD_NAME, &self.a_record_name)?;
        Ok(())
    }
}

/// Reads the four values from `env_file`. Variables already set in the
/// process environment win over the file, as with dotenv.
pub fn seed_values_from_env_file<P: AsRef<Path>>(env_file: P) -> Result<SeedValues> {
    let file_vars = load_env_file(env_file)?;
    seed_values_layered(&file_vars, |key| std::env::var(key).ok())
}

/// `env` first, then `file_vars`.
pub fn seed_values_layered<E>(file_vars: &HashMap<String, String>, env: E) -> Result<SeedValues>
where
    E: Fn(&str) -> Option<String>,
{
    seed_values_from_lookup(|key| env(key).or_else(|| file_vars.get(key).cloned()))
}

pub fn seed_values_from_lookup<F>(lookup: F) -> Result<SeedValues>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |key: &str| {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DeployError::MissingConfigError {
                field: key.to_string(),
            })
    };

    Ok(SeedValues {
        certificate_domain_name: require(ENV_CERTIFICATE_DOMAIN_NAME)?,
        hosted_zone_id: require(ENV_HOSTED_ZONE_ID)?,
        hosted_zone_name: require(ENV_HOSTED_ZONE_NAME)?,
        a_record_name: require(ENV_A_RECORD_NAME)?,
    })
}

/// A missing file yields no variables; the process environment may still
/// supply everything.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    match dotenvy::from_path_iter(path) {
        Ok(iter) => collect_vars(iter, &path.display().to_string()),
        Err(e) if e.not_found() => {
            tracing::warn!("Env file {} not found, using process environment only", path.display());
            Ok(HashMap::new())
        }
        Err(e) => Err(env_file_error(&path.display().to_string(), e)),
    }
}

/// Parses `.env` content without touching the process environment.
pub fn parse_env_file(content: &str) -> Result<HashMap<String, String>> {
    collect_vars(dotenvy::from_read_iter(content.as_bytes()), "<inline>")
}

fn collect_vars<I>(iter: I, source: &str) -> Result<HashMap<String, String>>
where
    I: Iterator<Item = std::result::Result<(String, String), dotenvy::Error>>,
{
    iter.map(|item| item.map_err(|e| env_file_error(source, e)))
        .collect()
}

fn env_file_error(source: &str, e: dotenvy::Error) -> DeployError {
    DeployError::ConfigError {
        message: format!("cannot read env file {}: {}", source, e),
    }
}

pub mod cli;
pub mod seeder;
pub mod toml_config;

use crate::core::network::MAX_AVAILABILITY_ZONES;
use crate::domain::model::StackConfiguration;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{
    validate_aws_region, validate_non_empty_string, validate_parameter_name, validate_range,
    Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use std::collections::HashSet;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "deployment-api")]
#[command(about = "Synthesize and deploy the load-balanced API stack")]
pub struct CliConfig {
    /// Optional TOML stack configuration; flags below override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub stack_name: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub certificate_domain_name_parameter: Option<String>,

    #[arg(long)]
    pub hosted_zone_id_parameter: Option<String>,

    #[arg(long)]
    pub hosted_zone_name_parameter: Option<String>,

    #[arg(long)]
    pub a_record_name_parameter: Option<String>,

    #[arg(long)]
    pub max_azs: Option<usize>,

    #[arg(long, value_delimiter = ',')]
    pub availability_zones: Vec<String>,

    /// Attach the registry-pull policy to the task execution role
    #[arg(long)]
    pub grant_registry_pull: Option<bool>,

    #[arg(long)]
    pub registry_pull_resource: Option<String>,

    #[arg(long, default_value = "./synth.out")]
    pub output_dir: String,

    /// Resolve parameters from a local env file instead of SSM
    #[arg(long)]
    pub values_env_file: Option<String>,

    /// Submit the synthesized template to CloudFormation
    #[arg(long)]
    pub deploy: bool,

    /// Delete the stack instead of synthesizing
    #[arg(long, conflicts_with = "deploy")]
    pub destroy: bool,

    #[arg(long, default_value = "1800")]
    pub wait_timeout_secs: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// TOML file (if any) first, then command line overrides.
    pub fn stack_configuration(&self) -> Result<StackConfiguration> {
        let base = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                toml_config::TomlConfig::from_file(path)?.to_stack_configuration()
            }
            None => StackConfiguration::default(),
        };
        Ok(self.apply_overrides(base))
    }

    pub fn apply_overrides(&self, mut config: StackConfiguration) -> StackConfiguration {
        if let Some(name) = &self.stack_name {
            config.stack_name = name.clone();
        }
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        if let Some(name) = &self.certificate_domain_name_parameter {
            config.certificate_domain_name_parameter = name.clone();
        }
        if let Some(name) = &self.hosted_zone_id_parameter {
            config.hosted_zone_id_parameter = name.clone();
        }
        if let Some(name) = &self.hosted_zone_name_parameter {
            config.hosted_zone_name_parameter = name.clone();
        }
        if let Some(name) = &self.a_record_name_parameter {
            config.a_record_name_parameter = name.clone();
        }
        if let Some(max_azs) = self.max_azs {
            config.max_azs = max_azs;
        }
        if !self.availability_zones.is_empty() {
            config.availability_zones = Some(self.availability_zones.clone());
        }
        if let Some(grant) = self.grant_registry_pull {
            tracing::info!("🔧 Registry pull grant overridden to: {}", grant);
            config.grant_registry_pull = grant;
        }
        if let Some(resource) = &self.registry_pull_resource {
            config.registry_pull_resource = resource.clone();
        }
        config
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_range("wait_timeout_secs", self.wait_timeout_secs, 30, 43_200)?;
        validate_non_empty_string("output_dir", &self.output_dir)?;
        Ok(())
    }
}

impl Validate for StackConfiguration {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("stack_name", &self.stack_name)?;
        if !self
            .stack_name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            || !self
                .stack_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(DeployError::InvalidConfigValueError {
                field: "stack_name".to_string(),
                value: self.stack_name.clone(),
                reason: "Stack name must start with a letter and contain only letters, numbers, and hyphens"
                    .to_string(),
            });
        }

        let names = self.parameter_names();
        for (field, name) in [
            "certificate_domain_name_parameter",
            "hosted_zone_id_parameter",
            "hosted_zone_name_parameter",
            "a_record_name_parameter",
        ]
        .iter()
        .zip(names.iter())
        {
            validate_parameter_name(field, name)?;
        }
        let unique: HashSet<&str> = names.iter().copied().collect();
        if unique.len() != names.len() {
            return Err(DeployError::ConfigValidationError {
                field: "parameters".to_string(),
                message: "Each value must be read from a distinct parameter".to_string(),
            });
        }

        if let Some(region) = &self.region {
            validate_aws_region("region", region)?;
        }

        // 超過上限會被截斷，只拒絕 0
        if self.max_azs == 0 {
            return Err(DeployError::InvalidConfigValueError {
                field: "max_azs".to_string(),
                value: "0".to_string(),
                reason: "At least one availability zone is required".to_string(),
            });
        }
        if self.max_azs > MAX_AVAILABILITY_ZONES {
            tracing::warn!(
                "max_azs = {} exceeds {}, extra zones are ignored",
                self.max_azs,
                MAX_AVAILABILITY_ZONES
            );
        }
        if let Some(zones) = &self.availability_zones {
            for zone in zones {
                validate_aws_region("availability_zones", zone)?;
            }
        }

        if self.grant_registry_pull {
            validate_non_empty_string("registry_pull_resource", &self.registry_pull_resource)?;
        }

        tracing::info!("✅ Stack configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(StackConfiguration::default().validate().is_ok());
    }

    #[test]
    fn test_zero_azs_rejected() {
        let config = StackConfiguration {
            max_azs: 0,
            ..StackConfiguration::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_parameter_names_rejected() {
        let config = StackConfiguration {
            hosted_zone_name_parameter: "/api/hostedZoneId".to_string(),
            ..StackConfiguration::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_stack_name_rejected() {
        let config = StackConfiguration {
            stack_name: "1-api_stack".to_string(),
            ..StackConfiguration::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_take_precedence() {
        let cli = CliConfig::parse_from([
            "deployment-api",
            "--stack-name",
            "OverrideStack",
            "--max-azs",
            "2",
            "--grant-registry-pull",
            "true",
            "--availability-zones",
            "eu-west-1a,eu-west-1b",
        ]);

        let config = cli.apply_overrides(StackConfiguration::default());
        assert_eq!(config.stack_name, "OverrideStack");
        assert_eq!(config.max_azs, 2);
        assert!(config.grant_registry_pull);
        assert_eq!(
            config.availability_zones,
            Some(vec!["eu-west-1a".to_string(), "eu-west-1b".to_string()])
        );
        assert_eq!(config.hosted_zone_id_parameter, "/api/hostedZoneId");
    }
}

use crate::domain::model::{
    StackConfiguration, A_RECORD_NAME_PARAMETER, CERTIFICATE_DOMAIN_NAME_PARAMETER,
    DEFAULT_MAX_AZS, DEFAULT_REGISTRY_PULL_RESOURCE, DEFAULT_STACK_NAME,
    HOSTED_ZONE_ID_PARAMETER, HOSTED_ZONE_NAME_PARAMETER,
};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub stack: StackSection,
    #[serde(default)]
    pub parameters: ParametersSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub permissions: PermissionsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackSection {
    pub name: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParametersSection {
    pub certificate_domain_name: Option<String>,
    pub hosted_zone_id: Option<String>,
    pub hosted_zone_name: Option<String>,
    pub a_record_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSection {
    pub max_azs: Option<usize>,
    pub availability_zones: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionsSection {
    pub grant_registry_pull: Option<bool>,
    pub registry_pull_resource: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeployError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${AWS_REGION})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn to_stack_configuration(&self) -> StackConfiguration {
        let or = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        StackConfiguration {
            stack_name: or(&self.stack.name, DEFAULT_STACK_NAME),
            certificate_domain_name_parameter: or(
                &self.parameters.certificate_domain_name,
                CERTIFICATE_DOMAIN_NAME_PARAMETER,
            ),
            hosted_zone_id_parameter: or(&self.parameters.hosted_zone_id, HOSTED_ZONE_ID_PARAMETER),
            hosted_zone_name_parameter: or(
                &self.parameters.hosted_zone_name,
                HOSTED_ZONE_NAME_PARAMETER,
            ),
            a_record_name_parameter: or(&self.parameters.a_record_name, A_RECORD_NAME_PARAMETER),
            region: self.stack.region.clone(),
            max_azs: self.network.max_azs.unwrap_or(DEFAULT_MAX_AZS),
            availability_zones: self.network.availability_zones.clone(),
            grant_registry_pull: self.permissions.grant_registry_pull.unwrap_or(false),
            registry_pull_resource: or(
                &self.permissions.registry_pull_resource,
                DEFAULT_REGISTRY_PULL_RESOURCE,
            ),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_stack_configuration().validate()
    }
}

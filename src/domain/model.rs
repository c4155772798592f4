use serde::{Deserialize, Serialize};

pub const CERTIFICATE_DOMAIN_NAME_PARAMETER: &str = "/api/certificateDomainName";
pub const HOSTED_ZONE_ID_PARAMETER: &str = "/api/hostedZoneId";
pub const HOSTED_ZONE_NAME_PARAMETER: &str = "/api/hostedZoneName";
pub const A_RECORD_NAME_PARAMETER: &str = "/api/aRecordName";

pub const DEFAULT_STACK_NAME: &str = "DeploymentApiStack";
pub const DEFAULT_MAX_AZS: usize = 3;
pub const DEFAULT_REGISTRY_PULL_RESOURCE: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    SecureString,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "String",
            ParameterType::SecureString => "SecureString",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    pub parameter_type: ParameterType,
}

impl Parameter {
    pub fn secure(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            parameter_type: ParameterType::SecureString,
        }
    }
}

/// Seeder 的四個輸入值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedValues {
    pub certificate_domain_name: String,
    pub hosted_zone_id: String,
    pub hosted_zone_name: String,
    pub a_record_name: String,
}

impl SeedValues {
    /// Entries under the fixed `/api/*` namespace, in write order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameters_named([
            CERTIFICATE_DOMAIN_NAME_PARAMETER,
            HOSTED_ZONE_ID_PARAMETER,
            HOSTED_ZONE_NAME_PARAMETER,
            A_RECORD_NAME_PARAMETER,
        ])
    }

    /// Same values under caller-chosen names (domain, zone id, zone name, record).
    pub fn parameters_named(&self, names: [&str; 4]) -> Vec<Parameter> {
        let [domain, zone_id, zone_name, record] = names;
        vec![
            Parameter::secure(domain, &self.certificate_domain_name),
            Parameter::secure(zone_id, &self.hosted_zone_id),
            Parameter::secure(zone_name, &self.hosted_zone_name),
            Parameter::secure(record, &self.a_record_name),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfiguration {
    pub stack_name: String,
    pub certificate_domain_name_parameter: String,
    pub hosted_zone_id_parameter: String,
    pub hosted_zone_name_parameter: String,
    pub a_record_name_parameter: String,
    pub region: Option<String>,
    pub max_azs: usize,
    pub availability_zones: Option<Vec<String>>,
    pub grant_registry_pull: bool,
    pub registry_pull_resource: String,
}

impl Default for StackConfiguration {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            certificate_domain_name_parameter: CERTIFICATE_DOMAIN_NAME_PARAMETER.to_string(),
            hosted_zone_id_parameter: HOSTED_ZONE_ID_PARAMETER.to_string(),
            hosted_zone_name_parameter: HOSTED_ZONE_NAME_PARAMETER.to_string(),
            a_record_name_parameter: A_RECORD_NAME_PARAMETER.to_string(),
            region: None,
            max_azs: DEFAULT_MAX_AZS,
            availability_zones: None,
            grant_registry_pull: false,
            registry_pull_resource: DEFAULT_REGISTRY_PULL_RESOURCE.to_string(),
        }
    }
}

impl StackConfiguration {
    pub fn parameter_names(&self) -> [&str; 4] {
        [
            self.certificate_domain_name_parameter.as_str(),
            self.hosted_zone_id_parameter.as_str(),
            self.hosted_zone_name_parameter.as_str(),
            self.a_record_name_parameter.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedParameters {
    pub certificate_domain_name: String,
    pub hosted_zone_id: String,
    pub hosted_zone_name: String,
    pub a_record_name: String,
}

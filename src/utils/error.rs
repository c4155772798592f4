use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Parameter store request for '{name}' failed: {message}")]
    ParameterStoreError { name: String, message: String },

    #[error("Parameter '{name}' already exists")]
    ParameterAlreadyExists { name: String },

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },

    #[error("Provisioning failed for stack '{stack_name}': {message}")]
    ProvisioningError { stack_name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ParameterStore,
    Provisioning,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeployError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::IoError(_) => ErrorCategory::Io,
            DeployError::SerializationError(_) => ErrorCategory::Serialization,
            DeployError::ConfigError { .. }
            | DeployError::MissingConfigError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            DeployError::ParameterStoreError { .. }
            | DeployError::ParameterAlreadyExists { .. }
            | DeployError::ParameterNotFound { .. } => ErrorCategory::ParameterStore,
            DeployError::ProvisioningError { .. } => ErrorCategory::Provisioning,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 已存在的參數不算真正失敗
            DeployError::ParameterAlreadyExists { .. } => ErrorSeverity::Low,
            DeployError::ParameterStoreError { .. } => ErrorSeverity::Medium,
            DeployError::ConfigError { .. }
            | DeployError::MissingConfigError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::ConfigValidationError { .. }
            | DeployError::ParameterNotFound { .. }
            | DeployError::SerializationError(_) => ErrorSeverity::High,
            DeployError::IoError(_) | DeployError::ProvisioningError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DeployError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            DeployError::SerializationError(_) => {
                "The generated template could not be encoded; re-run with --verbose".to_string()
            }
            DeployError::ConfigError { .. } => {
                "Fix the reported file; each line must be KEY=value".to_string()
            }
            DeployError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            DeployError::MissingConfigError { field } => {
                format!("Provide a value for '{}' (env file, environment or flag)", field)
            }
            DeployError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            DeployError::ParameterStoreError { .. } => {
                "Check AWS credentials, region and SSM permissions, then retry".to_string()
            }
            DeployError::ParameterAlreadyExists { .. } => {
                "Re-run the seeder with --overwrite to replace existing values".to_string()
            }
            DeployError::ParameterNotFound { name } => {
                format!("Seed '{}' with seed-params before synthesizing", name)
            }
            DeployError::ProvisioningError { stack_name, .. } => format!(
                "Inspect the CloudFormation events of stack '{}' for the failing resource",
                stack_name
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::ParameterStore => format!("Parameter store problem: {}", self),
            ErrorCategory::Provisioning => format!("Deployment problem: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Serialization => format!("Template problem: {}", self),
        }
    }

    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl From<toml::de::Error> for DeployError {
    fn from(e: toml::de::Error) -> Self {
        DeployError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

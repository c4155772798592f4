use crate::domain::model::{Parameter, ParameterType};
use crate::domain::ports::ParameterStore;
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use aws_sdk_ssm::operation::put_parameter::PutParameterError;
use aws_sdk_ssm::types::ParameterType as SsmParameterType;
use aws_sdk_ssm::Client as SsmClient;

#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: SsmClient,
}

impl SsmParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }

    pub async fn from_region(region: Option<&str>) -> Self {
        let config = crate::adapters::load_aws_config(region).await;
        Self::new(SsmClient::new(&config))
    }
}

fn ssm_type(parameter_type: ParameterType) -> SsmParameterType {
    match parameter_type {
        ParameterType::String => SsmParameterType::String,
        ParameterType::SecureString => SsmParameterType::SecureString,
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn put_parameter(&self, parameter: &Parameter, overwrite: bool) -> Result<()> {
        let result = self
            .client
            .put_parameter()
            .name(&parameter.name)
            .value(&parameter.value)
            .r#type(ssm_type(parameter.parameter_type))
            .overwrite(overwrite)
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::debug!(
                    "SSM accepted {} (version {})",
                    parameter.name,
                    output.version()
                );
                Ok(())
            }
            Err(err) => match err.into_service_error() {
                PutParameterError::ParameterAlreadyExists(_) => {
                    Err(DeployError::ParameterAlreadyExists {
                        name: parameter.name.clone(),
                    })
                }
                err => Err(DeployError::ParameterStoreError {
                    name: parameter.name.clone(),
                    message: format!(
                        "{}: {}",
                        err.code().unwrap_or("Unhandled"),
                        DisplayErrorContext(&err)
                    ),
                }),
            },
        }
    }

    async fn get_parameter(&self, name: &str) -> Result<String> {
        let result = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                return match err.into_service_error() {
                    GetParameterError::ParameterNotFound(_) => Err(DeployError::ParameterNotFound {
                        name: name.to_string(),
                    }),
                    err => Err(DeployError::ParameterStoreError {
                        name: name.to_string(),
                        message: format!(
                            "{}: {}",
                            err.code().unwrap_or("Unhandled"),
                            DisplayErrorContext(&err)
                        ),
                    }),
                }
            }
        };

        output
            .parameter()
            .and_then(|p| p.value())
            .map(|v| v.to_string())
            .ok_or_else(|| DeployError::ParameterNotFound {
                name: name.to_string(),
            })
    }
}

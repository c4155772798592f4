use crate::domain::model::Parameter;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Writes one entry. Without `overwrite` an existing entry is an error.
    async fn put_parameter(&self, parameter: &Parameter, overwrite: bool) -> Result<()>;

    /// Reads the decrypted value of one entry.
    async fn get_parameter(&self, name: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeployOutcome {
    Created,
    Updated,
    NoChanges,
}

impl DeployOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DeployOutcome::Created => "created",
            DeployOutcome::Updated => "updated",
            DeployOutcome::NoChanges => "already up to date",
        }
    }
}

#[async_trait]
pub trait StackDeployer: Send + Sync {
    async fn deploy(&self, stack_name: &str, template_body: &str) -> Result<DeployOutcome>;
    async fn destroy(&self, stack_name: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_outcome_labels() {
        assert_eq!(DeployOutcome::Created.label(), "created");
        assert_eq!(DeployOutcome::Updated.label(), "updated");
        assert_eq!(DeployOutcome::NoChanges.label(), "already up to date");
    }
}

use crate::domain::model::Parameter;
use crate::domain::ports::ParameterStore;
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Parameter store kept in process memory. Follows SSM's overwrite rules so
/// dry runs and offline synthesis behave like the real store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryParameterStore {
    entries: Arc<Mutex<HashMap<String, Parameter>>>,
    rejected: Arc<HashSet<String>>,
    put_attempts: Arc<Mutex<Vec<String>>>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write to one of `names` fails as a store error.
    pub fn rejecting<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rejected: Arc::new(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub async fn get(&self, name: &str) -> Option<Parameter> {
        self.entries.lock().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Names passed to `put_parameter`, in call order, successful or not.
    pub async fn put_attempts(&self) -> Vec<String> {
        self.put_attempts.lock().await.clone()
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn put_parameter(&self, parameter: &Parameter, overwrite: bool) -> Result<()> {
        self.put_attempts.lock().await.push(parameter.name.clone());

        if self.rejected.contains(&parameter.name) {
            return Err(DeployError::ParameterStoreError {
                name: parameter.name.clone(),
                message: "AccessDeniedException: write rejected".to_string(),
            });
        }

        let mut entries = self.entries.lock().await;
        if entries.contains_key(&parameter.name) && !overwrite {
            return Err(DeployError::ParameterAlreadyExists {
                name: parameter.name.clone(),
            });
        }
        entries.insert(parameter.name.clone(), parameter.clone());
        Ok(())
    }

    async fn get_parameter(&self, name: &str) -> Result<String> {
        self.entries
            .lock()
            .await
            .get(name)
            .map(|p| p.value.clone())
            .ok_or_else(|| DeployError::ParameterNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_without_overwrite_rejects_existing_entry() {
        let store = InMemoryParameterStore::new();
        let param = Parameter::secure("/api/hostedZoneId", "Z123");

        store.put_parameter(&param, false).await.unwrap();
        let err = store.put_parameter(&param, false).await.unwrap_err();
        assert!(matches!(err, DeployError::ParameterAlreadyExists { .. }));

        let replaced = Parameter::secure("/api/hostedZoneId", "Z999");
        store.put_parameter(&replaced, true).await.unwrap();
        assert_eq!(store.get_parameter("/api/hostedZoneId").await.unwrap(), "Z999");
    }

    #[tokio::test]
    async fn test_missing_parameter_is_not_found() {
        let store = InMemoryParameterStore::new();
        let err = store.get_parameter("/api/aRecordName").await.unwrap_err();
        assert!(matches!(err, DeployError::ParameterNotFound { name } if name == "/api/aRecordName"));
    }

    #[tokio::test]
    async fn test_rejected_names_fail_but_are_recorded() {
        let store = InMemoryParameterStore::rejecting(["/api/hostedZoneName"]);
        let param = Parameter::secure("/api/hostedZoneName", "example.com");

        assert!(store.put_parameter(&param, true).await.is_err());
        assert!(store.is_empty().await);
        assert_eq!(store.put_attempts().await, vec!["/api/hostedZoneName"]);
    }
}

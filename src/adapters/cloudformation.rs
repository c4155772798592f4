use crate::domain::ports::{DeployOutcome, StackDeployer};
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudformation::types::Capability;
use aws_sdk_cloudformation::Client as CfnClient;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Hands a rendered template to CloudFormation, which owns diffing,
/// change application and rollback.
#[derive(Debug, Clone)]
pub struct CloudFormationDeployer {
    client: CfnClient,
    wait_timeout: Duration,
}

impl CloudFormationDeployer {
    pub fn new(client: CfnClient, wait_timeout: Duration) -> Self {
        Self {
            client,
            wait_timeout,
        }
    }

    pub async fn from_region(region: Option<&str>, wait_timeout: Duration) -> Self {
        let config = crate::adapters::load_aws_config(region).await;
        Self::new(CfnClient::new(&config), wait_timeout)
    }

    fn provisioning_error(stack_name: &str, message: impl Into<String>) -> DeployError {
        DeployError::ProvisioningError {
            stack_name: stack_name.to_string(),
            message: message.into(),
        }
    }

    /// `None` when the stack does not exist.
    async fn stack_status(&self, stack_name: &str) -> Result<Option<(String, Option<String>)>> {
        let result = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.stacks().first().map(|stack| {
                let status = stack
                    .stack_status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default();
                (status, stack.stack_status_reason().map(|r| r.to_string()))
            })),
            Err(err) => {
                let err = err.into_service_error();
                if is_missing_stack_message(err.message()) {
                    Ok(None)
                } else {
                    Err(Self::provisioning_error(
                        stack_name,
                        DisplayErrorContext(&err).to_string(),
                    ))
                }
            }
        }
    }

    async fn wait_for_terminal_status(&self, stack_name: &str) -> Result<Option<String>> {
        let started = Instant::now();
        loop {
            match poll_step(self.stack_status(stack_name).await?) {
                PollStep::Settled(status) => return Ok(status),
                PollStep::Failed(message) => {
                    return Err(Self::provisioning_error(stack_name, message))
                }
                PollStep::InProgress(status) => {
                    tracing::info!("⏳ Stack {} is {}", stack_name, status);
                }
            }

            if wait_expired(started.elapsed(), self.wait_timeout) {
                return Err(Self::provisioning_error(
                    stack_name,
                    format!("timed out after {:?} waiting for a terminal status", self.wait_timeout),
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// What `deploy` does with a stack in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StackAction {
    Create,
    Update,
}

/// `existing` is the current stack status, `None` when the stack is absent.
pub(crate) fn plan_deploy(stack_name: &str, existing: Option<&str>) -> Result<StackAction> {
    match existing {
        None => Ok(StackAction::Create),
        // ROLLBACK_COMPLETE 的堆疊無法更新，只能刪除後重建
        Some("ROLLBACK_COMPLETE") => Err(CloudFormationDeployer::provisioning_error(
            stack_name,
            "stack is in ROLLBACK_COMPLETE and must be destroyed before redeploying",
        )),
        Some(_) => Ok(StackAction::Update),
    }
}

/// One observation while waiting on a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PollStep {
    /// Terminal and healthy; `None` once the stack is gone.
    Settled(Option<String>),
    Failed(String),
    InProgress(String),
}

pub(crate) fn poll_step(observed: Option<(String, Option<String>)>) -> PollStep {
    match observed {
        None => PollStep::Settled(None),
        Some((status, _)) if status.ends_with("_IN_PROGRESS") => PollStep::InProgress(status),
        Some((status, reason)) if is_failure_status(&status) => PollStep::Failed(format!(
            "{}{}",
            status,
            reason.map(|r| format!(" ({})", r)).unwrap_or_default()
        )),
        Some((status, _)) => PollStep::Settled(Some(status)),
    }
}

pub(crate) fn wait_expired(elapsed: Duration, timeout: Duration) -> bool {
    elapsed >= timeout
}

pub(crate) fn is_missing_stack_message(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.contains("does not exist"))
}

pub(crate) fn is_no_updates_message(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.contains("No updates are to be performed"))
}

/// Final status after a delete; a vanished stack counts as deleted.
pub(crate) fn check_deleted(stack_name: &str, settled: Option<&str>) -> Result<()> {
    match settled {
        None | Some("DELETE_COMPLETE") => Ok(()),
        Some(status) => Err(CloudFormationDeployer::provisioning_error(
            stack_name,
            format!("unexpected status after delete: {}", status),
        )),
    }
}

pub(crate) fn is_failure_status(status: &str) -> bool {
    status.ends_with("_FAILED") || status.contains("ROLLBACK")
}

#[async_trait]
impl StackDeployer for CloudFormationDeployer {
    async fn deploy(&self, stack_name: &str, template_body: &str) -> Result<DeployOutcome> {
        let existing = self.stack_status(stack_name).await?;

        let outcome = match plan_deploy(stack_name, existing.as_ref().map(|(s, _)| s.as_str()))? {
            StackAction::Create => {
                tracing::info!("🚀 Creating stack {}", stack_name);
                self.client
                    .create_stack()
                    .stack_name(stack_name)
                    .template_body(template_body)
                    .capabilities(Capability::CapabilityIam)
                    .send()
                    .await
                    .map_err(|e| {
                        Self::provisioning_error(stack_name, DisplayErrorContext(&e).to_string())
                    })?;
                DeployOutcome::Created
            }
            StackAction::Update => {
                tracing::info!("🔄 Updating stack {}", stack_name);
                let result = self
                    .client
                    .update_stack()
                    .stack_name(stack_name)
                    .template_body(template_body)
                    .capabilities(Capability::CapabilityIam)
                    .send()
                    .await;

                match result {
                    Ok(_) => DeployOutcome::Updated,
                    Err(err) => {
                        let err = err.into_service_error();
                        if is_no_updates_message(err.message()) {
                            tracing::info!("✅ Stack {} is already up to date", stack_name);
                            return Ok(DeployOutcome::NoChanges);
                        }
                        return Err(Self::provisioning_error(
                            stack_name,
                            DisplayErrorContext(&err).to_string(),
                        ));
                    }
                }
            }
        };

        match self.wait_for_terminal_status(stack_name).await? {
            Some(status) => {
                tracing::info!("✅ Stack {} reached {}", stack_name, status);
                Ok(outcome)
            }
            None => Err(Self::provisioning_error(
                stack_name,
                "stack disappeared while waiting for completion",
            )),
        }
    }

    async fn destroy(&self, stack_name: &str) -> Result<()> {
        if self.stack_status(stack_name).await?.is_none() {
            tracing::warn!("Stack {} does not exist, nothing to destroy", stack_name);
            return Ok(());
        }

        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| Self::provisioning_error(stack_name, DisplayErrorContext(&e).to_string()))?;

        tracing::info!("🗑️ Stack {} deletion initiated", stack_name);

        let settled = self.wait_for_terminal_status(stack_name).await?;
        check_deleted(stack_name, settled.as_deref())
    }
}

use crate::domain::model::Parameter;
use crate::domain::ports::ParameterStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedStatus {
    Created,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: SeedStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SeedOutcome>,
}

impl SeedReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == SeedStatus::Created)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SeedStatus::Failed { .. }))
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Writes parameters one after another. A failed write is logged and recorded,
/// then the batch moves on; nothing is retried or rolled back.
pub struct ParameterSeeder<S: ParameterStore> {
    store: S,
    overwrite: bool,
}

impl<S: ParameterStore> ParameterSeeder<S> {
    pub fn new(store: S, overwrite: bool) -> Self {
        Self { store, overwrite }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn seed(&self, parameters: &[Parameter]) -> SeedReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(parameters.len());

        for param in parameters {
            let status = match self.store.put_parameter(param, self.overwrite).await {
                Ok(()) => {
                    tracing::info!("✅ Parameter created successfully: {}", param.name);
                    SeedStatus::Created
                }
                Err(e) => {
                    tracing::error!("❌ Error creating parameter: {}: {}", param.name, e);
                    tracing::debug!("💡 {}", e.recovery_suggestion());
                    SeedStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(SeedOutcome {
                name: param.name.clone(),
                status,
            });
        }

        SeedReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryParameterStore;

    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::secure("/api/certificateDomainName", "api.example.com"),
            Parameter::secure("/api/hostedZoneId", "Z123"),
            Parameter::secure("/api/hostedZoneName", "example.com"),
            Parameter::secure("/api/aRecordName", "api"),
        ]
    }

    #[tokio::test]
    async fn test_seed_writes_every_parameter() {
        let seeder = ParameterSeeder::new(InMemoryParameterStore::new(), false);
        let report = seeder.seed(&parameters()).await;

        assert!(report.is_complete_success());
        assert_eq!(report.succeeded().count(), 4);
        assert_eq!(seeder.store().len().await, 4);
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let store = InMemoryParameterStore::rejecting(["/api/hostedZoneId"]);
        let seeder = ParameterSeeder::new(store, false);
        let report = seeder.seed(&parameters()).await;

        assert_eq!(seeder.store().put_attempts().await.len(), 4);
        let failed: Vec<&str> = report.failed().map(|o| o.name.as_str()).collect();
        assert_eq!(failed, vec!["/api/hostedZoneId"]);
        assert_eq!(report.succeeded().count(), 3);
        assert!(seeder.store().get("/api/aRecordName").await.is_some());
    }

    #[tokio::test]
    async fn test_second_run_without_overwrite_fails_per_entry() {
        let store = InMemoryParameterStore::new();
        ParameterSeeder::new(store.clone(), false)
            .seed(&parameters())
            .await;

        let report = ParameterSeeder::new(store.clone(), false)
            .seed(&parameters())
            .await;
        assert_eq!(report.failed().count(), 4);

        let report = ParameterSeeder::new(store, true).seed(&parameters()).await;
        assert!(report.is_complete_success());
    }

    #[test]
    fn test_report_serializes_status_inline() {
        let now = Utc::now();
        let report = SeedReport {
            started_at: now,
            finished_at: now,
            outcomes: vec![SeedOutcome {
                name: "/api/hostedZoneId".to_string(),
                status: SeedStatus::Failed {
                    error: "denied".to_string(),
                },
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "failed");
        assert_eq!(json["outcomes"][0]["error"], "denied");
        assert_eq!(json["outcomes"][0]["name"], "/api/hostedZoneId");
    }
}

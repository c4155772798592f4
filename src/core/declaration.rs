use crate::core::compute::{Cluster, ComputeService};
use crate::core::edge::{EdgeBinding, HostedZoneRef};
use crate::core::network::NetworkTopology;
use crate::domain::model::{ResolvedParameters, StackConfiguration};
use crate::domain::ports::ParameterStore;
use crate::utils::error::Result;
use serde::Serialize;

/// Everything one deploy declares. Created and torn down as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfrastructureGraph {
    pub stack_name: String,
    pub region: Option<String>,
    pub hosted_zone: HostedZoneRef,
    pub network: NetworkTopology,
    pub cluster: Cluster,
    pub service: ComputeService,
    pub edge: EdgeBinding,
}

pub struct DeploymentDeclaration {
    config: StackConfiguration,
}

impl DeploymentDeclaration {
    pub fn new(config: StackConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StackConfiguration {
        &self.config
    }

    /// Looks up the four values on every call.
    pub async fn resolve<P: ParameterStore + ?Sized>(
        &self,
        store: &P,
    ) -> Result<ResolvedParameters> {
        tracing::debug!(
            "Resolving parameters {}, {}, {}, {}",
            self.config.certificate_domain_name_parameter,
            self.config.hosted_zone_id_parameter,
            self.config.hosted_zone_name_parameter,
            self.config.a_record_name_parameter
        );

        let certificate_domain_name = store
            .get_parameter(&self.config.certificate_domain_name_parameter)
            .await?;
        let hosted_zone_id = store
            .get_parameter(&self.config.hosted_zone_id_parameter)
            .await?;
        let hosted_zone_name = store
            .get_parameter(&self.config.hosted_zone_name_parameter)
            .await?;
        let a_record_name = store
            .get_parameter(&self.config.a_record_name_parameter)
            .await?;

        Ok(ResolvedParameters {
            certificate_domain_name,
            hosted_zone_id,
            hosted_zone_name,
            a_record_name,
        })
    }

    pub async fn synthesize<P: ParameterStore + ?Sized>(
        &self,
        store: &P,
    ) -> Result<InfrastructureGraph> {
        let resolved = self.resolve(store).await?;
        tracing::info!(
            "📥 Resolved parameters for zone {} ({})",
            resolved.hosted_zone_name,
            resolved.hosted_zone_id
        );
        Ok(self.build(&resolved))
    }

    /// Pure: same configuration and values always give the same graph.
    pub fn build(&self, resolved: &ResolvedParameters) -> InfrastructureGraph {
        let hosted_zone = HostedZoneRef {
            zone_id: resolved.hosted_zone_id.clone(),
            zone_name: resolved.hosted_zone_name.clone(),
        };

        let network = NetworkTopology::new(
            self.config.max_azs,
            self.config.availability_zones.as_deref(),
        );

        let registry_pull_resource = self
            .config
            .grant_registry_pull
            .then_some(self.config.registry_pull_resource.as_str());
        if let Some(resource) = registry_pull_resource {
            // 已知的寬鬆授權，預設 resource 為 "*"
            tracing::warn!(
                "Granting registry pull to the execution role on resource '{}'",
                resource
            );
        }
        let service = ComputeService::new(&self.config.stack_name, registry_pull_resource);

        let edge = EdgeBinding::new(
            &hosted_zone,
            &resolved.certificate_domain_name,
            &resolved.a_record_name,
        );

        tracing::debug!(
            "Declared {} subnets across {} zones, alias {}",
            network.subnets.len(),
            network.zone_count(),
            edge.alias_record.name
        );

        InfrastructureGraph {
            stack_name: self.config.stack_name.clone(),
            region: self.config.region.clone(),
            hosted_zone,
            network,
            cluster: Cluster {
                container_insights: true,
            },
            service,
            edge,
        }
    }
}

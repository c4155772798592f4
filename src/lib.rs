pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::InMemoryParameterStore;
pub use config::cli::LocalStorage;
pub use config::seeder::SeederConfig;
pub use config::toml_config::TomlConfig;
pub use core::{
    declaration::{DeploymentDeclaration, InfrastructureGraph},
    seeder::{ParameterSeeder, SeedReport},
    template::Template,
};
pub use domain::model::{Parameter, SeedValues, StackConfiguration};
pub use utils::error::{DeployError, Result};

#[cfg(feature = "aws")]
pub use adapters::{cloudformation::CloudFormationDeployer, ssm::SsmParameterStore};

pub mod compute;
pub mod declaration;
pub mod edge;
pub mod network;
pub mod seeder;
pub mod template;

pub use crate::domain::model::{Parameter, ResolvedParameters, SeedValues, StackConfiguration};
pub use crate::domain::ports::{ParameterStore, StackDeployer, Storage};
pub use crate::utils::error::Result;

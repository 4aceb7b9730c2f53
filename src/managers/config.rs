use serde::{Deserialize, Serialize};
use tokenops_blockchain::{ChainRegistryConfig, ChainRegistryConfigRaw};
use tokenops_repository::{RepositoryManagerConfig, RepositoryManagerConfigRaw};

use crate::config::ConfigError;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ManagersConfigRaw {
    pub repository: RepositoryManagerConfigRaw,
    pub chains: ChainRegistryConfigRaw,
}

#[derive(Debug, Clone)]
pub(crate) struct ManagersConfig {
    pub repository: RepositoryManagerConfig,
    pub chains: ChainRegistryConfig,
}

impl ManagersConfigRaw {
    pub(crate) fn resolve(self) -> Result<ManagersConfig, ConfigError> {
        Ok(ManagersConfig {
            repository: self.repository.resolve()?,
            chains: self.chains.resolve()?,
        })
    }
}

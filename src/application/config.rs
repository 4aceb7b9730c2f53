use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OrchestratorConfig {
    /// Gas ceiling attached to every token write.
    pub write_gas_limit: u64,
    pub deploy_gas_limit: u64,
    /// Addresses queried in parallel by the balance-holders scan.
    pub balance_holder_concurrency: usize,
    /// Templates installed at startup and after a database reset.
    #[serde(default)]
    pub seed_templates: Vec<SeedTemplateConfig>,
}

/// Compiler output for a template: `abi_path` holds the ABI JSON (bare array
/// or artifact), `bytecode_path` the creation bytecode as hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SeedTemplateConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub abi_path: PathBuf,
    pub bytecode_path: PathBuf,
}

impl OrchestratorConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.write_gas_limit == 0 || self.deploy_gas_limit == 0 {
            return Err(ConfigError::InvalidConfig(
                "orchestrator gas limits must be greater than 0".to_string(),
            ));
        }
        if self.balance_holder_concurrency == 0 {
            return Err(ConfigError::InvalidConfig(
                "orchestrator.balance_holder_concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

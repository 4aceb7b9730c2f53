use std::fs;

use alloy::hex;
use serde_json::Value;
use tokenops_blockchain::ContractAbi;
use tokenops_repository::{NewTokenContract, TokenContractRecord, TokenContractRepository};

use super::{OrchestratorError, SeedTemplateConfig};
use crate::config::ConfigError;

/// Registered token templates (ABI plus creation bytecode).
#[derive(Clone)]
pub(crate) struct TemplateRegistry {
    templates: TokenContractRepository,
}

impl TemplateRegistry {
    pub(crate) fn new(templates: TokenContractRepository) -> Self {
        Self { templates }
    }

    /// Rejects templates whose ABI would make every later call fail.
    pub(crate) async fn create(
        &self,
        template: NewTokenContract,
    ) -> Result<TokenContractRecord, OrchestratorError> {
        ContractAbi::from_value(template.abi.clone())
            .map_err(|e| OrchestratorError::InvalidCall(e.to_string()))?;
        if hex::decode(template.bytecode.trim()).is_err() {
            return Err(OrchestratorError::InvalidCall(
                "bytecode must be a hex string".to_string(),
            ));
        }

        let record = self.templates.create(template).await?;
        tracing::info!(
            token_contract_id = %record.id,
            name = %record.name,
            symbol = %record.symbol,
            "Token contract registered"
        );
        Ok(record)
    }

    pub(crate) async fn list(&self) -> Result<Vec<TokenContractRecord>, OrchestratorError> {
        Ok(self.templates.list_all().await?)
    }

    pub(crate) async fn get(&self, id: &str) -> Result<TokenContractRecord, OrchestratorError> {
        self.templates
            .find_by_id(id)
            .await?
            .ok_or_else(OrchestratorError::template_not_found)
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<(), OrchestratorError> {
        if !self.templates.delete(id).await? {
            return Err(OrchestratorError::template_not_found());
        }
        tracing::info!(token_contract_id = %id, "Token contract deleted");
        Ok(())
    }

    /// Inserts each seed unless a template with the same name and symbol
    /// already exists. Returns how many were inserted.
    pub(crate) async fn install_seeds(
        &self,
        seeds: &[NewTokenContract],
    ) -> Result<usize, OrchestratorError> {
        let existing = self.templates.list_all().await?;
        let mut installed = 0;
        for seed in seeds {
            let present = existing
                .iter()
                .any(|t| t.name == seed.name && t.symbol == seed.symbol);
            if present {
                tracing::debug!(
                    name = %seed.name,
                    symbol = %seed.symbol,
                    "Seed template already present"
                );
                continue;
            }
            self.create(seed.clone()).await?;
            installed += 1;
        }
        Ok(installed)
    }
}

/// Reads seed template artifacts from disk.
pub(crate) fn load_seed_templates(
    seeds: &[SeedTemplateConfig],
) -> Result<Vec<NewTokenContract>, ConfigError> {
    seeds.iter().map(load_seed_template).collect()
}

fn load_seed_template(seed: &SeedTemplateConfig) -> Result<NewTokenContract, ConfigError> {
    let abi_text = fs::read_to_string(&seed.abi_path).map_err(|e| {
        ConfigError::InvalidConfig(format!(
            "failed to read ABI for seed template {} at {}: {}",
            seed.symbol,
            seed.abi_path.display(),
            e
        ))
    })?;
    let abi: Value = serde_json::from_str(&abi_text).map_err(|e| {
        ConfigError::InvalidConfig(format!(
            "ABI for seed template {} is not JSON: {}",
            seed.symbol, e
        ))
    })?;
    // Keep only the ABI when pointed at a full compiler artifact.
    let abi = match abi {
        Value::Object(mut artifact) if artifact.contains_key("abi") => {
            artifact.remove("abi").unwrap_or(Value::Null)
        }
        other => other,
    };
    ContractAbi::from_value(abi.clone()).map_err(|e| {
        ConfigError::InvalidConfig(format!("seed template {}: {}", seed.symbol, e))
    })?;

    let bytecode = fs::read_to_string(&seed.bytecode_path).map_err(|e| {
        ConfigError::InvalidConfig(format!(
            "failed to read bytecode for seed template {} at {}: {}",
            seed.symbol,
            seed.bytecode_path.display(),
            e
        ))
    })?;
    let bytecode = bytecode.trim();
    let bytecode = if bytecode.starts_with("0x") {
        bytecode.to_string()
    } else {
        format!("0x{}", bytecode)
    };

    Ok(NewTokenContract {
        name: seed.name.clone(),
        symbol: seed.symbol.clone(),
        decimals: seed.decimals,
        abi,
        bytecode,
    })
}

//! Deployment → template → chain resolution shared by reads and writes.

use std::{str::FromStr, sync::Arc};

use serde_json::Value;
use tokenops_blockchain::{
    Address, ChainConnector, ChainReader, ContractAbi, DynSolValue, normalize_value,
};
use tokenops_domain::{CallArg, ChainId};
use tokenops_repository::{DeploymentRecord, DeploymentRepository, TokenContractRepository};

use super::OrchestratorError;

/// A deployment with everything needed to talk to it.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedToken {
    pub deployment: DeploymentRecord,
    pub abi: ContractAbi,
    pub address: Address,
}

impl ResolvedToken {
    pub(crate) fn chain_id(&self) -> ChainId {
        self.deployment.chain_id
    }
}

#[derive(Clone)]
pub(crate) struct TokenResolver {
    deployments: DeploymentRepository,
    templates: TokenContractRepository,
    chains: Arc<dyn ChainConnector>,
}

impl TokenResolver {
    pub(crate) fn new(
        deployments: DeploymentRepository,
        templates: TokenContractRepository,
        chains: Arc<dyn ChainConnector>,
    ) -> Self {
        Self {
            deployments,
            templates,
            chains,
        }
    }

    pub(crate) fn chains(&self) -> &Arc<dyn ChainConnector> {
        &self.chains
    }

    /// Looks a deployment up by contract address in any letter case.
    /// Strings that are not addresses simply match nothing.
    pub(crate) async fn find_deployment(
        &self,
        contract_address: &str,
    ) -> Result<Option<DeploymentRecord>, OrchestratorError> {
        let Ok(address) = Address::from_str(contract_address.trim()) else {
            return Ok(None);
        };
        Ok(self
            .deployments
            .find_by_address(&address.to_checksum(None))
            .await?)
    }

    pub(crate) async fn resolve(
        &self,
        contract_address: &str,
    ) -> Result<ResolvedToken, OrchestratorError> {
        let deployment = self
            .find_deployment(contract_address)
            .await?
            .ok_or_else(OrchestratorError::deployment_not_found)?;
        self.resolve_deployment(deployment).await
    }

    pub(crate) async fn resolve_deployment(
        &self,
        deployment: DeploymentRecord,
    ) -> Result<ResolvedToken, OrchestratorError> {
        let template = self
            .templates
            .find_by_id(&deployment.token_contract_id)
            .await?
            .ok_or_else(OrchestratorError::template_not_found)?;

        self.chains
            .chain(deployment.chain_id)
            .map_err(OrchestratorError::from_connector)?;

        let abi = ContractAbi::from_value(template.abi.clone()).map_err(|e| {
            OrchestratorError::InvalidCall(format!(
                "Token contract {} has an unusable ABI: {}",
                template.id, e
            ))
        })?;
        let address = Address::from_str(&deployment.contract_address).map_err(|e| {
            OrchestratorError::InvalidCall(format!(
                "Deployment {} has a malformed contract address: {}",
                deployment.id, e
            ))
        })?;

        Ok(ResolvedToken {
            deployment,
            abi,
            address,
        })
    }

    pub(crate) fn reader(
        &self,
        chain_id: ChainId,
        rpc_url: Option<&str>,
    ) -> Result<Arc<dyn ChainReader>, OrchestratorError> {
        self.chains
            .reader(chain_id, rpc_url)
            .map_err(OrchestratorError::from_connector)
    }
}

/// Converts request arguments into ABI values plus the JSON array stored with
/// the ledger record. Whole-token amounts are scaled by `decimals`.
pub(crate) fn prepare_arguments(
    args: Vec<CallArg>,
    decimals: u8,
) -> Result<(Vec<DynSolValue>, Value), OrchestratorError> {
    let values = args
        .into_iter()
        .map(|arg| arg.into_sol_value(decimals))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| OrchestratorError::InvalidCall(e.to_string()))?;
    let parameters = Value::Array(values.iter().map(normalize_value).collect());
    Ok((values, parameters))
}

use std::{sync::Arc, time::Instant};

use tokenops_blockchain::{AccountRegistry, ChainConnector, ContractAbi, DynSolValue, U256};
use tokenops_domain::{AccountRole, ChainId, TransactionStatus};
use tokenops_observability::record_deployment;
use tokenops_repository::{
    DeploymentRecord, DeploymentRepository, NewDeployment, TokenContractRepository,
};

use super::{OrchestratorConfig, OrchestratorError};

#[derive(Debug, Clone)]
pub(crate) struct DeployRequest {
    pub token_contract_id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Base units, decimal string.
    pub initial_supply: String,
    pub chain_id: ChainId,
    pub rpc_url: Option<String>,
}

/// Deploys a registered template from the DEPLOYER account and records the
/// resulting contract once its receipt is in.
pub(crate) struct DeployService {
    templates: TokenContractRepository,
    deployments: DeploymentRepository,
    chains: Arc<dyn ChainConnector>,
    accounts: Arc<AccountRegistry>,
    gas_limit: u64,
}

impl DeployService {
    pub(crate) fn new(
        templates: TokenContractRepository,
        deployments: DeploymentRepository,
        chains: Arc<dyn ChainConnector>,
        accounts: Arc<AccountRegistry>,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            templates,
            deployments,
            chains,
            accounts,
            gas_limit: config.deploy_gas_limit,
        }
    }

    pub(crate) async fn deploy_token(
        &self,
        request: DeployRequest,
    ) -> Result<DeploymentRecord, OrchestratorError> {
        let started = Instant::now();
        let result = self.deploy(request).await;
        let status = if result.is_ok() { "confirmed" } else { "failed" };
        record_deployment(status, started.elapsed());
        result
    }

    async fn deploy(&self, request: DeployRequest) -> Result<DeploymentRecord, OrchestratorError> {
        let template = self
            .templates
            .find_by_id(&request.token_contract_id)
            .await?
            .ok_or_else(OrchestratorError::template_not_found)?;

        self.chains
            .chain(request.chain_id)
            .map_err(OrchestratorError::from_connector)?;

        let initial_supply = parse_supply(&request.initial_supply).ok_or_else(|| {
            OrchestratorError::InvalidCall("initialSupply must be a valid numeric string".to_string())
        })?;

        let signer = self
            .accounts
            .resolve_signer(AccountRole::Deployer)
            .map_err(|_| {
                OrchestratorError::MisconfiguredAccount(format!(
                    "{} not configured in environment",
                    AccountRole::Deployer.env_var()
                ))
            })?;
        let deployer = signer.address();

        let abi = ContractAbi::from_value(template.abi.clone())
            .map_err(|e| OrchestratorError::InvalidCall(e.to_string()))?;
        let code = abi
            .deploy_code(
                &template.bytecode,
                vec![
                    DynSolValue::String(request.name.clone()),
                    DynSolValue::String(request.symbol.clone()),
                    DynSolValue::Uint(U256::from(request.decimals), 8),
                    DynSolValue::Uint(initial_supply, 256),
                ],
            )
            .map_err(|e| OrchestratorError::InvalidCall(e.to_string()))?;

        let rpc_url = request.rpc_url.as_deref();
        let writer = self
            .chains
            .writer(request.chain_id, rpc_url, signer)
            .map_err(OrchestratorError::from_connector)?;
        let reader = self
            .chains
            .reader(request.chain_id, rpc_url)
            .map_err(OrchestratorError::from_connector)?;

        let transaction_hash = writer
            .deploy_contract(code, self.gas_limit)
            .await
            .map_err(|e| OrchestratorError::SubmissionFailed {
                message: e.to_string(),
            })?;
        tracing::info!(
            chain_id = %request.chain_id,
            token_contract_id = %template.id,
            deployer = %deployer,
            tx_hash = %transaction_hash,
            "Deployment submitted"
        );

        let receipt = reader.wait_for_receipt(transaction_hash).await.map_err(|e| {
            OrchestratorError::SubmissionFailed {
                message: e.to_string(),
            }
        })?;
        let contract_address = match receipt.contract_address {
            Some(address) if receipt.success => address,
            _ => {
                tracing::warn!(
                    tx_hash = %transaction_hash,
                    success = receipt.success,
                    "Deployment receipt has no contract address"
                );
                return Err(OrchestratorError::SubmissionFailed {
                    message: "Contract deployment failed".to_string(),
                });
            }
        };

        let record = self
            .deployments
            .create(NewDeployment {
                contract_address: contract_address.to_checksum(None),
                chain_id: request.chain_id,
                deployer_address: deployer.to_checksum(None),
                token_contract_id: template.id,
                decimals: request.decimals,
                transaction_hash: transaction_hash.to_string(),
                initial_supply: initial_supply.to_string(),
                gas_used: Some(receipt.gas_used.to_string()),
                status: TransactionStatus::Confirmed,
            })
            .await?;

        tracing::info!(
            chain_id = %request.chain_id,
            contract_address = %record.contract_address,
            deployment_id = %record.id,
            "Token deployed"
        );
        Ok(record)
    }
}

fn parse_supply(raw: &str) -> Option<U256> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(raw, 10).ok()
}

#[cfg(test)]
mod tests {
    use tokenops_blockchain::{B256, ReceiptSummary};

    use super::*;
    use crate::application::test_support::{
        ANVIL_CHAIN_ID, DEPLOYER, Harness, TOKEN_ADDRESS, address, orchestrator_config,
        success_receipt, token_abi,
    };

    fn service(harness: &Harness, accounts: Arc<AccountRegistry>) -> DeployService {
        DeployService::new(
            harness.repository.token_contract_repository(),
            harness.repository.deployment_repository(),
            Arc::clone(&harness.connector),
            accounts,
            &orchestrator_config(),
        )
    }

    fn request(token_contract_id: &str) -> DeployRequest {
        DeployRequest {
            token_contract_id: token_contract_id.to_string(),
            name: "Orbit".to_string(),
            symbol: "ORB".to_string(),
            decimals: 6,
            initial_supply: "1000000000000".to_string(),
            chain_id: ANVIL_CHAIN_ID,
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
        }
    }

    #[tokio::test]
    async fn deploys_and_records_confirmed_deployment() {
        let harness = Harness::new().await;
        let template = harness.insert_template().await;
        harness.chain.set_receipt(Ok(ReceiptSummary {
            gas_used: 1_200_000,
            ..success_receipt(B256::ZERO, Some(address(TOKEN_ADDRESS)))
        }));

        let record = service(&harness, Arc::clone(&harness.accounts))
            .deploy_token(request(&template.id))
            .await
            .expect("deploys");

        assert_eq!(record.contract_address, TOKEN_ADDRESS);
        assert_eq!(record.deployer_address, DEPLOYER);
        assert_eq!(record.token_contract_id, template.id);
        assert_eq!(record.initial_supply, "1000000000000");
        assert_eq!(record.gas_used.as_deref(), Some("1200000"));
        assert_eq!(record.status, TransactionStatus::Confirmed);

        let deployed = harness.chain.deployed();
        assert_eq!(deployed.len(), 1);
        assert_eq!(deployed[0].1, 5_000_000);
        let expected = token_abi()
            .deploy_code(
                &template.bytecode,
                vec![
                    DynSolValue::String("Orbit".to_string()),
                    DynSolValue::String("ORB".to_string()),
                    DynSolValue::Uint(U256::from(6u8), 8),
                    DynSolValue::Uint(U256::from(1_000_000_000_000u64), 256),
                ],
            )
            .expect("encodes");
        assert_eq!(deployed[0].0, expected);

        let stored = harness
            .repository
            .deployment_repository()
            .find_by_address(TOKEN_ADDRESS)
            .await
            .expect("query succeeds")
            .expect("deployment stored");
        assert_eq!(stored.id, record.id);
        assert_eq!(stored.decimals, 6);
    }

    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let harness = Harness::new().await;
        let error = service(&harness, Arc::clone(&harness.accounts))
            .deploy_token(request("missing"))
            .await
            .expect_err("no template");
        assert!(matches!(
            error,
            OrchestratorError::NotFound(message) if message == "Token contract not found"
        ));
    }

    #[tokio::test]
    async fn unsupported_chain_is_rejected_before_signing() {
        let harness = Harness::new().await;
        let template = harness.insert_template().await;

        let error = service(&harness, Arc::clone(&harness.accounts))
            .deploy_token(DeployRequest {
                chain_id: ChainId::new(5),
                ..request(&template.id)
            })
            .await
            .expect_err("chain 5 is not configured");
        assert!(matches!(error, OrchestratorError::UnsupportedChain(id) if id.get() == 5));
        assert!(harness.chain.deployed().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_supply_is_invalid() {
        let harness = Harness::new().await;
        let template = harness.insert_template().await;

        let error = service(&harness, Arc::clone(&harness.accounts))
            .deploy_token(DeployRequest {
                initial_supply: "1e24".to_string(),
                ..request(&template.id)
            })
            .await
            .expect_err("exponent notation is rejected");
        assert!(matches!(
            error,
            OrchestratorError::InvalidCall(message)
                if message == "initialSupply must be a valid numeric string"
        ));
    }

    #[tokio::test]
    async fn missing_deployer_key_is_misconfigured() {
        let harness = Harness::new().await;
        let template = harness.insert_template().await;

        let error = service(&harness, Arc::new(AccountRegistry::default()))
            .deploy_token(request(&template.id))
            .await
            .expect_err("no deployer key");
        assert!(matches!(
            error,
            OrchestratorError::MisconfiguredAccount(message)
                if message == "DEPLOYER_PRIVATE_KEY not configured in environment"
        ));
    }

    #[tokio::test]
    async fn receipt_without_contract_address_fails() {
        let harness = Harness::new().await;
        let template = harness.insert_template().await;

        let error = service(&harness, Arc::clone(&harness.accounts))
            .deploy_token(request(&template.id))
            .await
            .expect_err("default receipt has no contract address");
        assert!(matches!(
            error,
            OrchestratorError::SubmissionFailed { message } if message == "Contract deployment failed"
        ));
        assert_eq!(
            harness
                .repository
                .deployment_repository()
                .count()
                .await
                .expect("counts"),
            0
        );
    }
}

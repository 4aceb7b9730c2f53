//! View calls and the balance-holder scan.

use std::collections::HashSet;

use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use serde_json::Value;
use tokenops_blockchain::{
    Address, ChainReader, ContractAbi, DynSolValue, TransferLog, U256, normalize_outputs,
};
use tokenops_domain::CallArg;

use super::{OrchestratorConfig, OrchestratorError, TokenResolver, resolution::prepare_arguments};

#[derive(Debug, Clone)]
pub(crate) struct ReadRequest {
    pub contract_address: String,
    pub rpc_url: Option<String>,
    pub function: String,
    pub args: Vec<CallArg>,
}

/// An address currently holding a non-zero balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BalanceHolder {
    pub address: String,
    /// Base units, decimal string.
    pub balance: String,
    pub is_allowlisted: bool,
}

pub(crate) struct ReadExecutor {
    resolver: TokenResolver,
    concurrency: usize,
}

impl ReadExecutor {
    pub(crate) fn new(resolver: TokenResolver, config: &OrchestratorConfig) -> Self {
        Self {
            resolver,
            concurrency: config.balance_holder_concurrency,
        }
    }

    /// Single outputs are unwrapped; integers come back as decimal strings.
    pub(crate) async fn execute_read(
        &self,
        request: ReadRequest,
    ) -> Result<Value, OrchestratorError> {
        let token = self.resolver.resolve(&request.contract_address).await?;
        let (values, _) = prepare_arguments(request.args, token.deployment.decimals)?;
        let reader = self
            .resolver
            .reader(token.chain_id(), request.rpc_url.as_deref())?;

        let outputs = call_view(
            reader.as_ref(),
            &token.abi,
            token.address,
            &request.function,
            values,
        )
        .await?;
        Ok(normalize_outputs(outputs))
    }

    /// Every address seen in a `Transfer` event that still holds tokens, in
    /// first-seen order.
    pub(crate) async fn balance_holders(
        &self,
        contract_address: &str,
        rpc_url: Option<&str>,
    ) -> Result<Vec<BalanceHolder>, OrchestratorError> {
        let token = self.resolver.resolve(contract_address).await?;
        let reader = self.resolver.reader(token.chain_id(), rpc_url)?;

        let latest = reader
            .block_number()
            .await
            .map_err(|e| OrchestratorError::ReadFailed(e.to_string()))?;
        let logs = reader
            .transfer_logs(token.address, 0, latest)
            .await
            .map_err(|e| OrchestratorError::ReadFailed(e.to_string()))?;

        let participants = transfer_participants(&logs);

        tracing::debug!(
            contract_address = %token.address,
            latest_block = latest,
            logs = logs.len(),
            participants = participants.len(),
            "Collected Transfer participants"
        );

        let reader = reader.as_ref();
        let abi = &token.abi;
        let token_address = token.address;
        let holders = stream::iter(participants)
            .map(|holder| async move {
                let account = || vec![DynSolValue::Address(holder)];
                let (balance, allowlisted) = tokio::try_join!(
                    call_view(reader, abi, token_address, "balanceOf", account()),
                    call_view(reader, abi, token_address, "isAllowlisted", account()),
                )?;
                let balance = single_uint(balance, "balanceOf")?;
                let is_allowlisted = match allowlisted.as_slice() {
                    [DynSolValue::Bool(flag)] => *flag,
                    _ => {
                        return Err(OrchestratorError::ReadFailed(
                            "isAllowlisted did not return a bool".to_string(),
                        ));
                    }
                };
                Ok::<_, OrchestratorError>((holder, balance, is_allowlisted))
            })
            .buffered(self.concurrency.max(1))
            .try_collect::<Vec<_>>()
            .await?;

        Ok(holders
            .into_iter()
            .filter(|(_, balance, _)| !balance.is_zero())
            .map(|(holder, balance, is_allowlisted)| BalanceHolder {
                address: holder.to_checksum(None),
                balance: balance.to_string(),
                is_allowlisted,
            })
            .collect())
    }
}

/// Senders and recipients in first-seen order, without the zero address.
fn transfer_participants(logs: &[TransferLog]) -> Vec<Address> {
    let mut seen = HashSet::new();
    let mut participants = Vec::new();
    for log in logs {
        for candidate in [log.from, log.to] {
            if candidate != Address::ZERO && seen.insert(candidate) {
                participants.push(candidate);
            }
        }
    }
    participants
}

pub(crate) async fn call_view(
    reader: &dyn ChainReader,
    abi: &ContractAbi,
    to: Address,
    function: &str,
    args: Vec<DynSolValue>,
) -> Result<Vec<DynSolValue>, OrchestratorError> {
    let call = abi
        .encode_call(to, function, args)
        .map_err(|e| OrchestratorError::InvalidCall(e.to_string()))?;
    let data = reader
        .read_call(&call)
        .await
        .map_err(|e| OrchestratorError::ReadFailed(e.to_string()))?;
    abi.decode_output(&call, &data)
        .map_err(|e| OrchestratorError::ReadFailed(e.to_string()))
}

fn single_uint(outputs: Vec<DynSolValue>, function: &str) -> Result<U256, OrchestratorError> {
    match outputs.as_slice() {
        [DynSolValue::Uint(value, _)] => Ok(*value),
        _ => Err(OrchestratorError::ReadFailed(format!(
            "{} did not return a uint",
            function
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::test_support::{
        DEPLOYER, HOLDER, Harness, OTHER_HOLDER, TOKEN_ADDRESS, address, deploy_fixture,
    };

    fn read(function: &str, args: Vec<CallArg>) -> ReadRequest {
        ReadRequest {
            contract_address: TOKEN_ADDRESS.to_string(),
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            function: function.to_string(),
            args,
        }
    }

    fn transfer(from: Address, to: Address, value: u64, block: u64) -> TransferLog {
        TransferLog {
            from,
            to,
            value: U256::from(value),
            block_number: Some(block),
        }
    }

    fn stub_holder(harness: &Harness, holder: &str, balance: U256, allowlisted: bool) {
        let token = address(TOKEN_ADDRESS);
        let holder = DynSolValue::Address(address(holder));
        harness.chain.stub_read(
            token,
            "balanceOf",
            vec![holder.clone()],
            vec![DynSolValue::Uint(balance, 256)],
        );
        harness.chain.stub_read(
            token,
            "isAllowlisted",
            vec![holder],
            vec![DynSolValue::Bool(allowlisted)],
        );
    }

    #[tokio::test]
    async fn balance_is_a_decimal_string_beyond_u64() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;
        let large = U256::from(10u64).pow(U256::from(24u64));
        stub_holder(&harness, HOLDER, large, true);

        let value = harness
            .read_executor()
            .execute_read(read("balanceOf", vec![CallArg::Address(address(HOLDER))]))
            .await
            .expect("reads");

        assert_eq!(value, json!("1000000000000000000000000"));
        assert_eq!(
            harness.chain.rpc_urls(),
            vec![Some("http://127.0.0.1:8545".to_string())]
        );
    }

    #[tokio::test]
    async fn scalar_outputs_are_unwrapped() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;
        let token = address(TOKEN_ADDRESS);
        let chain = &harness.chain;
        chain.stub_read(token, "decimals", vec![], vec![DynSolValue::Uint(U256::from(18u8), 8)]);
        chain.stub_read(token, "owner", vec![], vec![DynSolValue::Address(address(DEPLOYER))]);
        chain.stub_read(token, "paused", vec![], vec![DynSolValue::Bool(false)]);

        let executor = harness.read_executor();
        assert_eq!(
            executor.execute_read(read("decimals", vec![])).await.expect("decimals"),
            json!(18)
        );
        assert_eq!(
            executor.execute_read(read("owner", vec![])).await.expect("owner"),
            json!(DEPLOYER)
        );
        assert_eq!(
            executor.execute_read(read("paused", vec![])).await.expect("paused"),
            json!(false)
        );
    }

    #[tokio::test]
    async fn failing_node_is_a_read_failure() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;

        let error = harness
            .read_executor()
            .execute_read(read("totalSupply", vec![]))
            .await
            .expect_err("no stub");
        assert!(matches!(error, OrchestratorError::ReadFailed(_)));
    }

    #[tokio::test]
    async fn read_of_unknown_deployment_is_not_found() {
        let harness = Harness::new().await;
        let error = harness
            .read_executor()
            .execute_read(read("name", vec![]))
            .await
            .expect_err("no deployment");
        assert!(matches!(error, OrchestratorError::NotFound(_)));
    }

    #[tokio::test]
    async fn holders_exclude_zero_address_and_empty_balances() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;
        let deployer = address(DEPLOYER);
        let holder = address(HOLDER);
        let other = address(OTHER_HOLDER);
        harness.chain.set_transfer_logs(
            20,
            vec![
                transfer(Address::ZERO, deployer, 1_000, 1),
                transfer(deployer, other, 300, 5),
                transfer(deployer, holder, 200, 9),
                transfer(other, holder, 300, 12),
            ],
        );
        stub_holder(&harness, DEPLOYER, U256::from(500u64), true);
        stub_holder(&harness, OTHER_HOLDER, U256::ZERO, true);
        stub_holder(&harness, HOLDER, U256::from(500u64), false);

        let holders = harness
            .read_executor()
            .balance_holders(TOKEN_ADDRESS, None)
            .await
            .expect("scan succeeds");

        assert_eq!(
            holders,
            vec![
                BalanceHolder {
                    address: DEPLOYER.to_string(),
                    balance: "500".to_string(),
                    is_allowlisted: true,
                },
                BalanceHolder {
                    address: HOLDER.to_string(),
                    balance: "500".to_string(),
                    is_allowlisted: false,
                },
            ]
        );
        assert_eq!(harness.chain.rpc_urls(), vec![None]);
    }

    #[test]
    fn participants_keep_first_seen_order_without_repeats() {
        let deployer = address(DEPLOYER);
        let holder = address(HOLDER);
        let other = address(OTHER_HOLDER);
        let logs = vec![
            transfer(Address::ZERO, deployer, 1_000, 1),
            transfer(deployer, holder, 10, 2),
            transfer(holder, deployer, 5, 3),
            transfer(deployer, other, 10, 4),
            transfer(other, holder, 1, 5),
            transfer(holder, Address::ZERO, 1, 6),
        ];

        assert_eq!(transfer_participants(&logs), vec![deployer, holder, other]);
    }

    #[tokio::test]
    async fn one_failed_holder_fails_the_scan() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;
        harness.chain.set_transfer_logs(
            4,
            vec![
                transfer(Address::ZERO, address(DEPLOYER), 10, 1),
                transfer(address(DEPLOYER), address(HOLDER), 5, 2),
            ],
        );
        stub_holder(&harness, DEPLOYER, U256::from(5u64), true);
        harness.chain.fail_read(
            address(TOKEN_ADDRESS),
            "balanceOf",
            vec![DynSolValue::Address(address(HOLDER))],
        );
        harness.chain.stub_read(
            address(TOKEN_ADDRESS),
            "isAllowlisted",
            vec![DynSolValue::Address(address(HOLDER))],
            vec![DynSolValue::Bool(true)],
        );

        let error = harness
            .read_executor()
            .balance_holders(TOKEN_ADDRESS, None)
            .await
            .expect_err("balanceOf fails for one holder");
        assert!(matches!(
            error,
            OrchestratorError::ReadFailed(message) if message.contains("connection reset")
        ));
    }

    #[tokio::test]
    async fn no_transfers_means_no_holders() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;
        harness.chain.set_transfer_logs(100, Vec::new());

        let holders = harness
            .read_executor()
            .balance_holders(TOKEN_ADDRESS, None)
            .await
            .expect("scan succeeds");
        assert!(holders.is_empty());
    }
}

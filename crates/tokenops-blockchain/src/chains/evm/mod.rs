use std::time::{Duration, Instant};

use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, B256, Bytes},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{Filter, TransactionRequest},
    signers::local::PrivateKeySigner,
    sol_types::SolEvent,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tokenops_domain::ChainId;
use tokenops_observability::{record_chain_rpc_call, record_transfer_log_scan};

use crate::{
    ChainConfig,
    client::{ChainReader, ChainWriter, ContractCall, ReceiptSummary, TransferLog},
    error::BlockchainError,
    revert::SimulationFailure,
    rpc_executor::{RetryPolicy, execute_with_retry},
    rpc_rate_limiter::RpcRateLimiter,
};

mod events;

use events::Transfer;

fn parse_rpc_url(rpc_url: &str) -> Result<Url, BlockchainError> {
    rpc_url
        .parse::<Url>()
        .map_err(|e| BlockchainError::InvalidRpcUrl {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })
}

fn status_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() { "ok" } else { "error" }
}

/// Read-only client over a lazily connected HTTP provider.
pub(crate) struct EvmChainClient {
    chain_id: ChainId,
    provider: DynProvider,
    rpc_rate_limiter: RpcRateLimiter,
    rpc_retry_policy: RetryPolicy,
    receipt_timeout: Option<Duration>,
    log_block_window: Option<u64>,
}

impl EvmChainClient {
    pub(crate) fn new(
        config: &ChainConfig,
        rpc_url: &str,
        rpc_rate_limiter: RpcRateLimiter,
    ) -> Result<Self, BlockchainError> {
        let url = parse_rpc_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            chain_id: config.chain_id(),
            provider,
            rpc_rate_limiter,
            rpc_retry_policy: RetryPolicy::read_default(),
            receipt_timeout: config.tx_receipt_timeout(),
            log_block_window: config.log_block_window(),
        })
    }

    fn call_request(call: &ContractCall) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.calldata.clone())
    }

    async fn scan_transfer_window(
        &self,
        token: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferLog>, BlockchainError> {
        let filter = Filter::new()
            .address(token)
            .event_signature(Transfer::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);

        let started = Instant::now();
        let result = execute_with_retry(
            &self.rpc_retry_policy,
            &self.rpc_rate_limiter,
            self.chain_id,
            "eth_getLogs",
            || self.provider.get_logs(&filter),
        )
        .await;
        record_transfer_log_scan(
            self.chain_id.get(),
            status_label(&result),
            started.elapsed(),
            to_block.saturating_sub(from_block).saturating_add(1),
            result.as_ref().map(Vec::len).unwrap_or(0),
        );

        let logs = result.map_err(BlockchainError::get_logs)?;
        logs.iter()
            .map(|log| {
                let decoded =
                    log.log_decode::<Transfer>()
                        .map_err(|e| BlockchainError::DecodeLog {
                            reason: e.to_string(),
                        })?;
                let event = decoded.inner.data;
                Ok(TransferLog {
                    from: event.from,
                    to: event.to,
                    value: event.value,
                    block_number: log.block_number,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ChainReader for EvmChainClient {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn simulate_call(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<Bytes, SimulationFailure> {
        let tx = Self::call_request(call).with_from(from);
        let started = Instant::now();
        let result = execute_with_retry(
            &self.rpc_retry_policy,
            &self.rpc_rate_limiter,
            self.chain_id,
            "eth_call",
            || self.provider.call(tx.clone()),
        )
        .await;
        record_chain_rpc_call(
            self.chain_id.get(),
            "simulate",
            status_label(&result),
            started.elapsed(),
        );

        result.map_err(|e| SimulationFailure::from_rpc_error(&e))
    }

    async fn read_call(&self, call: &ContractCall) -> Result<Bytes, BlockchainError> {
        let tx = Self::call_request(call);
        let started = Instant::now();
        let result = execute_with_retry(
            &self.rpc_retry_policy,
            &self.rpc_rate_limiter,
            self.chain_id,
            "eth_call",
            || self.provider.call(tx.clone()),
        )
        .await;
        record_chain_rpc_call(
            self.chain_id.get(),
            "read",
            status_label(&result),
            started.elapsed(),
        );

        result.map_err(BlockchainError::call)
    }

    async fn block_number(&self) -> Result<u64, BlockchainError> {
        let started = Instant::now();
        let result = execute_with_retry(
            &self.rpc_retry_policy,
            &self.rpc_rate_limiter,
            self.chain_id,
            "eth_blockNumber",
            || self.provider.get_block_number(),
        )
        .await;
        record_chain_rpc_call(
            self.chain_id.get(),
            "block_number",
            status_label(&result),
            started.elapsed(),
        );

        result.map_err(BlockchainError::get_block_number)
    }

    async fn transfer_logs(
        &self,
        token: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferLog>, BlockchainError> {
        let Some(window) = self.log_block_window else {
            return self.scan_transfer_window(token, from_block, to_block).await;
        };

        let mut logs = Vec::new();
        let mut start = from_block;
        while start <= to_block {
            let end = start.saturating_add(window - 1).min(to_block);
            tracing::trace!(
                chain_id = %self.chain_id,
                token = %token,
                from_block = start,
                to_block = end,
                "Scanning Transfer logs"
            );
            logs.extend(self.scan_transfer_window(token, start, end).await?);
            if end == to_block {
                break;
            }
            start = end + 1;
        }
        Ok(logs)
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<ReceiptSummary, BlockchainError> {
        self.rpc_rate_limiter.acquire().await;
        let started = Instant::now();
        let result = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .with_timeout(self.receipt_timeout)
            .get_receipt()
            .await;
        record_chain_rpc_call(
            self.chain_id.get(),
            "receipt",
            status_label(&result),
            started.elapsed(),
        );

        let receipt = result.map_err(|e| BlockchainError::ReceiptFailed {
            reason: e.to_string(),
        })?;

        Ok(ReceiptSummary {
            transaction_hash: receipt.transaction_hash,
            success: ReceiptResponse::status(&receipt),
            gas_used: receipt.gas_used,
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
        })
    }
}

/// Signing client. Each submission is sent exactly once.
pub(crate) struct EvmChainWriter {
    chain_id: ChainId,
    address: Address,
    provider: DynProvider,
    rpc_rate_limiter: RpcRateLimiter,
}

impl EvmChainWriter {
    pub(crate) fn new(
        config: &ChainConfig,
        rpc_url: &str,
        signer: PrivateKeySigner,
        rpc_rate_limiter: RpcRateLimiter,
    ) -> Result<Self, BlockchainError> {
        let url = parse_rpc_url(rpc_url)?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            chain_id: config.chain_id(),
            address,
            provider,
            rpc_rate_limiter,
        })
    }

    async fn send(&self, tx: TransactionRequest, operation: &str) -> Result<B256, BlockchainError> {
        self.rpc_rate_limiter.acquire().await;
        let started = Instant::now();
        let result = self.provider.send_transaction(tx).await;
        record_chain_rpc_call(
            self.chain_id.get(),
            operation,
            status_label(&result),
            started.elapsed(),
        );

        let pending = result.map_err(BlockchainError::submission)?;
        let hash = *pending.tx_hash();
        tracing::debug!(
            chain_id = %self.chain_id,
            from = %self.address,
            tx_hash = %hash,
            "{} accepted by node",
            operation
        );
        Ok(hash)
    }
}

#[async_trait]
impl ChainWriter for EvmChainWriter {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit_call(
        &self,
        call: &ContractCall,
        gas_limit: Option<u64>,
    ) -> Result<B256, BlockchainError> {
        let mut tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(call.to)
            .with_input(call.calldata.clone());
        if let Some(gas_limit) = gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }
        self.send(tx, "submit").await
    }

    async fn deploy_contract(&self, code: Bytes, gas_limit: u64) -> Result<B256, BlockchainError> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_deploy_code(code)
            .with_gas_limit(gas_limit);
        self.send(tx, "deploy").await
    }
}

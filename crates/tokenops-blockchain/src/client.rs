use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use tokenops_domain::ChainId;

use crate::{error::BlockchainError, revert::SimulationFailure};

/// ABI-encoded call to a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub function: String,
    /// Number of inputs, used to pick the right overload when decoding output.
    pub arity: usize,
    pub calldata: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: B256,
    pub success: bool,
    pub gas_used: u64,
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLog {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub block_number: Option<u64>,
}

/// Read side of a chain connection: calls, logs and receipts.
#[async_trait]
pub trait ChainReader: Send + Sync {
    fn chain_id(&self) -> ChainId;

    /// `eth_call` with `from` set, returning the full failure chain on revert.
    async fn simulate_call(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<Bytes, SimulationFailure>;

    async fn read_call(&self, call: &ContractCall) -> Result<Bytes, BlockchainError>;

    async fn block_number(&self) -> Result<u64, BlockchainError>;

    /// `Transfer` events emitted by `token` in `[from_block, to_block]`, in chain order.
    async fn transfer_logs(
        &self,
        token: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferLog>, BlockchainError>;

    /// Single wait for the receipt, bounded by the chain's receipt timeout.
    async fn wait_for_receipt(&self, hash: B256) -> Result<ReceiptSummary, BlockchainError>;
}

/// Signing side of a chain connection. Submissions are sent once.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    fn address(&self) -> Address;

    async fn submit_call(
        &self,
        call: &ContractCall,
        gas_limit: Option<u64>,
    ) -> Result<B256, BlockchainError>;

    async fn deploy_contract(&self, code: Bytes, gas_limit: u64) -> Result<B256, BlockchainError>;
}

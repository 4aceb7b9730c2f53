//! Public DTOs, decoupled from SeaORM model internals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokenops_domain::{ChainId, TransactionStatus};

/// Registered token template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenContractRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub abi: serde_json::Value,
    pub bytecode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTokenContract {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub abi: serde_json::Value,
    pub bytecode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: String,
    /// Checksummed 0x address.
    pub contract_address: String,
    pub chain_id: ChainId,
    pub deployer_address: String,
    pub token_contract_id: String,
    /// Decimals passed to the constructor; whole-token amounts scale by this.
    pub decimals: u8,
    pub transaction_hash: String,
    /// Base units, decimal string.
    pub initial_supply: String,
    pub gas_used: Option<String>,
    pub status: TransactionStatus,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeployment {
    pub contract_address: String,
    pub chain_id: ChainId,
    pub deployer_address: String,
    pub token_contract_id: String,
    pub decimals: u8,
    pub transaction_hash: String,
    pub initial_supply: String,
    pub gas_used: Option<String>,
    pub status: TransactionStatus,
}

/// One attempted write against a deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub deployment_id: String,
    pub transaction_hash: String,
    pub function_name: String,
    /// Ordered JSON array of call arguments.
    pub parameters: serde_json::Value,
    pub from_address: String,
    pub status: TransactionStatus,
    pub gas_used: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionRecord {
    pub deployment_id: String,
    pub transaction_hash: String,
    pub function_name: String,
    pub parameters: serde_json::Value,
    pub from_address: String,
    pub status: TransactionStatus,
    pub error_message: Option<String>,
}

/// Terminal outcome written by the confirmation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub status: TransactionStatus,
    pub gas_used: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCounts {
    pub token_contracts: u64,
    pub deployments: u64,
    pub transactions: u64,
}

impl TableCounts {
    pub fn total(&self) -> u64 {
        self.token_contracts + self.deployments + self.transactions
    }
}

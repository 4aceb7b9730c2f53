//! Chain access for token templates: configuration, dynamic ABI encoding,
//! call simulation with revert decoding, and alloy-backed clients.

mod abi;
mod accounts;
mod chains;
mod client;
mod config;
mod config_error;
mod connector;
mod error;
mod revert;
mod rpc_executor;
mod rpc_rate_limiter;
mod simulator;

pub use abi::{ContractAbi, normalize_outputs, normalize_value};
pub use accounts::{AccountRegistry, signer_from_private_key};
pub use client::{ChainReader, ChainWriter, ContractCall, ReceiptSummary, TransferLog};
pub use config::{
    AccountsConfig, AccountsConfigRaw, ChainConfig, ChainConfigKey, ChainConfigRaw,
    ChainRegistryConfig, ChainRegistryConfigRaw,
};
pub use config_error::ConfigError;
pub use connector::{ChainConnector, EvmChainConnector};
pub use error::BlockchainError;
pub use revert::{FailureFrame, RevertDecoder, RevertReason, SimulationFailure};
pub use simulator::simulate;

// Re-exported so dependents build values and signers against the same alloy version.
pub use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, B256, Bytes, U256},
    signers::local::PrivateKeySigner,
};

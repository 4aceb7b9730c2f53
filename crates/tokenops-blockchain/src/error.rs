use alloy::{
    signers::local::LocalSignerError,
    transports::{RpcError, TransportErrorKind},
};
use tokenops_domain::{AccountRole, ChainId};

#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    #[error("Unsupported chain id {chain_id}")]
    UnsupportedChain { chain_id: ChainId },

    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("Invalid private key (length: {key_length})")]
    InvalidPrivateKey {
        key_length: usize,
        #[source]
        source: LocalSignerError,
    },

    #[error("Private key for account {role} not configured")]
    MissingAccount { role: AccountRole },

    #[error("Invalid contract ABI: {reason}")]
    InvalidAbi { reason: String },

    #[error("Function '{function}' not found in contract ABI")]
    UnknownFunction { function: String },

    #[error("Invalid arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },

    #[error("Invalid bytecode: {reason}")]
    InvalidBytecode { reason: String },

    #[error("Failed to decode {function} output: {reason}")]
    DecodeOutput { function: String, reason: String },

    #[error("Contract call failed: {reason}")]
    Call {
        reason: String,
        #[source]
        source: Option<RpcError<TransportErrorKind>>,
    },

    #[error("Transaction submission failed: {reason}")]
    Submission {
        reason: String,
        #[source]
        source: Option<RpcError<TransportErrorKind>>,
    },

    #[error("Transaction receipt failed: {reason}")]
    ReceiptFailed { reason: String },

    #[error("Failed to get logs: {reason}")]
    GetLogs {
        reason: String,
        #[source]
        source: Option<RpcError<TransportErrorKind>>,
    },

    #[error("Failed to get block number: {reason}")]
    GetBlockNumber {
        reason: String,
        #[source]
        source: Option<RpcError<TransportErrorKind>>,
    },

    #[error("Failed to decode Transfer log: {reason}")]
    DecodeLog { reason: String },
}

impl BlockchainError {
    pub(crate) fn call(err: RpcError<TransportErrorKind>) -> Self {
        Self::Call {
            reason: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn submission(err: RpcError<TransportErrorKind>) -> Self {
        Self::Submission {
            reason: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn get_logs(err: RpcError<TransportErrorKind>) -> Self {
        Self::GetLogs {
            reason: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn get_block_number(err: RpcError<TransportErrorKind>) -> Self {
        Self::GetBlockNumber {
            reason: err.to_string(),
            source: Some(err),
        }
    }
}

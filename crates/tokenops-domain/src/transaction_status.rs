use std::str::FromStr;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

/// Hash recorded for attempts that never reached the chain (rejected in simulation
/// or failed before submission returned a hash).
pub const SENTINEL_TRANSACTION_HASH: B256 = B256::ZERO;

/// Lifecycle of a recorded write.
///
/// `Pending` moves to `Confirmed` or `Failed` at most once. Records created
/// directly as `Failed` never transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown transaction status '{0}'")]
pub struct UnknownTransactionStatus(pub String);

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownTransactionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            _ => Err(UnknownTransactionStatus(s.to_string())),
        }
    }
}

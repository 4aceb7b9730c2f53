use std::collections::BTreeMap;

use alloy::{
    primitives::Address,
    signers::local::{LocalSignerError, PrivateKeySigner},
};
use tokenops_domain::AccountRole;

use crate::{AccountsConfig, error::BlockchainError};

pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, BlockchainError> {
    private_key
        .trim()
        .parse()
        .map_err(|e: LocalSignerError| BlockchainError::InvalidPrivateKey {
            key_length: private_key.len(),
            source: e,
        })
}

/// Signers for the static account roles, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    signers: BTreeMap<AccountRole, PrivateKeySigner>,
}

impl AccountRegistry {
    pub fn from_config(config: &AccountsConfig) -> Result<Self, BlockchainError> {
        let mut signers = BTreeMap::new();
        for role in config.configured_roles() {
            if let Some(key) = config.private_key(role) {
                signers.insert(role, signer_from_private_key(key)?);
            }
        }
        Ok(Self { signers })
    }

    pub fn from_signers(signers: impl IntoIterator<Item = (AccountRole, PrivateKeySigner)>) -> Self {
        Self {
            signers: signers.into_iter().collect(),
        }
    }

    /// Fails with `MissingAccount` when the role has no configured key.
    pub fn resolve_signer(&self, role: AccountRole) -> Result<PrivateKeySigner, BlockchainError> {
        self.signers
            .get(&role)
            .cloned()
            .ok_or(BlockchainError::MissingAccount { role })
    }

    pub fn address(&self, role: AccountRole) -> Option<Address> {
        self.signers.get(&role).map(PrivateKeySigner::address)
    }

    pub fn configured_roles(&self) -> impl Iterator<Item = AccountRole> + '_ {
        self.signers.keys().copied()
    }
}

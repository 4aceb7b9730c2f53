use std::{collections::HashMap, sync::Arc};

use alloy::signers::local::PrivateKeySigner;
use tokenops_domain::ChainId;

use crate::{
    ChainConfig, ChainRegistryConfig,
    chains::evm::{EvmChainClient, EvmChainWriter},
    client::{ChainReader, ChainWriter},
    error::BlockchainError,
    rpc_rate_limiter::RpcRateLimiter,
};

/// Builds chain clients for the supported chains.
///
/// Unknown chain ids are rejected here, before any provider is created.
/// Building a client performs no I/O.
pub trait ChainConnector: Send + Sync {
    fn chain(&self, chain_id: ChainId) -> Result<&ChainConfig, BlockchainError>;

    fn supported_chains(&self) -> Vec<ChainId>;

    /// `rpc_url` falls back to the chain's configured default.
    fn reader(
        &self,
        chain_id: ChainId,
        rpc_url: Option<&str>,
    ) -> Result<Arc<dyn ChainReader>, BlockchainError>;

    fn writer(
        &self,
        chain_id: ChainId,
        rpc_url: Option<&str>,
        signer: PrivateKeySigner,
    ) -> Result<Arc<dyn ChainWriter>, BlockchainError>;
}

struct ChainEntry {
    config: ChainConfig,
    rpc_rate_limiter: RpcRateLimiter,
}

pub struct EvmChainConnector {
    chains: HashMap<ChainId, ChainEntry>,
}

impl EvmChainConnector {
    pub fn new(registry: &ChainRegistryConfig) -> Self {
        let chains = registry
            .0
            .iter()
            .map(|config| {
                let rpc_rate_limiter =
                    RpcRateLimiter::per_second(config.max_rpc_requests_per_second());
                if let Some(rps) = config.max_rpc_requests_per_second() {
                    tracing::info!(
                        chain_id = %config.chain_id(),
                        "{}: RPC rate limiting enabled at {} requests/second",
                        config.name(),
                        rps
                    );
                }
                (
                    config.chain_id(),
                    ChainEntry {
                        config: config.clone(),
                        rpc_rate_limiter,
                    },
                )
            })
            .collect();

        Self { chains }
    }

    fn entry(&self, chain_id: ChainId) -> Result<&ChainEntry, BlockchainError> {
        self.chains
            .get(&chain_id)
            .ok_or(BlockchainError::UnsupportedChain { chain_id })
    }
}

impl ChainConnector for EvmChainConnector {
    fn chain(&self, chain_id: ChainId) -> Result<&ChainConfig, BlockchainError> {
        self.entry(chain_id).map(|entry| &entry.config)
    }

    fn supported_chains(&self) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self.chains.keys().copied().collect();
        ids.sort();
        ids
    }

    fn reader(
        &self,
        chain_id: ChainId,
        rpc_url: Option<&str>,
    ) -> Result<Arc<dyn ChainReader>, BlockchainError> {
        let entry = self.entry(chain_id)?;
        let rpc_url = rpc_url.unwrap_or(entry.config.default_rpc_url());
        let client = EvmChainClient::new(&entry.config, rpc_url, entry.rpc_rate_limiter.clone())?;
        Ok(Arc::new(client))
    }

    fn writer(
        &self,
        chain_id: ChainId,
        rpc_url: Option<&str>,
        signer: PrivateKeySigner,
    ) -> Result<Arc<dyn ChainWriter>, BlockchainError> {
        let entry = self.entry(chain_id)?;
        let rpc_url = rpc_url.unwrap_or(entry.config.default_rpc_url());
        let writer = EvmChainWriter::new(
            &entry.config,
            rpc_url,
            signer,
            entry.rpc_rate_limiter.clone(),
        )?;
        Ok(Arc::new(writer))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeMap;

    use super::*;
    use crate::{ChainConfigKey, ChainConfigRaw, ChainRegistryConfigRaw};

    const ANVIL_KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn connector() -> EvmChainConnector {
        let anvil = ChainConfigRaw {
            enabled: true,
            chain_id: ChainId::new(31_337),
            name: "Anvil".to_string(),
            default_rpc_url: "http://127.0.0.1:8545".to_string(),
            max_rpc_requests_per_second: Some(10),
            tx_receipt_timeout_ms: 1_000,
            log_block_window: Some(5_000),
        };
        let registry =
            ChainRegistryConfigRaw(BTreeMap::from([(ChainConfigKey::Anvil31337, anvil)]))
                .resolve()
                .unwrap();
        EvmChainConnector::new(&registry)
    }

    #[test]
    fn unknown_chain_is_rejected_before_connecting() {
        let connector = connector();
        assert!(matches!(
            connector.reader(ChainId::new(137), None),
            Err(BlockchainError::UnsupportedChain { chain_id }) if chain_id.get() == 137
        ));
        let signer: PrivateKeySigner = ANVIL_KEY_0.parse().unwrap();
        assert!(matches!(
            connector.writer(ChainId::new(5), Some("http://127.0.0.1:8545"), signer),
            Err(BlockchainError::UnsupportedChain { .. })
        ));
    }

    #[tokio::test]
    async fn builds_clients_without_network_io() {
        let connector = connector();
        let reader = connector.reader(ChainId::new(31_337), None).unwrap();
        assert_eq!(reader.chain_id(), ChainId::new(31_337));

        let signer: PrivateKeySigner = ANVIL_KEY_0.parse().unwrap();
        let expected = signer.address();
        let writer = connector
            .writer(ChainId::new(31_337), Some("http://localhost:9999"), signer)
            .unwrap();
        assert_eq!(writer.address(), expected);
        assert_eq!(connector.supported_chains(), vec![ChainId::new(31_337)]);
    }

    #[test]
    fn rejects_malformed_rpc_url() {
        assert!(matches!(
            connector().reader(ChainId::new(31_337), Some("not a url")),
            Err(BlockchainError::InvalidRpcUrl { .. })
        ));
    }
}

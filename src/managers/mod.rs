mod config;

use std::sync::Arc;

pub(crate) use config::{ManagersConfig, ManagersConfigRaw};
use tokenops_blockchain::{
    AccountRegistry, AccountsConfig, ChainConnector, EvmChainConnector,
};
use tokenops_repository::RepositoryManager;

/// Long-lived handles shared by every request. Immutable after startup.
pub(crate) struct Managers {
    pub repository: Arc<RepositoryManager>,
    pub chains: Arc<dyn ChainConnector>,
    pub accounts: Arc<AccountRegistry>,
}

pub(crate) async fn initialize(config: &ManagersConfig, accounts: &AccountsConfig) -> Managers {
    let repository = Arc::new(
        RepositoryManager::connect(&config.repository)
            .await
            .expect("Failed to initialize repository manager"),
    );

    let chains: Arc<dyn ChainConnector> = Arc::new(EvmChainConnector::new(&config.chains));
    for chain in &config.chains.0 {
        tracing::info!(
            chain_id = %chain.chain_id(),
            rpc_url = %chain.default_rpc_url(),
            "Chain {} enabled",
            chain.name()
        );
    }

    let accounts = Arc::new(
        AccountRegistry::from_config(accounts).expect("Failed to load account private keys"),
    );
    for role in accounts.configured_roles() {
        if let Some(address) = accounts.address(role) {
            tracing::info!(role = %role, address = %address, "Signing account loaded");
        }
    }
    if accounts.address(tokenops_domain::AccountRole::Deployer).is_none() {
        tracing::warn!("DEPLOYER_PRIVATE_KEY not configured; deployments will be rejected");
    }

    Managers {
        repository,
        chains,
        accounts,
    }
}

use std::{collections::BTreeMap, time::Duration};

use alloy::{signers::local::PrivateKeySigner, transports::http::reqwest::Url};
use serde::{Deserialize, Serialize};
use tokenops_domain::{AccountRole, ChainId};

use crate::ConfigError;

/// Configuration for one supported EVM chain.
///
/// Requests may carry their own RPC URL; `default_rpc_url` is used when they
/// don't and for background enrichment (deployment details).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfigRaw {
    /// Disabled entries are ignored during config resolution.
    #[serde(default)]
    pub enabled: bool,

    pub chain_id: ChainId,

    /// Human-readable network name ("Anvil", "Sepolia").
    pub name: String,

    pub default_rpc_url: String,

    /// Maximum RPC requests per second across all clients for this chain.
    /// `None` means unlimited.
    pub max_rpc_requests_per_second: Option<u32>,

    /// Timeout for a single receipt wait in milliseconds. 0 disables the timeout.
    pub tx_receipt_timeout_ms: u64,

    /// Block span per `eth_getLogs` request when scanning Transfer history.
    /// `None` scans from genesis to head in one request.
    pub log_block_window: Option<u64>,
}

impl ChainConfigRaw {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ensure_default_rpc_url(&self) -> Result<(), ConfigError> {
        self.default_rpc_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidConfig(format!(
                "default_rpc_url '{}' is not a valid URL: {}",
                self.default_rpc_url, e
            ))
        })?;
        Ok(())
    }

    /// Ensures the RPC rate limit, if configured, is greater than zero.
    pub fn ensure_max_rpc_requests_per_second(&self) -> Result<(), ConfigError> {
        if self.max_rpc_requests_per_second == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_rpc_requests_per_second must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_log_block_window(&self) -> Result<(), ConfigError> {
        if self.log_block_window == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "log_block_window must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve(self) -> Result<ChainConfig, ConfigError> {
        self.ensure_default_rpc_url()?;
        self.ensure_max_rpc_requests_per_second()?;
        self.ensure_log_block_window()?;

        Ok(ChainConfig {
            chain_id: self.chain_id,
            name: self.name,
            default_rpc_url: self.default_rpc_url,
            max_rpc_requests_per_second: self.max_rpc_requests_per_second,
            tx_receipt_timeout_ms: self.tx_receipt_timeout_ms,
            log_block_window: self.log_block_window,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    chain_id: ChainId,
    name: String,
    default_rpc_url: String,
    max_rpc_requests_per_second: Option<u32>,
    tx_receipt_timeout_ms: u64,
    log_block_window: Option<u64>,
}

impl ChainConfig {
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_rpc_url(&self) -> &str {
        &self.default_rpc_url
    }

    pub fn max_rpc_requests_per_second(&self) -> Option<u32> {
        self.max_rpc_requests_per_second
    }

    pub fn tx_receipt_timeout(&self) -> Option<Duration> {
        if self.tx_receipt_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.tx_receipt_timeout_ms))
        }
    }

    pub fn log_block_window(&self) -> Option<u64> {
        self.log_block_window
    }
}

/// Stable config keys for supported chains.
///
/// These keys are the only accepted TOML entries under `[managers.chains]`.
/// Each key pins the chain id its entry must declare.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChainConfigKey {
    #[serde(rename = "mainnet_1")]
    Mainnet1,
    #[serde(rename = "sepolia_11155111")]
    Sepolia11155111,
    #[serde(rename = "anvil_31337")]
    Anvil31337,
}

impl ChainConfigKey {
    fn expected_chain_id(&self) -> ChainId {
        match self {
            ChainConfigKey::Mainnet1 => ChainId::new(1),
            ChainConfigKey::Sepolia11155111 => ChainId::new(11_155_111),
            ChainConfigKey::Anvil31337 => ChainId::new(31_337),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainRegistryConfigRaw(pub BTreeMap<ChainConfigKey, ChainConfigRaw>);

impl ChainRegistryConfigRaw {
    pub fn resolve(self) -> Result<ChainRegistryConfig, ConfigError> {
        let mut resolved = Vec::with_capacity(self.0.len());
        for (key, config) in self.0 {
            if !config.is_enabled() {
                continue;
            }

            let expected_id = key.expected_chain_id();
            if config.chain_id != expected_id {
                return Err(ConfigError::InvalidConfig(format!(
                    "chain config key '{:?}' expects chain_id {}, got {}",
                    key, expected_id, config.chain_id
                )));
            }

            resolved.push(config.resolve()?);
        }
        if resolved.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "no enabled chains configured".to_string(),
            ));
        }
        Ok(ChainRegistryConfig(resolved))
    }
}

#[derive(Debug, Clone)]
pub struct ChainRegistryConfig(pub Vec<ChainConfig>);

/// Private keys for the static signing roles.
///
/// **Secret handling**: keys are normally injected from the environment
/// (`DEPLOYER_PRIVATE_KEY`, `A1`, `A2`, `A3`) at config load time. Missing keys
/// are allowed; requests acting as an unconfigured role fail at request time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsConfigRaw {
    pub deployer_private_key: Option<String>,
    pub a1_private_key: Option<String>,
    pub a2_private_key: Option<String>,
    pub a3_private_key: Option<String>,
}

impl AccountsConfigRaw {
    pub fn key_for(&self, role: AccountRole) -> Option<&str> {
        match role {
            AccountRole::Deployer => self.deployer_private_key.as_deref(),
            AccountRole::A1 => self.a1_private_key.as_deref(),
            AccountRole::A2 => self.a2_private_key.as_deref(),
            AccountRole::A3 => self.a3_private_key.as_deref(),
        }
    }

    pub fn set_key(&mut self, role: AccountRole, key: String) {
        let slot = match role {
            AccountRole::Deployer => &mut self.deployer_private_key,
            AccountRole::A1 => &mut self.a1_private_key,
            AccountRole::A2 => &mut self.a2_private_key,
            AccountRole::A3 => &mut self.a3_private_key,
        };
        *slot = Some(key);
    }

    pub fn resolve(self) -> Result<AccountsConfig, ConfigError> {
        let mut keys = BTreeMap::new();
        for role in AccountRole::ALL {
            let Some(key) = self.key_for(role) else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            key.parse::<PrivateKeySigner>().map_err(|e| {
                ConfigError::InvalidConfig(format!("invalid private key for {}: {}", role, e))
            })?;
            keys.insert(role, key.to_string());
        }
        Ok(AccountsConfig { keys })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountsConfig {
    keys: BTreeMap<AccountRole, String>,
}

impl AccountsConfig {
    pub fn private_key(&self, role: AccountRole) -> Option<&str> {
        self.keys.get(&role).map(String::as_str)
    }

    pub fn configured_roles(&self) -> impl Iterator<Item = AccountRole> + '_ {
        self.keys.keys().copied()
    }
}

//! Typed default configurations for each environment.
//!
//! Each environment (development, testnet, mainnet) gets a fully constructed
//! [`ConfigRaw`] via [`config_for`]. User TOML is merged on top of these.

use std::{
    collections::BTreeMap,
    net::{IpAddr, Ipv4Addr},
};

use tokenops_blockchain::{
    AccountsConfigRaw, ChainConfigKey, ChainConfigRaw, ChainRegistryConfigRaw,
};
use tokenops_domain::ChainId;
use tokenops_repository::RepositoryManagerConfigRaw;

use super::{ConfigError, ConfigRaw};
use crate::{
    application::OrchestratorConfig,
    controllers::http_api_controller::router::HttpApiConfig,
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    managers::ManagersConfigRaw,
};

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "testnet" => Ok(testnet()),
        "mainnet" => Ok(mainnet()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults ─────────────────────────────────────────────

fn http_api(host: IpAddr) -> HttpApiConfig {
    HttpApiConfig {
        enabled: true,
        host,
        port: 3000,
    }
}

fn orchestrator() -> OrchestratorConfig {
    OrchestratorConfig {
        write_gas_limit: 1_000_000,
        deploy_gas_limit: 5_000_000,
        balance_holder_concurrency: 8,
        seed_templates: Vec::new(),
    }
}

fn repository(user: &str, max_connections: u32) -> RepositoryManagerConfigRaw {
    RepositoryManagerConfigRaw {
        user: user.to_string(),
        password: None,
        database: "tokenops".to_string(),
        host: "localhost".to_string(),
        port: 3306,
        max_connections,
        min_connections: 1,
    }
}

fn telemetry(enabled: bool) -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled,
            bind_address: "127.0.0.1:9464".to_string(),
        },
    }
}

// ── Chains ──────────────────────────────────────────────────────

fn anvil(enabled: bool) -> ChainConfigRaw {
    ChainConfigRaw {
        enabled,
        chain_id: ChainId::new(31_337),
        name: "Anvil".to_string(),
        default_rpc_url: "http://127.0.0.1:8545".to_string(),
        max_rpc_requests_per_second: None,
        tx_receipt_timeout_ms: 60_000,
        log_block_window: None,
    }
}

fn sepolia(enabled: bool) -> ChainConfigRaw {
    ChainConfigRaw {
        enabled,
        chain_id: ChainId::new(11_155_111),
        name: "Sepolia".to_string(),
        default_rpc_url: "https://rpc.sepolia.org".to_string(),
        max_rpc_requests_per_second: Some(10),
        tx_receipt_timeout_ms: 300_000,
        log_block_window: Some(50_000),
    }
}

fn mainnet_chain(enabled: bool) -> ChainConfigRaw {
    ChainConfigRaw {
        enabled,
        chain_id: ChainId::new(1),
        name: "Ethereum".to_string(),
        default_rpc_url: "https://eth.llamarpc.com".to_string(),
        max_rpc_requests_per_second: Some(10),
        tx_receipt_timeout_ms: 300_000,
        log_block_window: Some(10_000),
    }
}

fn chains(anvil_on: bool, sepolia_on: bool, mainnet_on: bool) -> ChainRegistryConfigRaw {
    ChainRegistryConfigRaw(BTreeMap::from([
        (ChainConfigKey::Anvil31337, anvil(anvil_on)),
        (ChainConfigKey::Sepolia11155111, sepolia(sepolia_on)),
        (ChainConfigKey::Mainnet1, mainnet_chain(mainnet_on)),
    ]))
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        logger: LoggerConfig {
            level: "tokenops_engine=trace,tokenops_blockchain=debug,tokenops_repository=debug"
                .to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(true),
        http_api: http_api(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        orchestrator: orchestrator(),
        accounts: AccountsConfigRaw::default(),
        managers: ManagersConfigRaw {
            repository: repository("root", 10),
            chains: chains(true, true, false),
        },
    }
}

fn testnet() -> ConfigRaw {
    ConfigRaw {
        environment: "testnet".to_string(),
        logger: LoggerConfig {
            level: "tokenops_engine=info,tokenops_blockchain=info".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(false),
        http_api: http_api(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        orchestrator: orchestrator(),
        accounts: AccountsConfigRaw::default(),
        managers: ManagersConfigRaw {
            repository: repository("tokenops", 20),
            chains: chains(false, true, false),
        },
    }
}

fn mainnet() -> ConfigRaw {
    ConfigRaw {
        environment: "mainnet".to_string(),
        logger: LoggerConfig {
            level: "tokenops_engine=info,tokenops_blockchain=warn".to_string(),
            format: LogFormat::Json,
        },
        telemetry: telemetry(true),
        http_api: http_api(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        orchestrator: orchestrator(),
        accounts: AccountsConfigRaw::default(),
        managers: ManagersConfigRaw {
            repository: repository("tokenops", 20),
            chains: chains(false, false, true),
        },
    }
}

#[cfg(test)]
mod tests {
    use figment::{Figment, providers::Serialized};

    use super::*;

    #[test]
    fn development_defaults_round_trip() {
        let config = config_for("development").expect("development defaults should resolve");
        let figment = Figment::from(Serialized::defaults(&config));
        let extracted: ConfigRaw = figment
            .extract()
            .expect("development defaults failed to extract");
        assert_eq!(extracted.environment, "development");
        assert!(extracted.telemetry.metrics.enabled);
        assert_eq!(extracted.managers.chains.0.len(), 3);
        assert_eq!(extracted.orchestrator.write_gas_limit, 1_000_000);
        assert_eq!(extracted.orchestrator.deploy_gas_limit, 5_000_000);
    }

    #[test]
    fn testnet_defaults_round_trip() {
        let config = config_for("testnet").expect("testnet defaults should resolve");
        let figment = Figment::from(Serialized::defaults(&config));
        let extracted: ConfigRaw = figment
            .extract()
            .expect("testnet defaults failed to extract");
        assert_eq!(extracted.environment, "testnet");
        assert!(!extracted.telemetry.metrics.enabled);
    }

    #[test]
    fn mainnet_defaults_round_trip() {
        let config = config_for("mainnet").expect("mainnet defaults should resolve");
        let figment = Figment::from(Serialized::defaults(&config));
        let extracted: ConfigRaw = figment
            .extract()
            .expect("mainnet defaults failed to extract");
        assert_eq!(extracted.environment, "mainnet");
        assert_eq!(extracted.logger.format, LogFormat::Json);
    }

    #[test]
    fn user_toml_overrides_defaults() {
        use figment::providers::{Format, Toml};

        let defaults = config_for("development").expect("development defaults should resolve");
        let user_toml = r#"
            environment = "development"
            [managers.repository]
            max_connections = 50
            [managers.chains.anvil_31337]
            default_rpc_url = "http://anvil:8545"
            [orchestrator]
            balance_holder_concurrency = 2
        "#;
        let figment = Figment::from(Serialized::defaults(&defaults)).merge(Toml::string(user_toml));
        let config: ConfigRaw = figment.extract().expect("merge failed");
        assert_eq!(config.managers.repository.max_connections, 50);
        assert_eq!(config.orchestrator.balance_holder_concurrency, 2);
        assert_eq!(
            config.managers.chains.0[&ChainConfigKey::Anvil31337].default_rpc_url,
            "http://anvil:8545"
        );
        // Other defaults should be preserved
        assert_eq!(config.http_api.port, 3000);
        assert_eq!(config.managers.repository.user, "root");
    }

    #[test]
    fn resolves_with_password_and_enabled_chains() {
        let mut config = config_for("development").expect("defaults");
        config.managers.repository.password = Some("secret".to_string());
        let resolved = config.resolve().expect("resolves");
        let chain_ids: Vec<u64> = resolved
            .managers
            .chains
            .0
            .iter()
            .map(|chain| chain.chain_id().get())
            .collect();
        assert_eq!(chain_ids, vec![11_155_111, 31_337]);
    }

    #[test]
    fn missing_database_password_fails_resolution() {
        let config = config_for("testnet").expect("defaults");
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::MissingSecret(_))
        ));
    }

    #[test]
    fn unknown_environment_returns_error() {
        let error = config_for("staging").expect_err("unknown env should fail");
        assert!(matches!(error, ConfigError::UnknownEnvironment(env) if env == "staging"));
    }
}

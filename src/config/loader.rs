use std::{path::Path, sync::OnceLock};

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::Deserialize;
use tokenops_domain::AccountRole;

use super::{Config, ConfigRaw, defaults};
use crate::config::ConfigError;

static CONFIG_ENV: OnceLock<String> = OnceLock::new();

const DB_PASSWORD_ENV: &str = "DB_PASSWORD";

#[derive(Debug, Deserialize)]
struct EnvironmentConfig {
    environment: Option<String>,
}

/// Returns the currently selected environment.
/// This is set during configuration initialization.
pub(crate) fn current_env() -> String {
    CONFIG_ENV
        .get()
        .cloned()
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) fn initialize_configuration() -> Config {
    load_configuration().expect("Failed to load configuration")
}

fn load_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("tokenops-engine")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .get_matches();

    let custom_config_path = matches.get_one::<String>("config").map(String::as_str);
    let env = resolve_environment(custom_config_path)?;
    let _ = CONFIG_ENV.set(env.clone());

    tracing::info!("Loading configuration for environment: {}", env);

    // Layered sources, lowest priority first
    let mut figment = Figment::from(Serialized::defaults(defaults::config_for(&env)?));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if let Some(config_path) = custom_config_path {
        tracing::info!("Loading custom config file: {}", config_path);
        figment = figment.merge(Toml::file(config_path));
    }

    let mut config: ConfigRaw = figment.extract().map_err(Box::new)?;
    if config.environment != env {
        return Err(ConfigError::UnknownEnvironment(format!(
            "config environment '{}' does not match selected '{}'",
            config.environment, env
        )));
    }

    apply_secret_overrides(&mut config, |name| std::env::var(name).ok());

    tracing::info!("Configuration loaded successfully");

    config.resolve()
}

/// Injects secrets from the process environment (or `.env`) over file values.
///
/// Empty variables are ignored so an unset `A2=` in `.env` does not clear a
/// key configured in TOML.
fn apply_secret_overrides(config: &mut ConfigRaw, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(password) = lookup(DB_PASSWORD_ENV) {
        config.managers.repository.password = Some(password);
    }

    for role in AccountRole::ALL {
        if let Some(key) = lookup(role.env_var()) {
            config.accounts.set_key(role, key);
        }
    }
}

fn resolve_environment(custom_config_path: Option<&str>) -> Result<String, ConfigError> {
    let config_path = custom_config_path.unwrap_or("config.toml");

    if !Path::new(config_path).exists() {
        return Err(ConfigError::MissingConfig(config_path.to_string()));
    }

    let env = read_environment_from(config_path).ok_or_else(|| {
        ConfigError::MissingEnvironment(
            "set environment = \"development|testnet|mainnet\" in your config".to_string(),
        )
    })?;

    if !matches!(env.as_str(), "development" | "testnet" | "mainnet") {
        return Err(ConfigError::UnknownEnvironment(env));
    }

    Ok(env)
}

fn read_environment_from(path: &str) -> Option<String> {
    Figment::from(Toml::file(path))
        .extract::<EnvironmentConfig>()
        .ok()
        .and_then(|config| config.environment)
        .map(|env| env.trim().to_lowercase())
}

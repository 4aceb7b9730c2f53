use serde::{Deserialize, Serialize};
use tokenops_blockchain::{AccountsConfig, AccountsConfigRaw};

use crate::{
    application::OrchestratorConfig,
    config::ConfigError,
    controllers::http_api_controller::router::HttpApiConfig,
    logger::{LoggerConfig, TelemetryConfig},
    managers::{ManagersConfig, ManagersConfigRaw},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub managers: ManagersConfigRaw,
    #[serde(default)]
    pub accounts: AccountsConfigRaw,
    pub orchestrator: OrchestratorConfig,
    pub http_api: HttpApiConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub managers: ManagersConfig,
    pub accounts: AccountsConfig,
    pub orchestrator: OrchestratorConfig,
    pub http_api: HttpApiConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        self.orchestrator.validate()?;

        Ok(Config {
            managers: self.managers.resolve()?,
            accounts: self.accounts.resolve()?,
            orchestrator: self.orchestrator,
            http_api: self.http_api,
            logger: self.logger,
            telemetry: self.telemetry,
        })
    }
}

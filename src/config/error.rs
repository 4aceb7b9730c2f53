use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] Box<figment::Error>),

    #[error("Missing required secret: {0}")]
    MissingSecret(String),

    #[error("Missing required config file: {0}")]
    MissingConfig(String),

    #[error("Missing required environment setting: {0}")]
    MissingEnvironment(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<tokenops_repository::ConfigError> for ConfigError {
    fn from(err: tokenops_repository::ConfigError) -> Self {
        match err {
            tokenops_repository::ConfigError::MissingSecret(msg) => Self::MissingSecret(msg),
            tokenops_repository::ConfigError::InvalidConfig(msg) => Self::InvalidConfig(msg),
        }
    }
}

impl From<tokenops_blockchain::ConfigError> for ConfigError {
    fn from(err: tokenops_blockchain::ConfigError) -> Self {
        match err {
            tokenops_blockchain::ConfigError::MissingSecret(msg) => Self::MissingSecret(msg),
            tokenops_blockchain::ConfigError::InvalidConfig(msg) => Self::InvalidConfig(msg),
        }
    }
}

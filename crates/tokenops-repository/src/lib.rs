mod config;
mod config_error;
pub mod error;
mod manager;
mod migrations;
mod models;
mod observability;
mod repositories;
mod types;

pub use config::{RepositoryManagerConfig, RepositoryManagerConfigRaw};
pub use config_error::ConfigError;
pub use error::RepositoryError;
pub use manager::RepositoryManager;
pub use repositories::{
    deployment_repository::DeploymentRepository,
    token_contract_repository::TokenContractRepository,
    transaction_repository::TransactionRepository,
};
pub use types::{
    Completion, DeploymentRecord, NewDeployment, NewTokenContract, NewTransactionRecord,
    TableCounts, TokenContractRecord, TransactionRecord,
};

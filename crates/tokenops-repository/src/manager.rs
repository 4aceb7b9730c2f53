use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, TransactionTrait};
use sea_orm_migration::MigratorTrait;

pub use crate::config::RepositoryManagerConfig;
use crate::{
    error::RepositoryError,
    migrations::Migrator,
    repositories::{
        deployment_repository::DeploymentRepository,
        token_contract_repository::TokenContractRepository,
        transaction_repository::TransactionRepository,
    },
    types::TableCounts,
};

pub struct RepositoryManager {
    conn: Arc<DatabaseConnection>,
    token_contract_repository: TokenContractRepository,
    deployment_repository: DeploymentRepository,
    transaction_repository: TransactionRepository,
}

impl RepositoryManager {
    /// Connects to the configured database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - Database connection fails (e.g. database missing, bad credentials)
    /// - Migrations fail
    pub async fn connect(config: &RepositoryManagerConfig) -> Result<Self, RepositoryError> {
        let mut opt = ConnectOptions::new(config.connection_string());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(true)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        let conn = Database::connect(opt).await?;
        Self::from_connection(conn).await
    }

    /// Wraps an existing connection, applying pending migrations first.
    pub async fn from_connection(conn: DatabaseConnection) -> Result<Self, RepositoryError> {
        let conn = Arc::new(conn);
        Migrator::up(conn.as_ref(), None).await?;

        Ok(RepositoryManager {
            token_contract_repository: TokenContractRepository::new(Arc::clone(&conn)),
            deployment_repository: DeploymentRepository::new(Arc::clone(&conn)),
            transaction_repository: TransactionRepository::new(Arc::clone(&conn)),
            conn,
        })
    }

    pub fn token_contract_repository(&self) -> TokenContractRepository {
        self.token_contract_repository.clone()
    }

    pub fn deployment_repository(&self) -> DeploymentRepository {
        self.deployment_repository.clone()
    }

    pub fn transaction_repository(&self) -> TransactionRepository {
        self.transaction_repository.clone()
    }

    pub async fn table_counts(&self) -> Result<TableCounts, RepositoryError> {
        Ok(TableCounts {
            token_contracts: self.token_contract_repository.count().await?,
            deployments: self.deployment_repository.count().await?,
            transactions: self.transaction_repository.count().await?,
        })
    }

    /// Deletes every row, children first, in one database transaction.
    /// Returns the number of rows removed per table.
    pub async fn purge_all(&self) -> Result<TableCounts, RepositoryError> {
        let txn = self.conn.begin().await?;
        let transactions = TransactionRepository::delete_all(&txn).await?;
        let deployments = DeploymentRepository::delete_all(&txn).await?;
        let token_contracts = TokenContractRepository::delete_all(&txn).await?;
        txn.commit().await?;

        tracing::warn!(
            token_contracts,
            deployments,
            transactions,
            "Purged all repository data"
        );

        Ok(TableCounts {
            token_contracts,
            deployments,
            transactions,
        })
    }
}

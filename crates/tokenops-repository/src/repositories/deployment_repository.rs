use std::{str::FromStr, sync::Arc, time::Instant};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tokenops_domain::{ChainId, TransactionStatus};
use uuid::Uuid;

use crate::{
    error::{RepositoryError, Result},
    models::deployment::{ActiveModel, Column, Entity, Model},
    observability::observe,
    types::{DeploymentRecord, NewDeployment},
};

const REPOSITORY: &str = "deployment";

#[derive(Clone)]
pub struct DeploymentRepository {
    conn: Arc<DatabaseConnection>,
}

impl DeploymentRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Fails on a duplicate contract address (unique index).
    pub async fn create(&self, new: NewDeployment) -> Result<DeploymentRecord> {
        let started = Instant::now();
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let active_model = ActiveModel {
            id: ActiveValue::Set(id.clone()),
            contract_address: ActiveValue::Set(new.contract_address.clone()),
            chain_id: ActiveValue::Set(new.chain_id.get() as i64),
            deployer_address: ActiveValue::Set(new.deployer_address.clone()),
            token_contract_id: ActiveValue::Set(new.token_contract_id.clone()),
            decimals: ActiveValue::Set(i16::from(new.decimals)),
            transaction_hash: ActiveValue::Set(new.transaction_hash.clone()),
            initial_supply: ActiveValue::Set(new.initial_supply.clone()),
            gas_used: ActiveValue::Set(new.gas_used.clone()),
            status: ActiveValue::Set(new.status.as_str().to_string()),
            deployed_at: ActiveValue::Set(now),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let result = Entity::insert(active_model)
            .exec_without_returning(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "create", started, &result, |rows| *rows as usize);
        result?;

        Ok(DeploymentRecord {
            id,
            contract_address: new.contract_address,
            chain_id: new.chain_id,
            deployer_address: new.deployer_address,
            token_contract_id: new.token_contract_id,
            decimals: new.decimals,
            transaction_hash: new.transaction_hash,
            initial_supply: new.initial_supply,
            gas_used: new.gas_used,
            status: new.status,
            deployed_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<DeploymentRecord>> {
        let started = Instant::now();
        let result = Entity::find_by_id(id.to_string())
            .one(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "find_by_id", started, &result, |row| {
            usize::from(row.is_some())
        });

        result?.map(Self::to_record).transpose()
    }

    /// Exact match on the stored (checksummed) address.
    pub async fn find_by_address(&self, contract_address: &str) -> Result<Option<DeploymentRecord>> {
        let started = Instant::now();
        let result = Entity::find()
            .filter(Column::ContractAddress.eq(contract_address))
            .one(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "find_by_address", started, &result, |row| {
            usize::from(row.is_some())
        });

        result?.map(Self::to_record).transpose()
    }

    /// Newest first.
    pub async fn list_all(&self) -> Result<Vec<DeploymentRecord>> {
        let started = Instant::now();
        let result = Entity::find()
            .order_by_desc(Column::DeployedAt)
            .all(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "list_all", started, &result, Vec::len);

        result?.into_iter().map(Self::to_record).collect()
    }

    pub async fn count(&self) -> Result<u64> {
        let started = Instant::now();
        let result = Entity::find()
            .count(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "count", started, &result, |_| 1);
        result
    }

    pub(crate) async fn delete_all<C: ConnectionTrait>(conn: &C) -> Result<u64> {
        let result = Entity::delete_many().exec(conn).await?;
        Ok(result.rows_affected)
    }

    fn to_record(model: Model) -> Result<DeploymentRecord> {
        let status =
            TransactionStatus::from_str(&model.status).map_err(|e| RepositoryError::CorruptRow {
                id: model.id.clone(),
                field: "status",
                reason: e.to_string(),
            })?;
        let decimals = u8::try_from(model.decimals).map_err(|e| RepositoryError::CorruptRow {
            id: model.id.clone(),
            field: "decimals",
            reason: e.to_string(),
        })?;

        Ok(DeploymentRecord {
            id: model.id,
            contract_address: model.contract_address,
            chain_id: ChainId::new(model.chain_id as u64),
            deployer_address: model.deployer_address,
            token_contract_id: model.token_contract_id,
            decimals,
            transaction_hash: model.transaction_hash,
            initial_supply: model.initial_supply,
            gas_used: model.gas_used,
            status,
            deployed_at: model.deployed_at,
        })
    }
}

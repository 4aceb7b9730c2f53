use std::{sync::Arc, time::Instant};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
};
use uuid::Uuid;

use crate::{
    error::{RepositoryError, Result},
    models::token_contract::{ActiveModel, Column, Entity, Model},
    observability::observe,
    types::{NewTokenContract, TokenContractRecord},
};

const REPOSITORY: &str = "token_contract";

#[derive(Clone)]
pub struct TokenContractRepository {
    conn: Arc<DatabaseConnection>,
}

impl TokenContractRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewTokenContract) -> Result<TokenContractRecord> {
        let started = Instant::now();
        let now = Utc::now();
        let model = Model {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            symbol: new.symbol,
            decimals: i16::from(new.decimals),
            abi: new.abi.to_string(),
            bytecode: new.bytecode,
            created_at: now,
            updated_at: now,
        };

        let active_model = ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            name: ActiveValue::Set(model.name.clone()),
            symbol: ActiveValue::Set(model.symbol.clone()),
            decimals: ActiveValue::Set(model.decimals),
            abi: ActiveValue::Set(model.abi.clone()),
            bytecode: ActiveValue::Set(model.bytecode.clone()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let result = Entity::insert(active_model)
            .exec_without_returning(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "create", started, &result, |rows| *rows as usize);
        result?;

        Self::to_record(model)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<TokenContractRecord>> {
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

    /// Newest first.
    pub async fn list_all(&self) -> Result<Vec<TokenContractRecord>> {
        let started = Instant::now();
        let result = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "list_all", started, &result, Vec::len);

        result?.into_iter().map(Self::to_record).collect()
    }

    /// Deployments and their transactions go with it (FK cascade).
    /// Returns whether a row was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let started = Instant::now();
        let result = Entity::delete_by_id(id.to_string())
            .exec(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "delete", started, &result, |res| {
            res.rows_affected as usize
        });

        Ok(result?.rows_affected > 0)
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

    fn to_record(model: Model) -> Result<TokenContractRecord> {
        let abi = serde_json::from_str(&model.abi).map_err(|e| RepositoryError::CorruptRow {
            id: model.id.clone(),
            field: "abi",
            reason: e.to_string(),
        })?;
        let decimals = u8::try_from(model.decimals).map_err(|e| RepositoryError::CorruptRow {
            id: model.id.clone(),
            field: "decimals",
            reason: e.to_string(),
        })?;

        Ok(TokenContractRecord {
            id: model.id,
            name: model.name,
            symbol: model.symbol,
            decimals,
            abi,
            bytecode: model.bytecode,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

use std::{str::FromStr, sync::Arc, time::Instant};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};
use tokenops_domain::TransactionStatus;
use uuid::Uuid;

use crate::{
    error::{RepositoryError, Result},
    models::token_transaction::{ActiveModel, Column, Entity, Model},
    observability::observe,
    types::{Completion, NewTransactionRecord, TransactionRecord},
};

const REPOSITORY: &str = "token_transaction";

/// Ledger of attempted writes.
///
/// Rows are append-only apart from [`TransactionRepository::complete`], which
/// is the single path out of `pending`.
#[derive(Clone)]
pub struct TransactionRepository {
    conn: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewTransactionRecord) -> Result<TransactionRecord> {
        let started = Instant::now();
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let active_model = ActiveModel {
            id: ActiveValue::Set(id.clone()),
            deployment_id: ActiveValue::Set(new.deployment_id.clone()),
            transaction_hash: ActiveValue::Set(new.transaction_hash.clone()),
            function_name: ActiveValue::Set(new.function_name.clone()),
            parameters: ActiveValue::Set(new.parameters.to_string()),
            from_address: ActiveValue::Set(new.from_address.clone()),
            status: ActiveValue::Set(new.status.as_str().to_string()),
            gas_used: ActiveValue::Set(None),
            error_message: ActiveValue::Set(new.error_message.clone()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let result = Entity::insert(active_model)
            .exec_without_returning(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "create", started, &result, |rows| *rows as usize);
        result?;

        Ok(TransactionRecord {
            id,
            deployment_id: new.deployment_id,
            transaction_hash: new.transaction_hash,
            function_name: new.function_name,
            parameters: new.parameters,
            from_address: new.from_address,
            status: new.status,
            gas_used: None,
            error_message: new.error_message,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves a `pending` record to its terminal status.
    ///
    /// Returns `false` when the record was not pending (already completed,
    /// created as failed, or missing); the row is left untouched.
    pub async fn complete(&self, id: &str, completion: Completion) -> Result<bool> {
        if !completion.status.is_terminal() {
            return Err(RepositoryError::InvalidTransition(completion.status));
        }

        let started = Instant::now();
        let result = Entity::update_many()
            .col_expr(Column::Status, Expr::value(completion.status.as_str()))
            .col_expr(Column::GasUsed, Expr::value(completion.gas_used))
            .col_expr(Column::ErrorMessage, Expr::value(completion.error_message))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(TransactionStatus::Pending.as_str()))
            .exec(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "complete", started, &result, |res| {
            res.rows_affected as usize
        });

        Ok(result?.rows_affected == 1)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<TransactionRecord>> {
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
    pub async fn list_all(&self) -> Result<Vec<TransactionRecord>> {
        let started = Instant::now();
        let result = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "list_all", started, &result, Vec::len);

        result?.into_iter().map(Self::to_record).collect()
    }

    /// Newest first.
    pub async fn list_by_deployment(&self, deployment_id: &str) -> Result<Vec<TransactionRecord>> {
        let started = Instant::now();
        let result = Entity::find()
            .filter(Column::DeploymentId.eq(deployment_id))
            .order_by_desc(Column::CreatedAt)
            .all(self.conn.as_ref())
            .await
            .map_err(RepositoryError::from);
        observe(REPOSITORY, "list_by_deployment", started, &result, Vec::len);

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

    fn to_record(model: Model) -> Result<TransactionRecord> {
        let status =
            TransactionStatus::from_str(&model.status).map_err(|e| RepositoryError::CorruptRow {
                id: model.id.clone(),
                field: "status",
                reason: e.to_string(),
            })?;
        let parameters =
            serde_json::from_str(&model.parameters).map_err(|e| RepositoryError::CorruptRow {
                id: model.id.clone(),
                field: "parameters",
                reason: e.to_string(),
            })?;

        Ok(TransactionRecord {
            id: model.id,
            deployment_id: model.deployment_id,
            transaction_hash: model.transaction_hash,
            function_name: model.function_name,
            parameters,
            from_address: model.from_address,
            status,
            gas_used: model.gas_used,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

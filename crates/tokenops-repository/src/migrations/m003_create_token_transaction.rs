use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{
        DbErr, DeriveMigrationName, ForeignKey, ForeignKeyAction, Iden, Index, MigrationTrait,
        SchemaManager, Table,
    },
    schema::{string_len, string_len_null, text, text_null, timestamps},
    sea_query,
};

#[derive(Iden)]
enum Deployment {
    Table,
    Id,
}

#[derive(Iden)]
enum TokenTransaction {
    Table,
    Id,
    DeploymentId,
    TransactionHash,
    FunctionName,
    Parameters,
    FromAddress,
    Status,
    GasUsed,
    ErrorMessage,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(timestamps(
                Table::create()
                    .table(TokenTransaction::Table)
                    .if_not_exists()
                    .col(string_len(TokenTransaction::Id, 36))
                    .col(string_len(TokenTransaction::DeploymentId, 36))
                    .col(string_len(TokenTransaction::TransactionHash, 66))
                    .col(string_len(TokenTransaction::FunctionName, 100))
                    .col(text(TokenTransaction::Parameters))
                    .col(string_len(TokenTransaction::FromAddress, 42))
                    .col(string_len(TokenTransaction::Status, 16))
                    .col(string_len_null(TokenTransaction::GasUsed, 78))
                    .col(text_null(TokenTransaction::ErrorMessage))
                    .primary_key(Index::create().col(TokenTransaction::Id))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_token_transaction_deployment")
                            .from(TokenTransaction::Table, TokenTransaction::DeploymentId)
                            .to(Deployment::Table, Deployment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            ))
            .await?;

        // list_by_deployment() orders by created_at within one deployment
        manager
            .create_index(
                Index::create()
                    .name("idx_token_transaction_deployment_created")
                    .table(TokenTransaction::Table)
                    .col(TokenTransaction::DeploymentId)
                    .col(TokenTransaction::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_token_transaction_hash")
                    .table(TokenTransaction::Table)
                    .col(TokenTransaction::TransactionHash)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_token_transaction_status")
                    .table(TokenTransaction::Table)
                    .col(TokenTransaction::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TokenTransaction::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

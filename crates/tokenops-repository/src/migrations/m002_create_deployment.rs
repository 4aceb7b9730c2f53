use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{
        DbErr, DeriveMigrationName, ForeignKey, ForeignKeyAction, Iden, Index, MigrationTrait,
        SchemaManager, Table,
    },
    schema::{
        big_integer, small_integer, string_len, string_len_null, string_len_uniq, timestamp,
        timestamps,
    },
    sea_query,
};

#[derive(Iden)]
enum TokenContract {
    Table,
    Id,
}

#[derive(Iden)]
enum Deployment {
    Table,
    Id,
    ContractAddress,
    ChainId,
    DeployerAddress,
    TokenContractId,
    Decimals,
    TransactionHash,
    InitialSupply,
    GasUsed,
    Status,
    DeployedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(timestamps(
                Table::create()
                    .table(Deployment::Table)
                    .if_not_exists()
                    .col(string_len(Deployment::Id, 36))
                    .col(string_len_uniq(Deployment::ContractAddress, 42))
                    .col(big_integer(Deployment::ChainId))
                    .col(string_len(Deployment::DeployerAddress, 42))
                    .col(string_len(Deployment::TokenContractId, 36))
                    .col(small_integer(Deployment::Decimals))
                    .col(string_len(Deployment::TransactionHash, 66))
                    // uint256 max is 78 decimal digits
                    .col(string_len(Deployment::InitialSupply, 78))
                    .col(string_len_null(Deployment::GasUsed, 78))
                    .col(string_len(Deployment::Status, 16))
                    .col(timestamp(Deployment::DeployedAt))
                    .primary_key(Index::create().col(Deployment::Id))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deployment_token_contract")
                            .from(Deployment::Table, Deployment::TokenContractId)
                            .to(TokenContract::Table, TokenContract::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            ))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deployment_token_contract_id")
                    .table(Deployment::Table)
                    .col(Deployment::TokenContractId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deployment::Table).if_exists().to_owned())
            .await
    }
}

use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{small_integer, string_len, text, timestamps},
    sea_query,
};

#[derive(Iden)]
enum TokenContract {
    Table,
    Id,
    Name,
    Symbol,
    Decimals,
    Abi,
    Bytecode,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(timestamps(
                Table::create()
                    .table(TokenContract::Table)
                    .if_not_exists()
                    .col(string_len(TokenContract::Id, 36))
                    .col(string_len(TokenContract::Name, 255))
                    .col(string_len(TokenContract::Symbol, 32))
                    .col(small_integer(TokenContract::Decimals))
                    .col(text(TokenContract::Abi))
                    .col(text(TokenContract::Bytecode))
                    .primary_key(Index::create().col(TokenContract::Id))
                    .to_owned(),
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TokenContract::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

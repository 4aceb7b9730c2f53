use sea_orm_migration::{MigrationTrait, MigratorTrait, async_trait::async_trait};

mod m001_create_token_contract;
mod m002_create_deployment;
mod m003_create_token_transaction;

pub(crate) struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_token_contract::Migration),
            Box::new(m002_create_deployment::Migration),
            Box::new(m003_create_token_transaction::Migration),
        ]
    }
}

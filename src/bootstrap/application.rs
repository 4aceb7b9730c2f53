use std::sync::Arc;

use crate::{
    application::{
        DatabaseAdmin, DeployService, DeploymentCatalog, ReadExecutor, TemplateRegistry,
        TokenResolver, TransactionLedger, WriteOrchestrator, load_seed_templates,
    },
    config::Config,
    managers::Managers,
};

pub(crate) struct ApplicationDeps {
    pub(crate) templates: TemplateRegistry,
    pub(crate) deploy_service: Arc<DeployService>,
    pub(crate) deployment_catalog: Arc<DeploymentCatalog>,
    pub(crate) transaction_ledger: TransactionLedger,
    pub(crate) write_orchestrator: Arc<WriteOrchestrator>,
    pub(crate) read_executor: Arc<ReadExecutor>,
    pub(crate) database_admin: Arc<DatabaseAdmin>,
}

pub(crate) fn build_application(config: &Config, managers: &Managers) -> ApplicationDeps {
    let repository = &managers.repository;
    let orchestrator = &config.orchestrator;

    let resolver = TokenResolver::new(
        repository.deployment_repository(),
        repository.token_contract_repository(),
        Arc::clone(&managers.chains),
    );

    let seeds = load_seed_templates(&orchestrator.seed_templates)
        .expect("Failed to load seed contract templates");
    let templates = TemplateRegistry::new(repository.token_contract_repository());

    let deploy_service = Arc::new(DeployService::new(
        repository.token_contract_repository(),
        repository.deployment_repository(),
        Arc::clone(&managers.chains),
        Arc::clone(&managers.accounts),
        orchestrator,
    ));

    let deployment_catalog = Arc::new(DeploymentCatalog::new(
        repository.deployment_repository(),
        resolver.clone(),
    ));

    let write_orchestrator = Arc::new(WriteOrchestrator::new(
        resolver.clone(),
        Arc::clone(&managers.accounts),
        repository.transaction_repository(),
        orchestrator,
    ));

    let read_executor = Arc::new(ReadExecutor::new(resolver, orchestrator));

    let database_admin = Arc::new(DatabaseAdmin::new(
        Arc::clone(repository),
        templates.clone(),
        seeds,
    ));

    ApplicationDeps {
        templates,
        deploy_service,
        deployment_catalog,
        transaction_ledger: TransactionLedger::new(repository.transaction_repository()),
        write_orchestrator,
        read_executor,
        database_admin,
    }
}

use std::sync::Arc;

use axum::extract::FromRef;

use crate::application::{
    DatabaseAdmin, DeployService, DeploymentCatalog, ReadExecutor, TemplateRegistry,
    TransactionLedger, WriteOrchestrator,
};

#[derive(Clone)]
pub(crate) struct HttpApiDeps {
    pub(crate) templates: TemplateRegistry,
    pub(crate) deploy_service: Arc<DeployService>,
    pub(crate) deployment_catalog: Arc<DeploymentCatalog>,
    pub(crate) transaction_ledger: TransactionLedger,
    pub(crate) write_orchestrator: Arc<WriteOrchestrator>,
    pub(crate) read_executor: Arc<ReadExecutor>,
    pub(crate) database_admin: Arc<DatabaseAdmin>,
}

#[derive(Clone)]
pub(crate) struct ContractsHttpApiControllerDeps {
    pub(crate) templates: TemplateRegistry,
}

impl FromRef<HttpApiDeps> for ContractsHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            templates: input.templates.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct DeploymentsHttpApiControllerDeps {
    pub(crate) deploy_service: Arc<DeployService>,
    pub(crate) deployment_catalog: Arc<DeploymentCatalog>,
}

impl FromRef<HttpApiDeps> for DeploymentsHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            deploy_service: Arc::clone(&input.deploy_service),
            deployment_catalog: Arc::clone(&input.deployment_catalog),
        }
    }
}

#[derive(Clone)]
pub(crate) struct TransactionsHttpApiControllerDeps {
    pub(crate) transaction_ledger: TransactionLedger,
}

impl FromRef<HttpApiDeps> for TransactionsHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            transaction_ledger: input.transaction_ledger.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct TokensHttpApiControllerDeps {
    pub(crate) write_orchestrator: Arc<WriteOrchestrator>,
    pub(crate) read_executor: Arc<ReadExecutor>,
}

impl FromRef<HttpApiDeps> for TokensHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            write_orchestrator: Arc::clone(&input.write_orchestrator),
            read_executor: Arc::clone(&input.read_executor),
        }
    }
}

#[derive(Clone)]
pub(crate) struct DatabaseHttpApiControllerDeps {
    pub(crate) database_admin: Arc<DatabaseAdmin>,
}

impl FromRef<HttpApiDeps> for DatabaseHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            database_admin: Arc::clone(&input.database_admin),
        }
    }
}

use std::sync::Arc;

use super::ApplicationDeps;
use crate::{
    config::Config,
    controllers::{self, http_api_controller::HttpApiDeps},
};

pub(crate) fn build_controllers(
    config: &Config,
    application: &ApplicationDeps,
) -> controllers::Controllers {
    controllers::initialize(
        &config.http_api,
        HttpApiDeps {
            templates: application.templates.clone(),
            deploy_service: Arc::clone(&application.deploy_service),
            deployment_catalog: Arc::clone(&application.deployment_catalog),
            transaction_ledger: application.transaction_ledger.clone(),
            write_orchestrator: Arc::clone(&application.write_orchestrator),
            read_executor: Arc::clone(&application.read_executor),
            database_admin: Arc::clone(&application.database_admin),
        },
    )
}

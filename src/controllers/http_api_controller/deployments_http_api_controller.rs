use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use validator::Validate;

use super::{
    DeploymentsHttpApiControllerDeps,
    dto::deployments::DeployTokenRequest,
    response::{respond, validation_error},
};

pub(crate) struct DeploymentsHttpApiController;

impl DeploymentsHttpApiController {
    /// Blocks until the deployment receipt is in.
    pub(crate) async fn handle_deploy(
        State(deps): State<DeploymentsHttpApiControllerDeps>,
        Json(req): Json<DeployTokenRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        tracing::info!(
            token_contract_id = %req.token_contract_id,
            chain_id = req.chain_id,
            "Deploy request received"
        );
        respond(deps.deploy_service.deploy_token(req.into()).await)
    }

    pub(crate) async fn handle_list(
        State(deps): State<DeploymentsHttpApiControllerDeps>,
    ) -> Response {
        respond(deps.deployment_catalog.list().await)
    }

    pub(crate) async fn handle_list_with_details(
        State(deps): State<DeploymentsHttpApiControllerDeps>,
    ) -> Response {
        respond(deps.deployment_catalog.with_details().await)
    }

    pub(crate) async fn handle_get(
        State(deps): State<DeploymentsHttpApiControllerDeps>,
        Path(id): Path<String>,
    ) -> Response {
        respond(deps.deployment_catalog.get(&id).await)
    }

    pub(crate) async fn handle_get_by_address(
        State(deps): State<DeploymentsHttpApiControllerDeps>,
        Path(address): Path<String>,
    ) -> Response {
        respond(deps.deployment_catalog.by_address(&address).await)
    }
}

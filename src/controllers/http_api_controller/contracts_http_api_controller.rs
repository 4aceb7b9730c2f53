use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use validator::Validate;

use super::{
    ContractsHttpApiControllerDeps,
    dto::contracts::CreateContractRequest,
    response::{error_response, message, respond, validation_error},
};

pub(crate) struct ContractsHttpApiController;

impl ContractsHttpApiController {
    pub(crate) async fn handle_create(
        State(deps): State<ContractsHttpApiControllerDeps>,
        Json(req): Json<CreateContractRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        respond(deps.templates.create(req.into()).await)
    }

    pub(crate) async fn handle_list(State(deps): State<ContractsHttpApiControllerDeps>) -> Response {
        respond(deps.templates.list().await)
    }

    pub(crate) async fn handle_get(
        State(deps): State<ContractsHttpApiControllerDeps>,
        Path(id): Path<String>,
    ) -> Response {
        respond(deps.templates.get(&id).await)
    }

    pub(crate) async fn handle_delete(
        State(deps): State<ContractsHttpApiControllerDeps>,
        Path(id): Path<String>,
    ) -> Response {
        match deps.templates.delete(&id).await {
            Ok(()) => message("Token contract deleted successfully"),
            Err(e) => error_response(e),
        }
    }
}

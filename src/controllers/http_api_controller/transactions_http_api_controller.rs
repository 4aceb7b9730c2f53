use axum::{
    extract::{Path, State},
    response::Response,
};

use super::{TransactionsHttpApiControllerDeps, response::respond};

pub(crate) struct TransactionsHttpApiController;

impl TransactionsHttpApiController {
    pub(crate) async fn handle_list(
        State(deps): State<TransactionsHttpApiControllerDeps>,
    ) -> Response {
        respond(deps.transaction_ledger.list().await)
    }

    pub(crate) async fn handle_list_by_deployment(
        State(deps): State<TransactionsHttpApiControllerDeps>,
        Path(deployment_id): Path<String>,
    ) -> Response {
        respond(deps.transaction_ledger.by_deployment(&deployment_id).await)
    }
}

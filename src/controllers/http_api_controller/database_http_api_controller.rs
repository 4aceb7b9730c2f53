use axum::{
    Json,
    extract::State,
    response::Response,
};

use super::{
    DatabaseHttpApiControllerDeps,
    dto::database::{
        CLEARED_TABLES, ClearResponse, ConfirmationRequest, ResetResponse, StatsResponse,
    },
    response::{error_response, ok},
};

pub(crate) struct DatabaseHttpApiController;

impl DatabaseHttpApiController {
    pub(crate) async fn handle_stats(State(deps): State<DatabaseHttpApiControllerDeps>) -> Response {
        match deps.database_admin.stats().await {
            Ok(counts) => ok(StatsResponse::from(counts)),
            Err(e) => error_response(e),
        }
    }

    pub(crate) async fn handle_clear(
        State(deps): State<DatabaseHttpApiControllerDeps>,
        Json(req): Json<ConfirmationRequest>,
    ) -> Response {
        match deps.database_admin.clear(&req.confirmation).await {
            Ok(deleted) => ok(ClearResponse {
                message: "All tables cleared successfully",
                cleared_tables: CLEARED_TABLES,
                deleted: deleted.into(),
            }),
            Err(e) => error_response(e),
        }
    }

    pub(crate) async fn handle_reset(
        State(deps): State<DatabaseHttpApiControllerDeps>,
        Json(req): Json<ConfirmationRequest>,
    ) -> Response {
        match deps.database_admin.reset(&req.confirmation).await {
            Ok(outcome) => ok(ResetResponse {
                message: if outcome.seeded > 0 {
                    "Database reset and reseeded successfully"
                } else {
                    "Database reset successfully (no seed data available)"
                },
                deleted: outcome.deleted.into(),
                seeded_templates: outcome.seeded,
            }),
            Err(e) => error_response(e),
        }
    }
}

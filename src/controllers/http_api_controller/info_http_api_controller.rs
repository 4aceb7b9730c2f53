use axum::Json;

use super::dto::info::InfoResponse;

const ENDPOINTS: &[&str] = &[
    "POST /contracts",
    "GET /contracts",
    "GET /contracts/{id}",
    "DELETE /contracts/{id}",
    "POST /deployments",
    "GET /deployments",
    "GET /deployments/with-details",
    "GET /deployments/{id}",
    "GET /deployments/by-address/{address}",
    "GET /transactions",
    "GET /transactions/by-deployment/{deploymentId}",
    "POST /tokens/{address}/{transfer|approve|transfer-from|mint|burn}",
    "POST /tokens/{address}/{add-to-allowlist|remove-from-allowlist|pause|unpause}",
    "GET /tokens/{address}/{balance-of/{account}|allowance/{owner}/{spender}}",
    "GET /tokens/{address}/{is-allowlisted/{account}|allowlist-length|allowlist-address/{index}}",
    "GET /tokens/{address}/{total-supply|name|symbol|decimals|paused|owner|balance-holders}",
    "GET /database/stats",
    "DELETE /database/clear",
    "POST /database/reset",
];

pub(crate) struct InfoHttpApiController;

impl InfoHttpApiController {
    pub(crate) async fn handle_request() -> Json<InfoResponse> {
        Json(InfoResponse::new(env!("CARGO_PKG_VERSION"), ENDPOINTS))
    }
}

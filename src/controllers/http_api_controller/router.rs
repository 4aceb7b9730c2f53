use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::{
    HttpApiDeps, contracts_http_api_controller::ContractsHttpApiController,
    database_http_api_controller::DatabaseHttpApiController,
    deployments_http_api_controller::DeploymentsHttpApiController,
    info_http_api_controller::InfoHttpApiController,
    tokens_http_api_controller::TokensHttpApiController,
    transactions_http_api_controller::TransactionsHttpApiController,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HttpApiConfig {
    /// Whether the HTTP API server is enabled.
    pub enabled: bool,
    pub host: IpAddr,
    pub port: u16,
}

pub(crate) struct HttpApiRouter {
    config: HttpApiConfig,
    router: Arc<Mutex<Router>>,
}

/// Maximum request body size in bytes (10 MB); ABI uploads can be large.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

fn routes(deps: HttpApiDeps) -> Router {
    let tokens = Router::new()
        .route("/transfer", post(TokensHttpApiController::handle_transfer))
        .route("/approve", post(TokensHttpApiController::handle_approve))
        .route(
            "/transfer-from",
            post(TokensHttpApiController::handle_transfer_from),
        )
        .route("/mint", post(TokensHttpApiController::handle_mint))
        .route("/burn", post(TokensHttpApiController::handle_burn))
        .route(
            "/add-to-allowlist",
            post(TokensHttpApiController::handle_add_to_allowlist),
        )
        .route(
            "/remove-from-allowlist",
            post(TokensHttpApiController::handle_remove_from_allowlist),
        )
        .route("/pause", post(TokensHttpApiController::handle_pause))
        .route("/unpause", post(TokensHttpApiController::handle_unpause))
        .route(
            "/balance-of/{account}",
            get(TokensHttpApiController::handle_balance_of),
        )
        .route(
            "/allowance/{owner}/{spender}",
            get(TokensHttpApiController::handle_allowance),
        )
        .route(
            "/is-allowlisted/{account}",
            get(TokensHttpApiController::handle_is_allowlisted),
        )
        .route(
            "/allowlist-length",
            get(TokensHttpApiController::handle_allowlist_length),
        )
        .route(
            "/allowlist-address/{index}",
            get(TokensHttpApiController::handle_allowlist_address),
        )
        .route(
            "/total-supply",
            get(TokensHttpApiController::handle_total_supply),
        )
        .route("/name", get(TokensHttpApiController::handle_name))
        .route("/symbol", get(TokensHttpApiController::handle_symbol))
        .route("/decimals", get(TokensHttpApiController::handle_decimals))
        .route("/paused", get(TokensHttpApiController::handle_paused))
        .route("/owner", get(TokensHttpApiController::handle_owner))
        .route(
            "/balance-holders",
            get(TokensHttpApiController::handle_balance_holders),
        );

    Router::new()
        .route("/", get(InfoHttpApiController::handle_request))
        .route(
            "/contracts",
            post(ContractsHttpApiController::handle_create)
                .get(ContractsHttpApiController::handle_list),
        )
        .route(
            "/contracts/{id}",
            get(ContractsHttpApiController::handle_get)
                .delete(ContractsHttpApiController::handle_delete),
        )
        .route(
            "/deployments",
            post(DeploymentsHttpApiController::handle_deploy)
                .get(DeploymentsHttpApiController::handle_list),
        )
        .route(
            "/deployments/with-details",
            get(DeploymentsHttpApiController::handle_list_with_details),
        )
        .route(
            "/deployments/by-address/{address}",
            get(DeploymentsHttpApiController::handle_get_by_address),
        )
        .route(
            "/deployments/{id}",
            get(DeploymentsHttpApiController::handle_get),
        )
        .route(
            "/transactions",
            get(TransactionsHttpApiController::handle_list),
        )
        .route(
            "/transactions/by-deployment/{deployment_id}",
            get(TransactionsHttpApiController::handle_list_by_deployment),
        )
        .nest("/tokens/{address}", tokens)
        .route(
            "/database/stats",
            get(DatabaseHttpApiController::handle_stats),
        )
        .route(
            "/database/clear",
            delete(DatabaseHttpApiController::handle_clear),
        )
        .route(
            "/database/reset",
            post(DatabaseHttpApiController::handle_reset),
        )
        .with_state(deps)
}

impl HttpApiRouter {
    pub(crate) fn new(config: &HttpApiConfig, deps: HttpApiDeps) -> Self {
        let mut router = routes(deps);

        // Layer order (bottom-to-top, last added runs first):
        // 1. Body size limit
        // 2. Request tracing
        // 3. CORS (outermost)
        router = router.layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE));
        tracing::info!("Request body limit: {} MB", MAX_BODY_SIZE / (1024 * 1024));

        router = router.layer(TraceLayer::new_for_http());
        router = router.layer(CorsLayer::permissive());

        HttpApiRouter {
            config: config.to_owned(),
            router: Arc::new(Mutex::new(router)),
        }
    }

    pub(crate) async fn listen_and_handle_http_requests(&self, shutdown_rx: oneshot::Receiver<()>) {
        let addr = SocketAddr::from((self.config.host, self.config.port));

        let cloned_router_for_serve = self.router.lock().await.clone();

        let listener = TcpListener::bind(addr)
            .await
            .expect("Failed to bind HTTP listener");
        tracing::info!(%addr, "HTTP API listening");

        axum::serve(listener, cloned_router_for_serve.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .expect("Server failed");
    }
}

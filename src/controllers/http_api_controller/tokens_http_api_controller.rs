//! ERC20 operations on a deployed token, addressed by contract address.
//!
//! Writes answer as soon as the node accepts the transaction; the ledger
//! row they return starts out `pending`.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use tokenops_blockchain::{Address, U256};
use tokenops_domain::{AccountRole, CallArg};
use validator::Validate;

use super::{
    TokensHttpApiControllerDeps,
    dto::tokens::{
        AllowlistRequest, ApproveRequest, BurnRequest, MintRequest, ReadResponse, RpcQuery,
        SignerRequest, TransferFromRequest, TransferRequest, WriteResponse, parse_address,
    },
    response::{error_response, ok, respond, validation_error},
    validators::validate_address,
};
use crate::application::{OrchestratorError, ReadRequest, WriteRequest};

/// Path segments are not covered by DTO validation.
fn path_address(field: &str, value: &str) -> Result<Address, OrchestratorError> {
    validate_address(value)
        .map_err(|_| OrchestratorError::InvalidCall(format!("{field} must be a valid address")))?;
    parse_address(field, value)
}

pub(crate) struct TokensHttpApiController;

impl TokensHttpApiController {
    async fn write(
        deps: &TokensHttpApiControllerDeps,
        contract_address: String,
        rpc_url: Option<String>,
        account: AccountRole,
        function: &str,
        args: Result<Vec<CallArg>, OrchestratorError>,
    ) -> Response {
        let args = match args {
            Ok(args) => args,
            Err(e) => return error_response(e),
        };
        tracing::info!(
            contract_address = %contract_address,
            account = %account,
            function,
            "Write request received"
        );
        let request = WriteRequest {
            contract_address,
            rpc_url,
            account,
            function: function.to_string(),
            args,
        };
        match deps.write_orchestrator.execute_write(request).await {
            Ok(outcome) => ok(WriteResponse::from(outcome)),
            Err(e) => error_response(e),
        }
    }

    async fn read(
        deps: &TokensHttpApiControllerDeps,
        contract_address: String,
        query: RpcQuery,
        function: &str,
        args: Result<Vec<CallArg>, OrchestratorError>,
    ) -> Response {
        if let Err(e) = query.validate() {
            return validation_error(&e);
        }
        let args = match args {
            Ok(args) => args,
            Err(e) => return error_response(e),
        };
        let request = ReadRequest {
            contract_address,
            rpc_url: query.rpc_url,
            function: function.to_string(),
            args,
        };
        respond(
            deps.read_executor
                .execute_read(request)
                .await
                .map(|result| ReadResponse { result }),
        )
    }

    pub(crate) async fn handle_transfer(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<TransferRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        let args = req.call_args();
        Self::write(&deps, address, req.rpc_url, req.account, "transfer", args).await
    }

    pub(crate) async fn handle_approve(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<ApproveRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        let args = req.call_args();
        Self::write(&deps, address, req.rpc_url, req.account, "approve", args).await
    }

    pub(crate) async fn handle_transfer_from(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<TransferFromRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        let args = req.call_args();
        Self::write(
            &deps,
            address,
            req.rpc_url,
            req.account,
            "transferFrom",
            args,
        )
        .await
    }

    pub(crate) async fn handle_mint(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<MintRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        let args = req.call_args();
        Self::write(&deps, address, req.rpc_url, req.account, "mint", args).await
    }

    pub(crate) async fn handle_burn(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<BurnRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        let args = req.call_args();
        Self::write(&deps, address, req.rpc_url, req.account, "burn", args).await
    }

    pub(crate) async fn handle_add_to_allowlist(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<AllowlistRequest>,
    ) -> Response {
        Self::allowlist(deps, address, req, "addToAllowlist").await
    }

    pub(crate) async fn handle_remove_from_allowlist(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<AllowlistRequest>,
    ) -> Response {
        Self::allowlist(deps, address, req, "removeFromAllowlist").await
    }

    async fn allowlist(
        deps: TokensHttpApiControllerDeps,
        address: String,
        req: AllowlistRequest,
        function: &str,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        let args = req.call_args();
        Self::write(&deps, address, req.rpc_url, req.signer, function, args).await
    }

    pub(crate) async fn handle_pause(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<SignerRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        Self::write(&deps, address, req.rpc_url, req.account, "pause", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_unpause(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Json(req): Json<SignerRequest>,
    ) -> Response {
        if let Err(e) = req.validate() {
            return validation_error(&e);
        }
        Self::write(&deps, address, req.rpc_url, req.account, "unpause", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_balance_of(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path((address, account)): Path<(String, String)>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        let args = path_address("account", &account).map(|a| vec![CallArg::Address(a)]);
        Self::read(&deps, address, query, "balanceOf", args).await
    }

    pub(crate) async fn handle_allowance(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path((address, owner, spender)): Path<(String, String, String)>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        let args = path_address("owner", &owner).and_then(|owner| {
            Ok(vec![
                CallArg::Address(owner),
                CallArg::Address(path_address("spender", &spender)?),
            ])
        });
        Self::read(&deps, address, query, "allowance", args).await
    }

    pub(crate) async fn handle_is_allowlisted(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path((address, account)): Path<(String, String)>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        let args = path_address("account", &account).map(|a| vec![CallArg::Address(a)]);
        Self::read(&deps, address, query, "isAllowlisted", args).await
    }

    pub(crate) async fn handle_allowlist_length(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "getAllowlistLength", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_allowlist_address(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path((address, index)): Path<(String, String)>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        let args = U256::from_str_radix(&index, 10)
            .map(|index| vec![CallArg::Uint(index)])
            .map_err(|_| {
                OrchestratorError::InvalidCall("index must be a non-negative integer".to_string())
            });
        Self::read(&deps, address, query, "getAllowlistAddress", args).await
    }

    pub(crate) async fn handle_total_supply(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "totalSupply", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_name(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "name", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_symbol(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "symbol", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_decimals(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "decimals", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_paused(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "paused", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_owner(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        Self::read(&deps, address, query, "owner", Ok(Vec::new())).await
    }

    pub(crate) async fn handle_balance_holders(
        State(deps): State<TokensHttpApiControllerDeps>,
        Path(address): Path<String>,
        Query(query): Query<RpcQuery>,
    ) -> Response {
        if let Err(e) = query.validate() {
            return validation_error(&e);
        }
        respond(
            deps.read_executor
                .balance_holders(&address, query.rpc_url.as_deref())
                .await,
        )
    }
}

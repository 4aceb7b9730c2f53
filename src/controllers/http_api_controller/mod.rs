mod contracts_http_api_controller;
mod database_http_api_controller;
pub(crate) mod deps;
mod deployments_http_api_controller;
mod dto;
mod info_http_api_controller;
mod response;
pub(crate) mod router;
mod tokens_http_api_controller;
mod transactions_http_api_controller;
pub(crate) mod validators;

pub(crate) use deps::{
    ContractsHttpApiControllerDeps, DatabaseHttpApiControllerDeps,
    DeploymentsHttpApiControllerDeps, HttpApiDeps, TokensHttpApiControllerDeps,
    TransactionsHttpApiControllerDeps,
};

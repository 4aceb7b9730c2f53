use serde::Deserialize;
use tokenops_domain::ChainId;
use validator::Validate;

use crate::{
    application::DeployRequest,
    controllers::http_api_controller::validators::{validate_integer_string, validate_rpc_url},
};

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeployTokenRequest {
    #[validate(length(min = 1, message = "tokenContractId cannot be empty"))]
    pub token_contract_id: String,
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "symbol must be 1-50 characters"))]
    pub symbol: String,
    pub decimals: u8,
    /// Base units.
    #[validate(custom(function = "validate_integer_string"))]
    pub initial_supply: String,
    pub chain_id: u64,
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
}

impl From<DeployTokenRequest> for DeployRequest {
    fn from(req: DeployTokenRequest) -> Self {
        DeployRequest {
            token_contract_id: req.token_contract_id,
            name: req.name,
            symbol: req.symbol,
            decimals: req.decimals,
            initial_supply: req.initial_supply,
            chain_id: ChainId::new(req.chain_id),
            rpc_url: req.rpc_url,
        }
    }
}

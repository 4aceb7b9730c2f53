use serde::Deserialize;
use serde_json::Value;
use tokenops_repository::NewTokenContract;
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateContractRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "symbol must be 1-50 characters"))]
    pub symbol: String,
    pub decimals: u8,
    /// Bare ABI array or a compiler artifact carrying one.
    pub abi: Value,
    #[validate(length(min = 1, message = "bytecode cannot be empty"))]
    pub bytecode: String,
}

impl From<CreateContractRequest> for NewTokenContract {
    fn from(req: CreateContractRequest) -> Self {
        NewTokenContract {
            name: req.name,
            symbol: req.symbol,
            decimals: req.decimals,
            abi: req.abi,
            bytecode: req.bytecode,
        }
    }
}

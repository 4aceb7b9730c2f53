use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokenops_blockchain::Address;
use tokenops_domain::{AccountRole, CallArg, TokenAmount, parse_amount};
use tokenops_repository::TransactionRecord;
use validator::Validate;

use crate::{
    application::{OrchestratorError, WriteOutcome},
    controllers::http_api_controller::validators::{
        validate_address, validate_decimal_string, validate_rpc_url,
    },
};

/// How an amount string is interpreted.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AmountUnit {
    /// Smallest token unit, integer only.
    #[default]
    Base,
    /// Whole tokens, scaled by the deployment's decimals.
    Whole,
}

impl AmountUnit {
    pub(crate) fn amount(self, value: &str) -> Result<TokenAmount, OrchestratorError> {
        match self {
            AmountUnit::Base => parse_amount(value)
                .map(TokenAmount::Base)
                .map_err(|e| OrchestratorError::InvalidCall(e.to_string())),
            AmountUnit::Whole => Ok(TokenAmount::Whole(value.to_string())),
        }
    }
}

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, OrchestratorError> {
    Address::from_str(value.trim())
        .map_err(|_| OrchestratorError::InvalidCall(format!("{field} must be a valid address")))
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub account: AccountRole,
    #[validate(custom(function = "validate_address"))]
    pub to: String,
    #[validate(custom(function = "validate_decimal_string"))]
    pub value: String,
    #[serde(default)]
    pub unit: AmountUnit,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApproveRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub account: AccountRole,
    #[validate(custom(function = "validate_address"))]
    pub spender: String,
    #[validate(custom(function = "validate_decimal_string"))]
    pub value: String,
    #[serde(default)]
    pub unit: AmountUnit,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferFromRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub account: AccountRole,
    #[validate(custom(function = "validate_address"))]
    pub from: String,
    #[validate(custom(function = "validate_address"))]
    pub to: String,
    #[validate(custom(function = "validate_decimal_string"))]
    pub value: String,
    #[serde(default)]
    pub unit: AmountUnit,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MintRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub account: AccountRole,
    #[validate(custom(function = "validate_address"))]
    pub to: String,
    #[validate(custom(function = "validate_decimal_string"))]
    pub amount: String,
    #[serde(default)]
    pub unit: AmountUnit,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BurnRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub account: AccountRole,
    #[validate(custom(function = "validate_decimal_string"))]
    pub amount: String,
    #[serde(default)]
    pub unit: AmountUnit,
}

/// `signer` sends the transaction; `account` is the address being
/// added or removed.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AllowlistRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub signer: AccountRole,
    #[validate(custom(function = "validate_address"))]
    pub account: String,
}

/// Body of argument-less writes (`pause`, `unpause`).
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignerRequest {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
    pub account: AccountRole,
}

impl TransferRequest {
    pub(crate) fn call_args(&self) -> Result<Vec<CallArg>, OrchestratorError> {
        Ok(vec![
            CallArg::Address(parse_address("to", &self.to)?),
            CallArg::Amount(self.unit.amount(&self.value)?),
        ])
    }
}

impl ApproveRequest {
    pub(crate) fn call_args(&self) -> Result<Vec<CallArg>, OrchestratorError> {
        Ok(vec![
            CallArg::Address(parse_address("spender", &self.spender)?),
            CallArg::Amount(self.unit.amount(&self.value)?),
        ])
    }
}

impl TransferFromRequest {
    pub(crate) fn call_args(&self) -> Result<Vec<CallArg>, OrchestratorError> {
        Ok(vec![
            CallArg::Address(parse_address("from", &self.from)?),
            CallArg::Address(parse_address("to", &self.to)?),
            CallArg::Amount(self.unit.amount(&self.value)?),
        ])
    }
}

impl MintRequest {
    pub(crate) fn call_args(&self) -> Result<Vec<CallArg>, OrchestratorError> {
        Ok(vec![
            CallArg::Address(parse_address("to", &self.to)?),
            CallArg::Amount(self.unit.amount(&self.amount)?),
        ])
    }
}

impl BurnRequest {
    pub(crate) fn call_args(&self) -> Result<Vec<CallArg>, OrchestratorError> {
        Ok(vec![CallArg::Amount(self.unit.amount(&self.amount)?)])
    }
}

impl AllowlistRequest {
    pub(crate) fn call_args(&self) -> Result<Vec<CallArg>, OrchestratorError> {
        Ok(vec![CallArg::Address(parse_address("account", &self.account)?)])
    }
}

#[derive(Deserialize, Debug, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcQuery {
    #[validate(custom(function = "validate_rpc_url"))]
    pub rpc_url: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WriteResponse {
    pub transaction: TransactionRecord,
    pub transaction_hash: String,
}

impl From<WriteOutcome> for WriteResponse {
    fn from(outcome: WriteOutcome) -> Self {
        Self {
            transaction: outcome.record,
            transaction_hash: outcome.transaction_hash.to_string(),
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct ReadResponse {
    pub result: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokenops_blockchain::U256;

    use super::*;

    #[test]
    fn unit_defaults_to_base() {
        let req: MintRequest = serde_json::from_value(json!({
            "account": "DEPLOYER",
            "to": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "amount": "1000"
        }))
        .expect("deserializes");
        assert_eq!(req.unit, AmountUnit::Base);
        assert_eq!(req.rpc_url, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn base_amounts_must_be_integers() {
        assert_eq!(
            AmountUnit::Base.amount("1000").expect("integer"),
            TokenAmount::Base(U256::from(1000u64))
        );
        assert!(matches!(
            AmountUnit::Base.amount("1.5"),
            Err(OrchestratorError::InvalidCall(_))
        ));
        assert_eq!(
            AmountUnit::Whole.amount("1.5").expect("whole"),
            TokenAmount::Whole("1.5".to_string())
        );
    }

    #[test]
    fn transfer_from_args_follow_the_abi_order() {
        let req: TransferFromRequest = serde_json::from_value(json!({
            "account": "A2",
            "from": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "to": "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
            "value": "2.5",
            "unit": "whole"
        }))
        .expect("deserializes");
        let args = req.call_args().expect("valid args");
        assert_eq!(args.len(), 3);
        assert!(matches!(args[0], CallArg::Address(a) if a.to_checksum(None) == "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        assert_eq!(args[2], CallArg::Amount(TokenAmount::Whole("2.5".to_string())));
    }

    #[test]
    fn rejects_unknown_account_and_bad_address() {
        let unknown: Result<SignerRequest, _> =
            serde_json::from_value(json!({"account": "A9"}));
        assert!(unknown.is_err());

        let req: TransferRequest = serde_json::from_value(json!({
            "rpcUrl": "http://127.0.0.1:8545",
            "account": "A1",
            "to": "0x1234",
            "value": "10"
        }))
        .expect("deserializes");
        let errors = req.validate().expect_err("short address");
        assert!(errors.field_errors().contains_key("to"));
    }
}

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};

use crate::{AmountError, parse_token_amount};

/// Token quantity as supplied by an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAmount {
    /// Already expressed in the token's smallest unit.
    Base(U256),
    /// Whole-token decimal string, scaled by the token's decimals before encoding.
    Whole(String),
}

impl TokenAmount {
    pub fn resolve(&self, decimals: u8) -> Result<U256, AmountError> {
        match self {
            Self::Base(value) => Ok(*value),
            Self::Whole(text) => parse_token_amount(text, decimals),
        }
    }
}

/// Single positional argument of a contract call, before ABI encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Address(Address),
    Uint(U256),
    Amount(TokenAmount),
    Bool(bool),
    Text(String),
}

impl CallArg {
    /// Convert to a dynamic ABI value; amounts are scaled with `decimals`.
    ///
    /// Integers are produced as `uint256`; the encoder narrows them to the
    /// declared parameter width.
    pub fn into_sol_value(self, decimals: u8) -> Result<DynSolValue, AmountError> {
        Ok(match self {
            Self::Address(address) => DynSolValue::Address(address),
            Self::Uint(value) => DynSolValue::Uint(value, 256),
            Self::Amount(amount) => DynSolValue::Uint(amount.resolve(decimals)?, 256),
            Self::Bool(flag) => DynSolValue::Bool(flag),
            Self::Text(text) => DynSolValue::String(text),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn whole_amount_argument_is_scaled() {
        let arg = CallArg::Amount(TokenAmount::Whole("500".to_string()));
        let value = arg.into_sol_value(18).unwrap();
        assert_eq!(
            value,
            DynSolValue::Uint(U256::from(500u64) * U256::from(10u64).pow(U256::from(18u64)), 256)
        );
    }

    #[test]
    fn base_amount_argument_is_untouched() {
        let arg = CallArg::Amount(TokenAmount::Base(U256::from(7u64)));
        assert_eq!(
            arg.into_sol_value(18).unwrap(),
            DynSolValue::Uint(U256::from(7u64), 256)
        );
    }
}

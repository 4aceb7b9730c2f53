//! Decimal-string codec for 256-bit token amounts.
//!
//! Amounts never pass through floating point or native integers; they cross
//! every storage and wire boundary as base-10 strings.

use alloy::primitives::{U256, utils::parse_units};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("'{0}' is not a non-negative decimal integer")]
    InvalidInteger(String),

    #[error("'{value}' is not a valid amount for a token with {decimals} decimals: {reason}")]
    InvalidTokenAmount {
        value: String,
        decimals: u8,
        reason: String,
    },
}

/// Parse a base-unit amount ("1000000000000000000") into a `U256`.
pub fn parse_amount(value: &str) -> Result<U256, AmountError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidInteger(value.to_string()));
    }

    U256::from_str_radix(trimmed, 10).map_err(|_| AmountError::InvalidInteger(value.to_string()))
}

pub fn format_amount(value: U256) -> String {
    value.to_string()
}

/// Scale a whole-token amount ("500", "1.25") by the token's decimals.
pub fn parse_token_amount(value: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = value.trim();
    let invalid = |reason: String| AmountError::InvalidTokenAmount {
        value: value.to_string(),
        decimals,
        reason,
    };

    if trimmed.is_empty() || trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(invalid("expected an unsigned decimal number".to_string()));
    }

    parse_units(trimmed, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| invalid(e.to_string()))
}

//! Custom validation functions for HTTP API DTOs.
//!
//! These validators are used with the `validator` crate's `#[validate(custom)]` attribute.

use std::str::FromStr;

use tokenops_blockchain::Address;
use validator::ValidationError;

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validates a 0x-prefixed 20-byte hex address, in any letter case.
pub(crate) fn validate_address(address: &str) -> Result<(), ValidationError> {
    let trimmed = address.trim();
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return Err(invalid(
            "address_format",
            format!("'{}' is not a 0x-prefixed 40 hex character address", address),
        ));
    }
    Address::from_str(trimmed)
        .map(|_| ())
        .map_err(|e| invalid("address_format", format!("invalid address: {}", e)))
}

/// Validates a non-negative integer in base 10 (`"1000000"`).
pub(crate) fn validate_integer_string(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(
            "integer_format",
            "must be a valid numeric string".to_string(),
        ));
    }
    Ok(())
}

/// Validates a non-negative decimal (`"1.25"`); used for whole-token amounts.
pub(crate) fn validate_decimal_string(value: &str) -> Result<(), ValidationError> {
    let mut parts = value.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let valid = !whole.is_empty()
        && digits(whole)
        && fraction.is_none_or(|fraction| !fraction.is_empty() && digits(fraction));
    if valid {
        Ok(())
    } else {
        Err(invalid(
            "decimal_format",
            "must be a valid decimal string".to_string(),
        ))
    }
}

/// Validates an optional RPC endpoint: present means non-blank http(s) URL.
/// Note: validator crate passes inner value for Option<T>, so we receive &String not
/// &Option<String>
pub(crate) fn validate_rpc_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(invalid("rpc_url_empty", "rpcUrl cannot be empty".to_string()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(invalid(
            "rpc_url_scheme",
            "rpcUrl must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address_any_case() {
        assert!(validate_address("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").is_ok());
        assert!(validate_address("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").is_ok());
    }

    #[test]
    fn test_validate_address_invalid() {
        assert!(validate_address("").is_err());
        assert!(validate_address("70997970C51812dc3A010C7d01b50e0d17dc79C8").is_err());
        assert!(validate_address("0x1234").is_err());
        assert!(validate_address("0xZZ997970C51812dc3A010C7d01b50e0d17dc79C8").is_err());
    }

    #[test]
    fn test_validate_integer_string() {
        assert!(validate_integer_string("0").is_ok());
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert!(validate_integer_string(max).is_ok());
        assert!(validate_integer_string("").is_err());
        assert!(validate_integer_string("-1").is_err());
        assert!(validate_integer_string("1.5").is_err());
        assert!(validate_integer_string("1e18").is_err());
    }

    #[test]
    fn test_validate_decimal_string() {
        assert!(validate_decimal_string("500").is_ok());
        assert!(validate_decimal_string("1.25").is_ok());
        assert!(validate_decimal_string("0.000001").is_ok());
        assert!(validate_decimal_string(".5").is_err());
        assert!(validate_decimal_string("5.").is_err());
        assert!(validate_decimal_string("1.2.3").is_err());
        assert!(validate_decimal_string("abc").is_err());
    }

    #[test]
    fn test_validate_rpc_url() {
        assert!(validate_rpc_url("http://127.0.0.1:8545").is_ok());
        assert!(validate_rpc_url("https://rpc.sepolia.org").is_ok());
        assert!(validate_rpc_url("   ").is_err());
        assert!(validate_rpc_url("ws://127.0.0.1:8546").is_err());
    }
}

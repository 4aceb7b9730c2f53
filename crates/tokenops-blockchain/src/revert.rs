//! Classification of simulation failures into structured revert reasons.

use std::fmt;

use alloy::{
    dyn_abi::JsonAbiExt,
    json_abi::Error as AbiError,
    primitives::{Bytes, U256},
    sol_types::{Panic, Revert, SolError},
    transports::{RpcError, TransportErrorKind},
};
use serde_json::Value;

use crate::abi::{ContractAbi, normalize_value};

const DEFAULT_SHORT_MESSAGE: &str = "Transaction would revert";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// `Error(string)`, message kept verbatim.
    StringReason(String),
    /// Error declared in the template ABI.
    CustomError { name: String, args: Vec<String> },
    /// `Panic(uint256)` raised by the compiler's checks.
    Panic { code: U256 },
    Unclassified(String),
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertReason::StringReason(reason) => f.write_str(reason),
            RevertReason::CustomError { name, args } if args.is_empty() => {
                write!(f, "Contract error: {}", name)
            }
            RevertReason::CustomError { name, args } => {
                write!(f, "Contract error: {}({})", name, args.join(", "))
            }
            RevertReason::Panic { code } => {
                write!(f, "Panic: {} (0x{:x})", panic_description(*code), code)
            }
            RevertReason::Unclassified(message) => f.write_str(message),
        }
    }
}

fn panic_description(code: U256) -> &'static str {
    match u64::try_from(code).unwrap_or(u64::MAX) {
        0x01 => "Assertion failed",
        0x11 => "Arithmetic overflow/underflow",
        0x12 => "Division by zero",
        0x21 => "Invalid enum value",
        0x22 => "Storage encoding error",
        0x31 => "Pop on empty array",
        0x32 => "Array index out of bounds",
        0x41 => "Too much memory allocated",
        0x51 => "Zero internal function called",
        _ => "Unknown panic code",
    }
}

/// One level of a nested error chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureFrame {
    pub message: String,
    pub revert_data: Option<Bytes>,
}

impl FailureFrame {
    pub fn new(message: impl Into<String>, revert_data: Option<Bytes>) -> Self {
        Self {
            message: message.into(),
            revert_data,
        }
    }
}

/// A failed `eth_call`, as frames ordered outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationFailure {
    frames: Vec<FailureFrame>,
}

impl SimulationFailure {
    pub fn new(frames: Vec<FailureFrame>) -> Self {
        Self { frames }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(vec![FailureFrame::new(message, None)])
    }

    pub fn from_rpc_error(err: &RpcError<TransportErrorKind>) -> Self {
        let payload = err.as_error_resp();
        let mut frames = vec![FailureFrame::new(
            err.to_string(),
            payload.and_then(|p| p.as_revert_data()),
        )];

        let Some(payload) = payload else {
            return Self::new(frames);
        };
        let Some(raw) = payload.data.as_ref() else {
            return Self::new(frames);
        };

        let raw = raw.get().trim();
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => collect_frames(&value, &payload.message, &mut frames),
            // Some nodes return selector-only data that isn't valid JSON.
            Err(_) => {
                if let Some(bytes) = parse_revert_hex(raw.trim_matches('"')) {
                    frames.push(FailureFrame::new(payload.message.to_string(), Some(bytes)));
                }
            }
        }

        Self::new(frames)
    }

    pub fn frames(&self) -> &[FailureFrame] {
        &self.frames
    }

    /// First line of the outermost message.
    pub fn short_message(&self) -> String {
        self.frames
            .first()
            .and_then(|frame| frame.message.lines().next())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .unwrap_or(DEFAULT_SHORT_MESSAGE)
            .to_string()
    }
}

fn parse_revert_hex(s: &str) -> Option<Bytes> {
    if !s.starts_with("0x") {
        return None;
    }
    s.parse::<Bytes>().ok().filter(|bytes| !bytes.is_empty())
}

/// Each JSON object level contributes frames carrying its own `message`,
/// or the enclosing one when it has none.
fn collect_frames(value: &Value, inherited: &str, frames: &mut Vec<FailureFrame>) {
    match value {
        Value::String(s) => {
            if let Some(bytes) = parse_revert_hex(s) {
                frames.push(FailureFrame::new(inherited, Some(bytes)));
            }
        }
        Value::Object(object) => {
            let message = object
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(inherited);
            for (key, nested) in object {
                if key != "message" {
                    collect_frames(nested, message, frames);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_frames(item, inherited, frames);
            }
        }
        _ => {}
    }
}

/// Decodes revert payloads against a template's declared errors.
#[derive(Debug, Clone)]
pub struct RevertDecoder {
    errors: Vec<AbiError>,
}

impl RevertDecoder {
    pub fn new(abi: &ContractAbi) -> Self {
        Self {
            errors: abi.json_abi().errors().cloned().collect(),
        }
    }

    /// Innermost decodable revert wins; otherwise the outermost message is passed through.
    pub fn decode(&self, failure: &SimulationFailure) -> RevertReason {
        failure
            .frames()
            .iter()
            .rev()
            .filter_map(|frame| frame.revert_data.as_ref())
            .find_map(|data| self.decode_data(data))
            .unwrap_or_else(|| RevertReason::Unclassified(failure.short_message()))
    }

    pub fn decode_data(&self, data: &[u8]) -> Option<RevertReason> {
        if let Ok(revert) = Revert::abi_decode(data) {
            return Some(RevertReason::StringReason(revert.reason));
        }
        if let Ok(panic) = Panic::abi_decode(data) {
            return Some(RevertReason::Panic { code: panic.code });
        }

        let (selector, params) = data.split_first_chunk::<4>()?;
        self.errors
            .iter()
            .filter(|error| error.selector().as_slice() == selector)
            .find_map(|error| {
                let values = error.abi_decode_input(params).ok()?;
                let args = values.iter().map(render_arg).collect();
                Some(RevertReason::CustomError {
                    name: error.name.clone(),
                    args,
                })
            })
    }
}

fn render_arg(value: &alloy::dyn_abi::DynSolValue) -> String {
    match normalize_value(value) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use alloy::{
        hex,
        primitives::{Address, address},
        rpc::json_rpc::ErrorPayload,
        sol,
    };

    use super::*;
    use crate::abi::tests::token_abi;

    sol! {
        error NotAllowlisted(address account);
        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
        error EnforcedPause();
        error Unknown(uint256 code);
    }

    const CALLER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn decoder() -> RevertDecoder {
        RevertDecoder::new(&token_abi())
    }

    fn error_response(json: &str) -> RpcError<TransportErrorKind> {
        let payload: ErrorPayload = serde_json::from_str(json).unwrap();
        RpcError::ErrorResp(payload)
    }

    #[test]
    fn decodes_custom_error_with_checksummed_address() {
        let data = NotAllowlisted { account: CALLER }.abi_encode();
        let reason = decoder().decode_data(&data).unwrap();
        assert_eq!(
            reason.to_string(),
            "Contract error: NotAllowlisted(0x70997970C51812dc3A010C7d01b50e0d17dc79C8)"
        );
    }

    #[test]
    fn renders_numeric_args_as_decimal_in_call_order() {
        let data = ERC20InsufficientBalance {
            sender: CALLER,
            balance: U256::from(5),
            needed: U256::from(10).pow(U256::from(21)),
        }
        .abi_encode();
        let reason = decoder().decode_data(&data).unwrap();
        assert_eq!(
            reason,
            RevertReason::CustomError {
                name: "ERC20InsufficientBalance".to_string(),
                args: vec![
                    CALLER.to_checksum(None),
                    "5".to_string(),
                    "1000000000000000000000".to_string(),
                ],
            }
        );
    }

    #[test]
    fn argless_custom_error_has_no_parentheses() {
        let reason = decoder().decode_data(&EnforcedPause {}.abi_encode()).unwrap();
        assert_eq!(reason.to_string(), "Contract error: EnforcedPause");
    }

    #[test]
    fn decodes_string_reason_verbatim() {
        let data = Revert {
            reason: "ERC20: insufficient allowance".to_string(),
        }.abi_encode();
        assert_eq!(
            decoder().decode_data(&data),
            Some(RevertReason::StringReason(
                "ERC20: insufficient allowance".to_string()
            ))
        );
    }

    #[test]
    fn decodes_panic_codes() {
        let data = Panic {
            code: U256::from(0x11),
        }
        .abi_encode();
        let reason = decoder().decode_data(&data).unwrap();
        assert_eq!(reason.to_string(), "Panic: Arithmetic overflow/underflow (0x11)");
    }

    #[test]
    fn unknown_selector_is_not_decoded() {
        let data = Unknown { code: U256::from(1) }.abi_encode();
        assert_eq!(decoder().decode_data(&data), None);
    }

    #[test]
    fn prefers_innermost_decodable_revert() {
        let inner = hex::encode_prefixed(NotAllowlisted { account: CALLER }.abi_encode());
        let outer = hex::encode_prefixed(Revert { reason: "wrapper".to_string() }.abi_encode());
        let failure = SimulationFailure::new(vec![
            FailureFrame::new("execution reverted", None),
            FailureFrame::new("outer call failed", Some(outer.parse().unwrap())),
            FailureFrame::new("inner call failed", Some(inner.parse().unwrap())),
        ]);
        assert_eq!(
            decoder().decode(&failure).to_string(),
            "Contract error: NotAllowlisted(0x70997970C51812dc3A010C7d01b50e0d17dc79C8)"
        );
    }

    #[test]
    fn falls_back_to_outermost_first_line() {
        let failure = SimulationFailure::new(vec![
            FailureFrame::new("insufficient funds for gas\nat block 12", None),
            FailureFrame::new("inner detail", Some(Bytes::from_static(&[0xde, 0xad]))),
        ]);
        assert_eq!(
            decoder().decode(&failure),
            RevertReason::Unclassified("insufficient funds for gas".to_string())
        );
        assert_eq!(
            SimulationFailure::from_message("").short_message(),
            "Transaction would revert"
        );
    }

    #[test]
    fn walks_nested_json_rpc_error_data() {
        let inner = hex::encode_prefixed(NotAllowlisted { account: CALLER }.abi_encode());
        let err = error_response(&format!(
            r#"{{"code":-32000,"message":"execution reverted","data":{{"message":"call failed","data":{{"message":"inner","data":"{inner}"}}}}}}"#
        ));

        let failure = SimulationFailure::from_rpc_error(&err);
        assert!(failure.frames().len() >= 2);
        assert_eq!(
            failure.frames().last().unwrap().message,
            "inner"
        );
        assert_eq!(
            decoder().decode(&failure).to_string(),
            "Contract error: NotAllowlisted(0x70997970C51812dc3A010C7d01b50e0d17dc79C8)"
        );
    }

    #[test]
    fn reads_flat_revert_data_from_error_response() {
        let data = hex::encode_prefixed(EnforcedPause {}.abi_encode());
        let err = error_response(&format!(
            r#"{{"code":3,"message":"execution reverted","data":"{data}"}}"#
        ));
        let failure = SimulationFailure::from_rpc_error(&err);
        assert_eq!(
            decoder().decode(&failure).to_string(),
            "Contract error: EnforcedPause"
        );
    }
}

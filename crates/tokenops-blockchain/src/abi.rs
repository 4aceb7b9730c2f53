//! Dynamic ABI codec for token templates.
//!
//! Templates are registered at runtime, so calls are encoded against the
//! stored JSON ABI rather than compile-time `sol!` bindings.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier},
    hex,
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
};
use serde_json::Value;

use crate::{ContractCall, error::BlockchainError};

#[derive(Debug, Clone)]
pub struct ContractAbi {
    abi: JsonAbi,
}

impl ContractAbi {
    pub fn parse(json: &str) -> Result<Self, BlockchainError> {
        let value: Value = serde_json::from_str(json).map_err(|e| BlockchainError::InvalidAbi {
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Accepts either a bare ABI array or a compiler artifact with an `abi` field.
    pub fn from_value(value: Value) -> Result<Self, BlockchainError> {
        let value = match value {
            Value::Object(mut artifact) if artifact.contains_key("abi") => {
                artifact.remove("abi").unwrap_or(Value::Null)
            }
            other => other,
        };

        let abi: JsonAbi =
            serde_json::from_value(value).map_err(|e| BlockchainError::InvalidAbi {
                reason: e.to_string(),
            })?;
        Ok(Self { abi })
    }

    pub fn json_abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Looks up a function by name, picking the overload with matching arity.
    pub fn function(&self, name: &str, arity: usize) -> Result<&Function, BlockchainError> {
        let overloads = self
            .abi
            .function(name)
            .ok_or_else(|| BlockchainError::UnknownFunction {
                function: name.to_string(),
            })?;

        overloads
            .iter()
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| BlockchainError::InvalidArguments {
                function: name.to_string(),
                reason: format!("no overload takes {} argument(s)", arity),
            })
    }

    pub fn encode_call(
        &self,
        to: Address,
        function: &str,
        args: Vec<DynSolValue>,
    ) -> Result<ContractCall, BlockchainError> {
        let func = self.function(function, args.len())?;
        let args = fit_arguments(function, func, args)?;
        let calldata =
            func.abi_encode_input(&args)
                .map_err(|e| BlockchainError::InvalidArguments {
                    function: function.to_string(),
                    reason: e.to_string(),
                })?;

        Ok(ContractCall {
            to,
            function: function.to_string(),
            arity: args.len(),
            calldata: calldata.into(),
        })
    }

    pub fn decode_output(
        &self,
        call: &ContractCall,
        data: &[u8],
    ) -> Result<Vec<DynSolValue>, BlockchainError> {
        let func = self.function(&call.function, call.arity)?;
        func.abi_decode_output(data)
            .map_err(|e| BlockchainError::DecodeOutput {
                function: call.function.clone(),
                reason: e.to_string(),
            })
    }

    /// Creation code: bytecode followed by the ABI-encoded constructor arguments.
    pub fn deploy_code(
        &self,
        bytecode: &str,
        args: Vec<DynSolValue>,
    ) -> Result<Bytes, BlockchainError> {
        let mut code = hex::decode(bytecode.trim()).map_err(|e| {
            BlockchainError::InvalidBytecode {
                reason: e.to_string(),
            }
        })?;
        if code.is_empty() {
            return Err(BlockchainError::InvalidBytecode {
                reason: "bytecode is empty".to_string(),
            });
        }

        match &self.abi.constructor {
            Some(constructor) => {
                if constructor.inputs.len() != args.len() {
                    return Err(BlockchainError::InvalidArguments {
                        function: "constructor".to_string(),
                        reason: format!(
                            "expected {} argument(s), got {}",
                            constructor.inputs.len(),
                            args.len()
                        ),
                    });
                }
                let mut fitted = Vec::with_capacity(args.len());
                for (param, value) in constructor.inputs.iter().zip(args) {
                    let ty = param.resolve().map_err(|e| BlockchainError::InvalidAbi {
                        reason: e.to_string(),
                    })?;
                    fitted.push(fit_value("constructor", &param.name, &ty, value)?);
                }
                let encoded = constructor.abi_encode_input(&fitted).map_err(|e| {
                    BlockchainError::InvalidArguments {
                        function: "constructor".to_string(),
                        reason: e.to_string(),
                    }
                })?;
                code.extend_from_slice(&encoded);
            }
            None if !args.is_empty() => {
                return Err(BlockchainError::InvalidArguments {
                    function: "constructor".to_string(),
                    reason: "ABI declares no constructor".to_string(),
                });
            }
            None => {}
        }

        Ok(code.into())
    }
}

fn fit_arguments(
    function: &str,
    func: &Function,
    args: Vec<DynSolValue>,
) -> Result<Vec<DynSolValue>, BlockchainError> {
    func.inputs
        .iter()
        .zip(args)
        .map(|(param, value)| {
            let ty = param.resolve().map_err(|e| BlockchainError::InvalidAbi {
                reason: e.to_string(),
            })?;
            fit_value(function, &param.name, &ty, value)
        })
        .collect()
}

/// Narrows unsigned integers to the declared width; everything else must
/// already have the declared type.
fn fit_value(
    function: &str,
    param: &str,
    ty: &DynSolType,
    value: DynSolValue,
) -> Result<DynSolValue, BlockchainError> {
    if let (DynSolType::Uint(bits), DynSolValue::Uint(v, _)) = (ty, &value) {
        if v.bit_len() > *bits {
            return Err(BlockchainError::InvalidArguments {
                function: function.to_string(),
                reason: format!("{} does not fit in uint{} for '{}'", v, bits, param),
            });
        }
        return Ok(DynSolValue::Uint(*v, *bits));
    }

    if ty.matches(&value) {
        Ok(value)
    } else {
        Err(BlockchainError::InvalidArguments {
            function: function.to_string(),
            reason: format!("argument '{}' is not a valid {}", param, ty),
        })
    }
}

/// Largest integer width a JSON number carries exactly (IEEE-754 mantissa).
const EXACT_JSON_INT_BITS: usize = 53;

/// JSON rendering of a call argument or decoded value.
///
/// Integers of every width become decimal strings, addresses are checksummed
/// and byte strings are 0x-hex.
pub fn normalize_value(value: &DynSolValue) -> Value {
    render(value, false)
}

/// Read output rendering. A single output is unwrapped; multiple outputs
/// become an array. Integers no wider than 53 bits (`uint8 decimals`) stay
/// JSON numbers, wider ones are decimal strings.
pub fn normalize_outputs(mut outputs: Vec<DynSolValue>) -> Value {
    if outputs.len() == 1 {
        return render(&outputs.remove(0), true);
    }
    Value::Array(outputs.iter().map(|value| render(value, true)).collect())
}

fn render(value: &DynSolValue, narrow_ints_as_numbers: bool) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(v, bits) if narrow_ints_as_numbers && *bits <= EXACT_JSON_INT_BITS => {
            i64::try_from(*v).map_or_else(|_| Value::String(v.to_string()), Value::from)
        }
        DynSolValue::Uint(v, bits) if narrow_ints_as_numbers && *bits <= EXACT_JSON_INT_BITS => {
            u64::try_from(*v).map_or_else(|_| Value::String(v.to_string()), Value::from)
        }
        DynSolValue::Int(v, _) => Value::String(v.to_string()),
        DynSolValue::Uint(v, _) => Value::String(v.to_string()),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(hex::encode_prefixed(&word[..*size]))
        }
        DynSolValue::Address(address) => Value::String(address.to_checksum(None)),
        DynSolValue::Function(f) => Value::String(hex::encode_prefixed(f)),
        DynSolValue::Bytes(bytes) => Value::String(hex::encode_prefixed(bytes)),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(
                items
                    .iter()
                    .map(|item| render(item, narrow_ints_as_numbers))
                    .collect(),
            )
        }
        #[allow(unreachable_patterns)]
        _ => Value::Null,
    }
}

//! Compiler output and the publish transaction built from it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PUBLISH_PACKAGE_FUNCTION;
use crate::error::{CompileError, PublishError};

/// JSON object returned by the compiler.
///
/// Kept as untyped data; only `metadataBytes` and `byteCode` are read, and
/// only when publishing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompileResult(Value);

impl CompileResult {
    /// Parse a response body. Anything but a JSON object is rejected.
    pub fn from_json_str(body: &str) -> Result<Self, CompileError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| CompileError::InvalidJson(e.to_string()))?;
        Self::try_from(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Hex-encoded package metadata, if present.
    pub fn metadata_bytes(&self) -> Option<&str> {
        self.0.get("metadataBytes").and_then(Value::as_str)
    }

    /// Hex-encoded modules. A single string is treated as one module.
    ///
    /// Returns `None` when the field is missing or holds something other
    /// than strings.
    pub fn byte_code(&self) -> Option<Vec<&str>> {
        match self.0.get("byteCode")? {
            Value::String(module) => Some(vec![module.as_str()]),
            Value::Array(modules) => modules.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }

    /// Pretty-printed JSON for display.
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl TryFrom<Value> for CompileResult {
    type Error = CompileError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(CompileError::InvalidJson(format!(
                "expected a JSON object, got {}",
                value
            )))
        }
    }
}

/// Entry-function transaction that publishes a package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishPayload {
    /// Always [`PUBLISH_PACKAGE_FUNCTION`].
    pub function: &'static str,
    /// Decoded `metadataBytes`.
    pub metadata: Vec<u8>,
    /// Decoded `byteCode`, one entry per module.
    pub modules: Vec<Vec<u8>>,
}

impl PublishPayload {
    /// Decode the hex artifacts of a compile result.
    pub fn from_compile_result(result: &CompileResult) -> Result<Self, PublishError> {
        let metadata_hex = result.metadata_bytes().ok_or(PublishError::HexDecode {
            field: "metadataBytes",
            reason: "missing".to_string(),
        })?;
        let modules_hex = result.byte_code().ok_or(PublishError::HexDecode {
            field: "byteCode",
            reason: "missing or not a list of strings".to_string(),
        })?;

        let metadata = decode_hex("metadataBytes", metadata_hex)?;
        let modules = modules_hex
            .into_iter()
            .map(|module| decode_hex("byteCode", module))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            function: PUBLISH_PACKAGE_FUNCTION,
            metadata,
            modules,
        })
    }
}

/// Decode a hex string with an optional `0x` prefix.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, PublishError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    hex::decode(digits).map_err(|e| PublishError::HexDecode {
        field,
        reason: e.to_string(),
    })
}

/// Hash of a submitted transaction, as returned by the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(String);

impl TransactionHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/*
 * Responsibility
 * - RPC の request/response envelope
 * - AppError → gRPC 互換 status code への変換
 */
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, ErrorKind};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RpcRequest {
    /// Metadata keys are case-insensitive and single-valued; two spellings
    /// of the same key reject the call.
    pub fn metadata(&self, key: &str) -> AppResult<Option<&str>> {
        let mut found = self
            .metadata
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str());

        let first = found.next();
        if found.next().is_some() {
            return Err(AppError::bad_request(
                "INVALID_METADATA",
                format!("metadata key {key} given more than once"),
            ));
        }
        Ok(first)
    }
}

/// Subset of the gRPC status codes this service produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcStatus {
    InvalidArgument,
    NotFound,
    Unimplemented,
    Internal,
    Unauthenticated,
}

impl RpcStatus {
    pub fn code(self) -> i32 {
        match self {
            RpcStatus::InvalidArgument => 3,
            RpcStatus::NotFound => 5,
            RpcStatus::Unimplemented => 12,
            RpcStatus::Internal => 13,
            RpcStatus::Unauthenticated => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RpcStatus::InvalidArgument => "INVALID_ARGUMENT",
            RpcStatus::NotFound => "NOT_FOUND",
            RpcStatus::Unimplemented => "UNIMPLEMENTED",
            RpcStatus::Internal => "INTERNAL",
            RpcStatus::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl From<ErrorKind> for RpcStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::BadRequest => RpcStatus::InvalidArgument,
            ErrorKind::Unauthorized => RpcStatus::Unauthenticated,
            ErrorKind::NotFound => RpcStatus::NotFound,
            ErrorKind::Operational => RpcStatus::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub status: &'static str,
    pub message: String,
}

impl RpcError {
    pub fn new(status: RpcStatus, message: impl Into<String>) -> Self {
        Self {
            code: status.code(),
            status: status.name(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RpcStatus::InvalidArgument, message)
    }

    pub fn unimplemented(method: &str) -> Self {
        Self::new(RpcStatus::Unimplemented, format!("unknown method: {method}"))
    }
}

impl From<AppError> for RpcError {
    fn from(err: AppError) -> Self {
        err.log();
        let (_, message) = err.public_parts();
        Self::new(err.kind().into(), message)
    }
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(error),
        }
    }
}

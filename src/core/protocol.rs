//! JSON-RPC message shapes exchanged over a connection.
//!
//! Requests are read leniently: only `method` matters for routing, `id` is
//! echoed back as-is (or `null` when absent) and `jsonrpc` is not checked.
//! Responses always carry `jsonrpc`, `id`, and exactly one of `result` or
//! `error`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version marker written on every response.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes used by the server.
pub mod error_codes {
    /// The frame decoded to JSON that is not a request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// Unknown method, or `tools/call` naming an unregistered tool.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// A tool handler failed.
    pub const HANDLER_ERROR: i64 = -32000;
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub id: Value,
    pub method: Option<String>,
    pub params: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Interpret a decoded frame as a request.
    ///
    /// Returns `None` when the value is not a JSON object. A missing or
    /// non-string `method` is kept as `None` and later routed to
    /// "Method not found"; non-object `params` are treated as absent.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut object) = value else {
            return None;
        };

        let id = object.remove("id").unwrap_or(Value::Null);
        let method = match object.remove("method") {
            Some(Value::String(method)) => Some(method),
            _ => None,
        };
        let params = match object.remove("params") {
            Some(Value::Object(params)) => params,
            _ => Map::new(),
        };

        Some(Self { id, method, params })
    }

    /// Method name, or `""` when absent.
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or_default()
    }
}

/// JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

/// The `result` / `error` half of a response; exactly one is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOutcome {
    Result(Value),
    Error(JsonRpcError),
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: ResponseOutcome::Result(result),
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: ResponseOutcome::Error(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Value) -> Self {
        Self::error(id, error_codes::METHOD_NOT_FOUND, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Value) -> Self {
        Self::error(id, error_codes::INVALID_REQUEST, "Invalid Request")
    }

    /// Tool handler failure.
    pub fn handler_error(id: Value, message: impl Into<String>) -> Self {
        Self::error(id, error_codes::HANDLER_ERROR, message)
    }

    /// The result value, if this is a success response.
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            ResponseOutcome::Result(result) => Some(result),
            ResponseOutcome::Error(_) => None,
        }
    }

    /// The error object, if this is an error response.
    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.outcome {
            ResponseOutcome::Result(_) => None,
            ResponseOutcome::Error(error) => Some(error),
        }
    }

    /// Consume the response, yielding the result or the error object.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.outcome {
            ResponseOutcome::Result(result) => Ok(result),
            ResponseOutcome::Error(error) => Err(error),
        }
    }
}

//! Tool handler contract.
//!
//! Every tool is backed by a [`ToolHandler`]: an async operation taking the
//! call's argument mapping and producing a JSON value. Handlers that never
//! suspend are simply futures that complete on first poll, so there is one
//! contract for both synchronous and I/O-bound tools.

use std::future::Future;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ToolError;

/// The argument mapping passed to a tool handler.
pub type ToolArguments = Map<String, Value>;

/// The outcome of a tool invocation.
pub type ToolResult = Result<Value, ToolError>;

/// Trait for implementing tool handlers.
///
/// Implementations must be shareable across connections: the registry hands
/// the same handler to every connection that calls the tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given arguments.
    async fn call(&self, arguments: ToolArguments) -> ToolResult;
}

/// Adapter turning an async closure into a [`ToolHandler`].
///
/// ```rust
/// use serviceplex_mcp::domains::tools::{FnHandler, ToolArguments, ToolError};
/// use serde_json::Value;
///
/// let echo = FnHandler::new(|args: ToolArguments| async move {
///     Ok::<_, ToolError>(Value::Object(args))
/// });
/// # let _ = echo;
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult> + Send,
{
    async fn call(&self, arguments: ToolArguments) -> ToolResult {
        (self.f)(arguments).await
    }
}

/// Deserialize an argument mapping into a typed parameter struct.
pub fn parse_arguments<T: DeserializeOwned>(arguments: ToolArguments) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// The schema used when a tool declares none: an object with no properties.
pub fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// Generate the argument schema for a typed parameter struct.
pub fn schema_for_params<T: JsonSchema>() -> Value {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(mut schema)) => {
            schema.remove("$schema");
            Value::Object(schema)
        }
        _ => empty_object_schema(),
    }
}

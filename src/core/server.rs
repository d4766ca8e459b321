//! MCP Server implementation - request dispatch.
//!
//! [`McpServer`] turns one decoded request into exactly one response. It
//! resolves the fixed protocol methods (`initialize`, `tools/list`,
//! `tools/call`) and forwards tool calls to the [`ToolRegistry`]. Every
//! failure, including a panicking tool, becomes a protocol-level error
//! response; nothing propagates to the connection.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value, json};
use tracing::{info, instrument, warn};

use super::config::Config;
use super::protocol::{JsonRpcRequest, JsonRpcResponse, error_codes};
use super::transport::TransportService;
use crate::domains::tools::{ToolArguments, ToolError, ToolRegistry, ToolResult, build_tool_registry};

/// The request dispatcher shared by every connection.
///
/// Cloning is cheap: configuration and registry sit behind `Arc`s and are
/// never mutated once the server is built.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a server from a configuration and a fully populated registry.
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Create a server with the built-in tool catalog.
    pub fn with_builtin_tools(config: Config) -> crate::Result<Self> {
        let registry = build_tool_registry(&config)?;
        Ok(Self::new(config, registry))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve the configured transport until `shutdown` resolves.
    pub async fn serve(self, shutdown: impl Future<Output = ()>) -> crate::Result<()> {
        let transport = TransportService::new(self.config.transport.clone());
        transport.run(self, shutdown).await?;
        Ok(())
    }

    /// Handle one decoded frame.
    ///
    /// Values that are not JSON objects get an "Invalid Request" error with a
    /// `null` id.
    pub async fn handle_message(&self, message: Value) -> JsonRpcResponse {
        match JsonRpcRequest::from_value(message) {
            Some(request) => self.handle_request(request).await,
            None => {
                warn!("Frame is not a request object");
                JsonRpcResponse::invalid_request(Value::Null)
            }
        }
    }

    /// Route a request to its method handler.
    #[instrument(skip_all, fields(method = %request.method(), id = %request.id))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Received request: {}", request.method());

        match request.method() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            method => {
                warn!("Unknown method: {:?}", method);
                JsonRpcResponse::method_not_found(request.id)
            }
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if let Some(client) = request.params.get("clientInfo") {
            info!("Client info: {}", client);
        }
        JsonRpcResponse::success(request.id, json!({ "serverInfo": { "name": self.name() } }))
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id, json!({ "tools": self.registry.list() }))
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest { id, mut params, .. } = request;

        let name = match params.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => String::new(),
        };

        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(arguments)) => arguments,
            Some(other) => {
                if self.registry.get(&name).is_none() {
                    warn!("Unknown tool requested: {:?}", name);
                    return JsonRpcResponse::method_not_found(id);
                }
                let err = ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {}",
                    json_type(&other)
                ));
                warn!("Tool '{}' rejected: {}", name, err);
                return JsonRpcResponse::handler_error(id, err.to_string());
            }
        };

        match self.call_tool(&name, arguments).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) if e.code() == error_codes::METHOD_NOT_FOUND => {
                warn!("Unknown tool requested: {:?}", name);
                JsonRpcResponse::method_not_found(id)
            }
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                JsonRpcResponse::error(id, e.code(), e.to_string())
            }
        }
    }

    /// Look up and invoke a tool.
    ///
    /// Arguments are checked against the tool's `required` list first. A
    /// panic inside the handler is caught and reported as
    /// [`ToolError::Panicked`].
    pub async fn call_tool(&self, name: &str, arguments: ToolArguments) -> ToolResult {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        tool.validate_arguments(&arguments)?;

        let handler = tool.handler();
        match AssertUnwindSafe(handler.call(arguments)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(ToolError::Panicked(panic_message(panic.as_ref()))),
        }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// JSON type name for error messages.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

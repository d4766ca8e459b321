//! Tool Registry - central registration and lookup for all tools.
//!
//! The registry is filled once during startup wiring and then moved into
//! [`McpServer`](crate::core::McpServer) behind an `Arc`. From that point on
//! it is only read, so connections share it without locking.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::ToolError;
use super::handlers::{FnHandler, ToolArguments, ToolHandler, ToolResult, empty_object_schema};

// ============================================================================
// Tool
// ============================================================================

/// A registered tool: metadata plus the handler that runs it.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    schema: Value,
    handler: Arc<dyn ToolHandler>,
}

impl Tool {
    /// Tool name as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool description shown to clients.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON schema describing the tool's arguments.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The handler backing this tool.
    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }

    /// Listing entry for this tool.
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            schema: self.schema.clone(),
        }
    }

    /// Check the arguments against the schema's `required` list.
    ///
    /// This is intentionally shallow: property types are left to the handler.
    pub fn validate_arguments(&self, arguments: &ToolArguments) -> Result<(), ToolError> {
        let required = self
            .schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);

        for field in required {
            if !arguments.contains_key(field) {
                return Err(ToolError::invalid_arguments(format!(
                    "missing required argument '{}' for tool '{}'",
                    field, self.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Tool metadata as returned by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - maps tool names to their metadata and handlers.
///
/// Listing order is registration order. Registering a name twice overwrites
/// the earlier entry in place, so the tool keeps its original position.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// A `None` schema defaults to an object with no properties.
    pub fn register<H>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Option<Value>,
        handler: H,
    ) -> &mut Self
    where
        H: ToolHandler + 'static,
    {
        let tool = Tool {
            name: name.into(),
            description: description.into(),
            schema: schema.unwrap_or_else(empty_object_schema),
            handler: Arc::new(handler),
        };

        match self.index.get(&tool.name) {
            Some(&position) => {
                warn!("Tool '{}' registered twice; overwriting", tool.name);
                self.tools[position] = tool;
            }
            None => {
                debug!("Registered tool '{}'", tool.name);
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
        self
    }

    /// Register a tool backed by an async closure.
    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Option<Value>,
        f: F,
    ) -> &mut Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        self.register(name, description, schema, FnHandler::new(f))
    }

    /// Look up a tool by name. Never invokes the handler.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// List all tools in registration order.
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(Tool::info).collect()
    }

    /// Get all tool names in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

//! Tool catalog - wires the built-in tools into a registry.
//!
//! This is the only place that knows which tools the server ships with.
//! Adding a tool means defining it under `definitions/` and registering it
//! here.

use std::sync::Arc;

use tracing::info;

use super::definitions::{GetContractTool, HealthPingTool, ServiceplexClient};
use super::{ToolError, ToolRegistry};
use crate::core::config::Config;

/// Build the registry with all built-in tools.
///
/// Fails only if the downstream HTTP client cannot be constructed.
pub fn build_tool_registry(config: &Config) -> Result<ToolRegistry, ToolError> {
    let client = Arc::new(ServiceplexClient::new(&config.serviceplex)?);

    let mut registry = ToolRegistry::new();
    registry
        .register(
            HealthPingTool::NAME,
            HealthPingTool::DESCRIPTION,
            None,
            HealthPingTool::new(&config.serviceplex),
        )
        .register(
            GetContractTool::NAME,
            GetContractTool::DESCRIPTION,
            Some(GetContractTool::schema()),
            GetContractTool::new(client),
        );

    info!("Registered {} tools: {:?}", registry.len(), registry.tool_names());
    Ok(registry)
}

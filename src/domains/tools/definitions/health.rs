//! Liveness check tool definition.
//!
//! Reports that the server is up, along with the downstream API settings it
//! was started with.

use serde_json::{Value, json};
use tracing::info;

use crate::core::config::ServiceplexConfig;
use crate::domains::tools::{ToolArguments, ToolError, ToolHandler, ToolResult};

/// Health ping tool - a no-argument liveness check.
#[derive(Debug, Clone)]
pub struct HealthPingTool {
    base_url: String,
    verify_tls: bool,
}

impl HealthPingTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "health.ping";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Simple liveness check.";

    /// Create the tool from the downstream API configuration.
    pub fn new(config: &ServiceplexConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            verify_tls: config.verify_tls,
        }
    }

    /// Execute the tool logic.
    pub fn execute(&self) -> Value {
        info!("Health ping");
        json!({
            "ok": true,
            "base_url": self.base_url,
            "verify_ssl": self.verify_tls,
        })
    }
}

#[async_trait::async_trait]
impl ToolHandler for HealthPingTool {
    async fn call(&self, arguments: ToolArguments) -> ToolResult {
        if let Some(name) = arguments.keys().next() {
            return Err(ToolError::invalid_arguments(format!(
                "health.ping takes no arguments, got '{}'",
                name
            )));
        }
        Ok(self.execute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServiceplexConfig {
        ServiceplexConfig {
            base_url: "http://contracts.internal".to_string(),
            ..ServiceplexConfig::default()
        }
    }

    #[test]
    fn test_health_ping_execute() {
        let tool = HealthPingTool::new(&test_config());
        assert_eq!(
            tool.execute(),
            json!({ "ok": true, "base_url": "http://contracts.internal", "verify_ssl": true })
        );
    }

    #[tokio::test]
    async fn test_health_ping_without_arguments() {
        let tool = HealthPingTool::new(&test_config());
        let result = tool.call(ToolArguments::new()).await.unwrap();
        assert_eq!(result["ok"], true);
    }

    #[tokio::test]
    async fn test_health_ping_rejects_arguments() {
        let tool = HealthPingTool::new(&test_config());
        let mut args = ToolArguments::new();
        args.insert("unexpected".into(), json!(1));
        let err = tool.call(args).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments: health.ping takes no arguments, got 'unexpected'"
        );
    }
}

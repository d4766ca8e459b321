//! Contract lookup tool definition.
//!
//! Fetches contract detail from the Serviceplex API by WBS code.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::client::ServiceplexClient;
use crate::domains::tools::{
    ToolArguments, ToolHandler, ToolResult, parse_arguments, schema_for_params,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the contract lookup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetContractParams {
    /// WBS code of the contract.
    #[serde(rename = "wbsCode")]
    #[schemars(description = "WBS code identifying the contract (e.g. B.220410.3.1)")]
    pub wbs_code: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Contract lookup tool.
#[derive(Debug, Clone)]
pub struct GetContractTool {
    client: Arc<ServiceplexClient>,
}

impl GetContractTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "serviceplex.get_contract";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch contract detail by WBS Code.";

    /// Create the tool around a shared API client.
    pub fn new(client: Arc<ServiceplexClient>) -> Self {
        Self { client }
    }

    /// Argument schema for this tool.
    pub fn schema() -> Value {
        schema_for_params::<GetContractParams>()
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(wbs_code = %params.wbs_code))]
    pub async fn execute(&self, params: &GetContractParams) -> ToolResult {
        info!("Contract lookup for WBS code: {}", params.wbs_code);

        match self.client.get_contract(&params.wbs_code).await {
            Ok(contract) => Ok(contract),
            Err(e) => {
                warn!("Contract lookup failed: {}", e);
                Err(e)
            }
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetContractTool {
    async fn call(&self, arguments: ToolArguments) -> ToolResult {
        let params: GetContractParams = parse_arguments(arguments)?;
        self.execute(&params).await
    }
}

// ============================================================================
// Tests
// ============================================================================

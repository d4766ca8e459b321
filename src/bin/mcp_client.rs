//! Smoke-test client.
//!
//! Connects to a running server and walks through a full session:
//! `initialize`, `tools/list`, `health.ping`, then a contract lookup.
//!
//! ```text
//! mcp-client [ADDR] [WBS_CODE]
//! ```
//!
//! `ADDR` defaults to `MCP_TCP_HOST:MCP_TCP_PORT` (127.0.0.1:8888) and
//! `WBS_CODE` to `B.220410.3.1`. Responses are printed to stdout.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use serviceplex_mcp::core::transport::{McpClient, TcpConfig};

const DEFAULT_WBS_CODE: &str = "B.220410.3.1";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args
        .next()
        .unwrap_or_else(|| TcpConfig::from_env().address());
    let wbs_code = args.next().unwrap_or_else(|| DEFAULT_WBS_CODE.to_string());

    info!("Connecting to {}", addr);
    let mut client = McpClient::connect(addr.as_str())
        .await
        .with_context(|| format!("connecting to {} (is the server running?)", addr))?;

    let server_info = client
        .initialize("mcp-client")
        .await
        .context("initialize")?;
    print_section("initialize", &server_info)?;

    let tools = client.list_tools().await.context("tools/list")?;
    print_section("tools/list", &serde_json::to_value(&tools)?)?;

    let ping = client
        .call_tool("health.ping", Map::new())
        .await
        .context("tools/call health.ping")?;
    print_section("health.ping", &serde_json::to_value(&ping)?)?;

    let mut arguments = Map::new();
    arguments.insert("wbsCode".to_string(), json!(wbs_code));
    let contract = client
        .call_tool("serviceplex.get_contract", arguments)
        .await
        .context("tools/call serviceplex.get_contract")?;
    print_section("serviceplex.get_contract", &serde_json::to_value(&contract)?)?;

    client.close().await.context("closing connection")?;
    info!("Connection closed");
    Ok(())
}

fn print_section(title: &str, value: &Value) -> Result<()> {
    println!("== {} ==", title);
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

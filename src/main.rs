//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, registers the built-in tools and
//! serves the configured transport until Ctrl-C.

use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use serviceplex_mcp::core::config::LoggingConfig;
use serviceplex_mcp::core::{Config, McpServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::with_builtin_tools(config)?;

    info!(
        "Server initialized with {} tools: {}",
        server.registry().len(),
        server.registry().tool_names().join(", ")
    );

    server.serve(shutdown_signal()).await?;

    info!("Server shutting down");

    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format. Output goes to
/// stderr so the STDIO transport keeps stdout for frames.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}

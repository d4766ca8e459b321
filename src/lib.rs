//! Serviceplex MCP Server Library
//!
//! A small JSON-RPC tool server. Clients connect over TCP (or stdio), send
//! Content-Length framed JSON-RPC requests, and can discover and invoke the
//! registered tools: a liveness check and a contract lookup against the
//! Serviceplex API.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, protocol types, the dispatcher
//!   ([`McpServer`]) and the transport layer (framing, connections, listener)
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the tool registry and the built-in tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use serviceplex_mcp::core::{Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> serviceplex_mcp::Result<()> {
//!     let server = McpServer::with_builtin_tools(Config::from_env())?;
//!     server
//!         .serve(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};

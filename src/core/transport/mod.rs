//! Transport layer for the MCP server.
//!
//! Every transport speaks the same wire format, Content-Length framed
//! JSON-RPC (see [`framing`]), and hands each session to a [`Connection`]
//! that delegates message processing to the [`McpServer`](crate::core::McpServer)
//! dispatcher:
//! - **TCP**: one session per accepted socket - feature: `tcp`
//! - **STDIO**: a single session over stdin/stdout - feature: `stdio`
//!
//! # Feature Flags
//!
//! Transport implementations are conditionally compiled based on features:
//! - `tcp` (default): TCP listener and [`McpClient`] - adds tokio/net
//! - `stdio` (default): STDIO transport - no extra dependencies

mod config;
mod connection;
mod error;
pub mod framing;
mod service;

#[cfg(feature = "tcp")]
mod client;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use connection::{CloseReason, Connection, ConnectionOutcome, ConnectionState};
pub use error::{FramingError, TransportError, TransportResult};
pub use framing::{FrameReader, FrameWriter, encode_frame};
pub use service::{TransportService, TransportServiceBuilder};

// Re-export configs for convenience
#[cfg(feature = "tcp")]
pub use client::{DEFAULT_REQUEST_TIMEOUT, McpClient};

#[cfg(feature = "tcp")]
pub use config::{DEFAULT_TCP_PORT, TcpConfig};

//! Transport service - orchestrates different transport types.
//!
//! This service provides a unified interface for starting the MCP server
//! with different transport mechanisms.

use std::future::Future;

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Start the transport with the given MCP server.
    ///
    /// Runs until `shutdown` resolves (or, for STDIO, until stdin closes).
    pub async fn run(
        self,
        server: McpServer,
        shutdown: impl Future<Output = ()>,
    ) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server, shutdown).await,
            #[cfg(feature = "tcp")]
            TransportConfig::Tcp(cfg) => TcpTransport::new(cfg).run(server, shutdown).await,
        }
    }
}

/// Builder for creating a transport service with custom options.
pub struct TransportServiceBuilder {
    config: TransportConfig,
}

impl TransportServiceBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
        }
    }

    /// Use STDIO transport.
    #[cfg(feature = "stdio")]
    pub fn stdio(mut self) -> Self {
        self.config = TransportConfig::stdio();
        self
    }

    /// Use TCP transport on the given port.
    #[cfg(feature = "tcp")]
    pub fn tcp(mut self, port: u16, host: impl Into<String>) -> Self {
        self.config = TransportConfig::tcp(port, host);
        self
    }

    /// Build the transport service.
    pub fn build(self) -> TransportService {
        TransportService::new(self.config)
    }
}

impl Default for TransportServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "tcp")]
    #[test]
    fn test_builder_tcp() {
        let service = TransportServiceBuilder::new().tcp(9200, "0.0.0.0").build();
        assert_eq!(service.config(), &TransportConfig::tcp(9200, "0.0.0.0"));
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_builder_stdio() {
        let service = TransportServiceBuilder::default().stdio().build();
        assert!(service.config().is_stdio());
    }

    #[cfg(feature = "tcp")]
    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        use crate::core::config::Config;

        let service = TransportServiceBuilder::new().tcp(0, "127.0.0.1").build();
        let server = McpServer::with_builtin_tools(Config::default()).unwrap();
        service.run(server, async {}).await.unwrap();
    }
}

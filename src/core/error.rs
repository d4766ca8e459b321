//! Crate-level error type.
//!
//! Startup can fail while building the tool catalog (the downstream HTTP
//! client) or while bringing up the transport (bind, stdio failures).

use thiserror::Error;

use crate::core::transport::TransportError;
use crate::domains::tools::ToolError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::FramingError;

    #[test]
    fn test_tool_error_converts() {
        let err: Error = ToolError::internal("invalid basic key").into();
        assert!(matches!(err, Error::Tool(ToolError::Internal(_))));
        assert_eq!(err.to_string(), "Tool error: Internal error: invalid basic key");
    }

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::from(FramingError::MissingContentLength).into();
        assert_eq!(
            err.to_string(),
            "Transport error: Framing error: missing Content-Length header"
        );
    }
}

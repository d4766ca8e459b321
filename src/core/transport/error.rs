//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Malformed or incomplete frame on the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The stream ended before the `\r\n\r\n` header terminator.
    #[error("stream ended before the header terminator")]
    UnterminatedHeader,

    /// The header block grew past the limit without terminating.
    #[error("header block exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },

    /// No `Content-Length` line in the header block.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// `Content-Length` is not a positive integer.
    #[error("invalid Content-Length value '{0}'")]
    InvalidContentLength(String),

    /// `Content-Length` is larger than the server accepts.
    #[error("Content-Length {length} exceeds the {limit} byte limit")]
    BodyTooLarge { length: usize, limit: usize },

    /// The stream ended before the full body arrived.
    #[error("stream ended after {received} of {expected} body bytes")]
    TruncatedBody { expected: usize, received: usize },
}

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed frame; the connection cannot continue.
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// Frame body is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// IO error during transport (reset, broken pipe, ...).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A response could not be serialized.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The peer closed the stream while a response was expected.
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// No response arrived within the client-side timeout.
    #[error("Timed out after {0:?} waiting for a response")]
    Timeout(std::time::Duration),

    /// Protocol error.
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Short label used when logging why a connection ended.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Framing(_) => "framing",
            Self::Parse(_) => "parse",
            Self::IoError(_) | Self::ConnectionClosed | Self::Timeout(_) => "transport",
            Self::BindError { .. } => "bind",
            Self::JsonError(_) => "serialization",
            Self::ProtocolError(_) => "protocol",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_error_converts() {
        let err: TransportError = FramingError::MissingContentLength.into();
        assert_eq!(err.kind(), "framing");
        assert_eq!(err.to_string(), "Framing error: missing Content-Length header");
    }

    #[test]
    fn test_parse_error_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(TransportError::Parse(source).kind(), "parse");
    }

    #[test]
    fn test_truncated_body_message() {
        let err = FramingError::TruncatedBody {
            expected: 10,
            received: 5,
        };
        assert_eq!(err.to_string(), "stream ended after 5 of 10 body bytes");
    }
}

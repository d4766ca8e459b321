//! Tool-specific error types.

use thiserror::Error;

use crate::core::protocol::error_codes;

/// Errors that can occur during tool operations.
///
/// Everything except [`ToolError::NotFound`] is reported to the client as a
/// handler failure; the message is the error's `Display` text.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool execution failed. The message is passed through verbatim.
    #[error("{0}")]
    ExecutionFailed(String),

    /// The downstream HTTP call failed (transport error or non-2xx status).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The handler panicked while running.
    #[error("Tool panicked: {0}")]
    Panicked(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// JSON-RPC error code this error is reported with.
    pub fn code(&self) -> i64 {
        match self {
            Self::NotFound(_) => error_codes::METHOD_NOT_FOUND,
            _ => error_codes::HANDLER_ERROR,
        }
    }
}

//! Transport configuration types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default TCP port.
#[cfg(feature = "tcp")]
pub const DEFAULT_TCP_PORT: u16 = 8888;

/// Transport configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// A single framed session over standard input/output.
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP listener, one framed session per accepted connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on. `0` picks an ephemeral port.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

#[cfg(feature = "tcp")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "tcp")]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(all(not(feature = "tcp"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or tcp");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TCP_PORT,
            host: default_host(),
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create a TCP transport config.
    #[cfg(feature = "tcp")]
    pub fn tcp(port: u16, host: impl Into<String>) -> Self {
        Self::Tcp(TcpConfig {
            port,
            host: host.into(),
        })
    }

    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects `tcp` or `stdio`; unset or unknown values fall
    /// back to the default transport.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig::from_env()),
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            "" => Self::default_from_env(),
            other => {
                warn!("Unknown MCP_TRANSPORT={:?}, using the default transport", other);
                Self::default_from_env()
            }
        }
    }

    fn default_from_env() -> Self {
        #[cfg(feature = "tcp")]
        {
            return Self::Tcp(TcpConfig::from_env());
        }

        #[cfg(not(feature = "tcp"))]
        {
            Self::default()
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (single session)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}", cfg.address()),
        }
    }

    /// Check if this transport is the STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    /// Read `MCP_TCP_HOST` and `MCP_TCP_PORT`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("MCP_TCP_HOST") {
            config.host = host;
        }

        if let Ok(raw) = std::env::var("MCP_TCP_PORT") {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring MCP_TCP_PORT={:?}: not a valid port", raw),
            }
        }

        config
    }

    /// `host:port` string to bind to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

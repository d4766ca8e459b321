//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default base URL of the downstream contract API.
pub const DEFAULT_BASE_URL: &str = "https://dev-api.serviceplex.ai";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and lifecycle.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Downstream Serviceplex API configuration.
    pub serviceplex: ServiceplexConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Seconds in-flight connections get to finish after shutdown is requested.
    pub shutdown_grace_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the downstream contract API.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceplexConfig {
    /// Base URL requests are sent to.
    pub base_url: String,

    /// API key, sent base64-encoded in the `Basic-Key` header.
    pub basic_key: String,

    /// Optional bearer token for the `Authorization` header.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Whether TLS certificates are verified. Only ever disable this
    /// explicitly, against a known test deployment.
    pub verify_tls: bool,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ServiceplexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceplexConfig")
            .field("base_url", &self.base_url)
            .field("basic_key", &"[REDACTED]")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl Default for ServiceplexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            basic_key: "serviceplexBasicKey".to_string(),
            token: None,
            timeout_secs: 10,
            verify_tls: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "serviceplex-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                shutdown_grace_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            serviceplex: ServiceplexConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`. The base URL also
    /// honours a plain `BASE_URL` for compatibility with older deployments.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(grace) = parse_env("MCP_SHUTDOWN_GRACE_SECS") {
            config.server.shutdown_grace_secs = grace;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(with_timestamps) = parse_env_bool("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = with_timestamps;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Downstream API
        if let Ok(base_url) =
            std::env::var("MCP_SERVICEPLEX_BASE_URL").or_else(|_| std::env::var("BASE_URL"))
        {
            config.serviceplex.base_url = base_url;
        }

        if let Ok(basic_key) = std::env::var("MCP_SERVICEPLEX_BASIC_KEY") {
            config.serviceplex.basic_key = basic_key;
            info!("Serviceplex basic key loaded from environment");
        }

        if let Ok(token) = std::env::var("MCP_SERVICEPLEX_TOKEN") {
            config.serviceplex.token = Some(token);
            info!("Serviceplex bearer token loaded from environment");
        }

        if let Some(timeout) = parse_env("MCP_SERVICEPLEX_TIMEOUT_SECS") {
            config.serviceplex.timeout_secs = timeout;
        }

        if let Some(verify_tls) = parse_env_bool("MCP_SERVICEPLEX_VERIFY_TLS") {
            config.serviceplex.verify_tls = verify_tls;
            if !verify_tls {
                warn!(
                    "MCP_SERVICEPLEX_VERIFY_TLS=false - TLS certificates of {} will NOT be verified",
                    config.serviceplex.base_url
                );
            }
        }

        config
    }
}

/// Parse a numeric environment variable, warning on garbage.
fn parse_env(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a non-negative integer", key, raw);
            None
        }
    }
}

/// Parse a boolean environment variable (`true/false`, `1/0`, `yes/no`).
fn parse_env_bool(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("Ignoring {}={:?}: not a boolean", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.name, "serviceplex-mcp");
        assert_eq!(config.serviceplex.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.serviceplex.timeout_secs, 10);
        assert!(config.serviceplex.verify_tls);
        assert!(config.serviceplex.token.is_none());
    }

    #[test]
    fn test_serviceplex_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVICEPLEX_BASE_URL", "http://127.0.0.1:9000");
            std::env::set_var("MCP_SERVICEPLEX_TOKEN", "tok");
            std::env::set_var("MCP_SERVICEPLEX_TIMEOUT_SECS", "3");
            std::env::set_var("MCP_SERVICEPLEX_VERIFY_TLS", "false");
        }
        let config = Config::from_env();
        assert_eq!(config.serviceplex.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.serviceplex.token.as_deref(), Some("tok"));
        assert_eq!(config.serviceplex.timeout_secs, 3);
        assert!(!config.serviceplex.verify_tls);
        unsafe {
            std::env::remove_var("MCP_SERVICEPLEX_BASE_URL");
            std::env::remove_var("MCP_SERVICEPLEX_TOKEN");
            std::env::remove_var("MCP_SERVICEPLEX_TIMEOUT_SECS");
            std::env::remove_var("MCP_SERVICEPLEX_VERIFY_TLS");
        }
    }

    #[test]
    fn test_legacy_base_url_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_SERVICEPLEX_BASE_URL");
            std::env::set_var("BASE_URL", "http://legacy.example");
        }
        let config = Config::from_env();
        assert_eq!(config.serviceplex.base_url, "http://legacy.example");
        unsafe {
            std::env::remove_var("BASE_URL");
        }
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVICEPLEX_TIMEOUT_SECS", "soon");
            std::env::set_var("MCP_SERVICEPLEX_VERIFY_TLS", "maybe");
        }
        let config = Config::from_env();
        assert_eq!(config.serviceplex.timeout_secs, 10);
        assert!(config.serviceplex.verify_tls);
        unsafe {
            std::env::remove_var("MCP_SERVICEPLEX_TIMEOUT_SECS");
            std::env::remove_var("MCP_SERVICEPLEX_VERIFY_TLS");
        }
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = ServiceplexConfig {
            basic_key: "super_secret_key".to_string(),
            token: Some("super_secret_token".to_string()),
            ..ServiceplexConfig::default()
        };
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(!debug_str.contains("super_secret_token"));
    }
}

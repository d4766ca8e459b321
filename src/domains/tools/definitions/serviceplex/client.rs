//! HTTP client for the Serviceplex contract API.
//!
//! One `reqwest::Client` is built at startup and shared by every call, so
//! connections to the downstream API are pooled across requests.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::core::config::ServiceplexConfig;
use crate::domains::tools::ToolError;

/// Path of the contract lookup endpoint, relative to the base URL.
pub const CONTRACTS_PATH: &str = "/inbound/api/mcp/cntrcts";

/// Fixed API key header (`Basic-Key` on the wire; header names are case-insensitive).
pub const BASIC_KEY_HEADER: HeaderName = HeaderName::from_static("basic-key");

/// Client for the Serviceplex inbound API.
#[derive(Debug, Clone)]
pub struct ServiceplexClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServiceplexClient {
    /// Build a client from configuration.
    ///
    /// The API key and optional bearer token become default headers; the
    /// configured timeout applies to every request.
    pub fn new(config: &ServiceplexConfig) -> Result<Self, ToolError> {
        let mut headers = HeaderMap::new();

        let mut basic_key = HeaderValue::from_str(&STANDARD.encode(&config.basic_key))
            .map_err(|e| ToolError::internal(format!("invalid basic key: {}", e)))?;
        basic_key.set_sensitive(true);
        headers.insert(BASIC_KEY_HEADER, basic_key);

        if let Some(token) = &config.token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ToolError::internal(format!("invalid bearer token: {}", e)))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        if !config.verify_tls {
            warn!(
                "TLS certificate verification is DISABLED for {} \
                 (MCP_SERVICEPLEX_VERIFY_TLS=false)",
                config.base_url
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a contract by WBS code.
    ///
    /// Fails on transport errors and non-2xx statuses; otherwise returns the
    /// `data.cntrct` object of the response body.
    pub async fn get_contract(&self, wbs_code: &str) -> Result<Value, ToolError> {
        let url = format!("{}{}", self.base_url, CONTRACTS_PATH);
        debug!("GET {} wbsCode={}", url, wbs_code);

        let response = self
            .http
            .get(&url)
            .query(&[("wbsCode", wbs_code)])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(extract_contract(&body))
    }
}

/// Pull `data.cntrct` out of a response body, defaulting to an empty object.
pub fn extract_contract(body: &Value) -> Value {
    match body.get("data") {
        Some(data) => data.get("cntrct").cloned().unwrap_or_else(|| json!({})),
        None => json!({}),
    }
}

//! Minimal TCP client for the framed JSON-RPC protocol.
//!
//! Used by the `mcp-client` binary and by integration tests. One request is
//! in flight at a time, matching the server's sequential connection loop.

use std::time::Duration;

use serde_json::{Map, Value, json};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use super::framing::{FrameReader, FrameWriter};
use super::{TransportError, TransportResult};
use crate::core::protocol::{JSONRPC_VERSION, JsonRpcResponse};
use crate::domains::tools::ToolInfo;

/// Default time to wait for each response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A connected client session.
pub struct McpClient {
    reader: FrameReader<OwnedReadHalf>,
    writer: FrameWriter<OwnedWriteHalf>,
    next_id: u64,
    timeout: Duration,
}

impl McpClient {
    /// Connect to a server.
    pub async fn connect(addr: impl ToSocketAddrs) -> TransportResult<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
            next_id: 1,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Set the per-response timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one request and wait for its response.
    pub async fn request(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> TransportResult<JsonRpcResponse> {
        let id = self.next_id;
        self.next_id += 1;

        let mut message = json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": id,
            "method": method,
        });
        if let (Some(params), Value::Object(fields)) = (params, &mut message) {
            fields.insert("params".to_string(), params);
        }

        let raw = self.send(&message).await?;
        let response: JsonRpcResponse = serde_json::from_value(raw)?;
        if response.id != json!(id) {
            return Err(TransportError::protocol(format!(
                "response id {} does not match request id {}",
                response.id, id
            )));
        }
        Ok(response)
    }

    /// Write any JSON value as a frame and return the raw response frame.
    pub async fn send(&mut self, message: &Value) -> TransportResult<Value> {
        debug!("-> {}", message);
        self.writer.write_frame(message).await?;

        let response = tokio::time::timeout(self.timeout, self.reader.read_frame())
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??
            .ok_or(TransportError::ConnectionClosed)?;

        debug!("<- {}", response);
        Ok(response)
    }

    /// `initialize`, returning the result object.
    pub async fn initialize(&mut self, client_name: &str) -> TransportResult<Value> {
        let params = json!({
            "clientInfo": { "name": client_name, "version": env!("CARGO_PKG_VERSION") }
        });
        expect_result(self.request("initialize", Some(params)).await?)
    }

    /// `tools/list`, decoded into tool descriptors.
    pub async fn list_tools(&mut self) -> TransportResult<Vec<ToolInfo>> {
        let mut result = expect_result(self.request("tools/list", None).await?)?;
        let tools = result
            .get_mut("tools")
            .map(Value::take)
            .ok_or_else(|| TransportError::protocol("tools/list result has no 'tools' array"))?;
        Ok(serde_json::from_value(tools)?)
    }

    /// `tools/call`. Handler failures come back as an error response, not `Err`.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> TransportResult<JsonRpcResponse> {
        let params = json!({ "name": name, "arguments": arguments });
        self.request("tools/call", Some(params)).await
    }

    /// Close the write half and wait for the server to close its side.
    pub async fn close(mut self) -> TransportResult<()> {
        self.writer.shutdown().await?;
        while self.reader.read_frame().await?.is_some() {}
        Ok(())
    }
}

fn expect_result(response: JsonRpcResponse) -> TransportResult<Value> {
    response.into_result().map_err(|e| {
        TransportError::protocol(format!("server returned error {}: {}", e.code, e.message))
    })
}

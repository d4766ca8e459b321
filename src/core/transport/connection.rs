//! Per-connection request loop.
//!
//! A [`Connection`] owns one client's byte stream and runs strictly
//! sequentially: read a frame, dispatch it, write and flush the response,
//! and only then read the next frame. Transports (TCP, stdio) differ only in
//! how they obtain the stream halves.

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::TransportError;
use super::framing::{FrameReader, FrameWriter};
use crate::core::McpServer;

/// Lifecycle of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Active,
    Closing,
    Closed,
}

/// Why a connection stopped serving.
#[derive(Debug)]
pub enum CloseReason {
    /// The peer ended the stream between frames.
    PeerClosed,
    /// The server is shutting down.
    Shutdown,
    /// A framing, parse or transport error made the stream unusable.
    Failed(TransportError),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerClosed => write!(f, "peer closed the connection"),
            Self::Shutdown => write!(f, "server shutdown"),
            Self::Failed(e) => write!(f, "{} error: {}", e.kind(), e),
        }
    }
}

/// Result of serving a connection to completion.
#[derive(Debug)]
pub struct ConnectionOutcome {
    pub reason: CloseReason,
    pub requests_served: u64,
}

/// One client connection.
pub struct Connection<R, W> {
    peer: String,
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    shutdown: Option<watch::Receiver<bool>>,
    state: ConnectionState,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a connection over a read half and a write half.
    pub fn new(peer: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            peer: peer.into(),
            reader: FrameReader::new(reader),
            writer: FrameWriter::new(writer),
            shutdown: None,
            state: ConnectionState::Active,
        }
    }

    /// Stop reading new frames once `shutdown` flips to `true`.
    ///
    /// A request that is partly received or being dispatched still gets its
    /// response; the connection closes at the next frame boundary.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Serve requests until the stream ends, fails, or shutdown is requested.
    ///
    /// The connection is consumed: once this returns, the stream is released.
    #[instrument(name = "connection", skip_all, fields(peer = %self.peer))]
    pub async fn serve(mut self, server: &McpServer) -> ConnectionOutcome {
        let mut requests_served = 0u64;

        let reason = loop {
            // Shutdown only wins while idle; a frame that has started arriving
            // is read to completion and answered.
            let readable = tokio::select! {
                ready = self.reader.wait_readable() => Some(ready),
                _ = shutdown_requested(self.shutdown.as_mut()) => None,
            };

            match readable {
                None => break CloseReason::Shutdown,
                Some(Err(e)) => break CloseReason::Failed(e),
                Some(Ok(())) => {}
            }

            let message = match self.reader.read_frame().await {
                Ok(Some(message)) => message,
                Ok(None) => break CloseReason::PeerClosed,
                Err(e) => break CloseReason::Failed(e),
            };

            let response = server.handle_message(message).await;
            requests_served += 1;

            if let Err(e) = self.writer.write_frame(&response).await {
                break CloseReason::Failed(e);
            }
        };

        self.transition(ConnectionState::Closing);
        match &reason {
            CloseReason::Failed(e) => warn!("Dropping connection: {} error: {}", e.kind(), e),
            other => info!("Closing connection: {}", other),
        }

        if let Err(e) = self.writer.shutdown().await {
            debug!("Shutdown of write half failed: {}", e);
        }
        self.transition(ConnectionState::Closed);

        ConnectionOutcome {
            reason,
            requests_served,
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!("Connection state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Resolves once the shutdown flag is set; never resolves without a receiver
/// or after the sender is gone.
async fn shutdown_requested(shutdown: Option<&mut watch::Receiver<bool>>) {
    if let Some(shutdown) = shutdown {
        if shutdown.wait_for(|stop| *stop).await.is_ok() {
            return;
        }
    }
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::transport::FramingError;
    use crate::core::transport::framing::encode_frame;
    use crate::domains::tools::{ToolError, ToolRegistry};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;

    struct TestClient {
        reader: FrameReader<ReadHalf<DuplexStream>>,
        writer: FrameWriter<WriteHalf<DuplexStream>>,
    }

    impl TestClient {
        async fn request(&mut self, message: Value) -> Option<Value> {
            self.writer.write_frame(&message).await.unwrap();
            self.reader.read_frame().await.unwrap()
        }
    }

    fn test_server() -> McpServer {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn("echo", "Echo", None, |args| async move { Ok(Value::Object(args)) })
            .register_fn("fail", "Fails", None, |_| async move {
                Err(ToolError::execution_failed("boom"))
            })
            .register_fn("slow", "Sleeps", None, |_| async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(json!("done"))
            });
        McpServer::new(Config::default(), registry)
    }

    fn start(
        shutdown: Option<watch::Receiver<bool>>,
    ) -> (TestClient, JoinHandle<ConnectionOutcome>) {
        let (client, server_side) = tokio::io::duplex(64 * 1024);
        let (read_half, write_half) = tokio::io::split(server_side);
        let mut connection = Connection::new("test-peer", read_half, write_half);
        if let Some(shutdown) = shutdown {
            connection = connection.with_shutdown(shutdown);
        }

        let server = test_server();
        let handle = tokio::spawn(async move { connection.serve(&server).await });

        let (client_read, client_write) = tokio::io::split(client);
        let client = TestClient {
            reader: FrameReader::new(client_read),
            writer: FrameWriter::new(client_write),
        };
        (client, handle)
    }

    #[tokio::test]
    async fn test_serves_sequential_requests_until_peer_closes() {
        let (mut client, handle) = start(None);

        let first = client.request(json!({ "id": 1, "method": "initialize" })).await.unwrap();
        assert_eq!(first["result"]["serverInfo"]["name"], "serviceplex-mcp");

        let second = client
            .request(json!({ "id": 2, "method": "tools/call", "params": { "name": "echo", "arguments": { "x": 5 } } }))
            .await
            .unwrap();
        assert_eq!(second, json!({ "jsonrpc": "2.0", "id": 2, "result": { "x": 5 } }));

        client.writer.shutdown().await.unwrap();
        let outcome = handle.await.unwrap();
        assert!(matches!(outcome.reason, CloseReason::PeerClosed));
        assert_eq!(outcome.requests_served, 2);
    }

    #[tokio::test]
    async fn test_handler_error_keeps_connection_open() {
        let (mut client, handle) = start(None);

        let failed = client
            .request(json!({ "id": 1, "method": "tools/call", "params": { "name": "fail" } }))
            .await
            .unwrap();
        assert_eq!(failed["error"], json!({ "code": -32000, "message": "boom" }));

        let next = client.request(json!({ "id": 2, "method": "tools/list" })).await.unwrap();
        assert_eq!(next["id"], 2);
        assert!(next["result"]["tools"].is_array());

        client.writer.shutdown().await.unwrap();
        assert_eq!(handle.await.unwrap().requests_served, 2);
    }

    #[tokio::test]
    async fn test_invalid_json_drops_connection() {
        let (mut client, handle) = start(None);

        let mut raw = client.writer.into_inner();
        raw.write_all(b"Content-Length: 5\r\n\r\n{oops").await.unwrap();

        assert_eq!(client.reader.read_frame().await.unwrap(), None);
        let outcome = handle.await.unwrap();
        assert!(matches!(
            outcome.reason,
            CloseReason::Failed(TransportError::Parse(_))
        ));
        assert_eq!(outcome.requests_served, 0);
    }

    #[tokio::test]
    async fn test_truncated_body_drops_connection() {
        let (mut client, handle) = start(None);

        let mut raw = client.writer.into_inner();
        raw.write_all(b"Content-Length: 10\r\n\r\n12345").await.unwrap();
        raw.shutdown().await.unwrap();

        assert_eq!(client.reader.read_frame().await.unwrap(), None);
        let outcome = handle.await.unwrap();
        match outcome.reason {
            CloseReason::Failed(TransportError::Framing(e)) => assert_eq!(
                e,
                FramingError::TruncatedBody {
                    expected: 10,
                    received: 5
                }
            ),
            other => panic!("expected truncated body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_content_length_drops_connection() {
        let (mut client, handle) = start(None);

        let mut raw = client.writer.into_inner();
        raw.write_all(b"Content-Type: application/json\r\n\r\n").await.unwrap();

        assert_eq!(client.reader.read_frame().await.unwrap(), None);
        assert!(matches!(
            handle.await.unwrap().reason,
            CloseReason::Failed(TransportError::Framing(FramingError::MissingContentLength))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_connection() {
        let (stop, shutdown) = watch::channel(false);
        let (mut client, handle) = start(Some(shutdown));

        client.request(json!({ "id": 1, "method": "initialize" })).await.unwrap();
        stop.send(true).unwrap();

        assert_eq!(client.reader.read_frame().await.unwrap(), None);
        let outcome = handle.await.unwrap();
        assert!(matches!(outcome.reason, CloseReason::Shutdown));
        assert_eq!(outcome.requests_served, 1);
    }

    #[tokio::test]
    async fn test_shutdown_lets_in_flight_request_finish() {
        let (stop, shutdown) = watch::channel(false);
        let (mut client, handle) = start(Some(shutdown));

        client
            .writer
            .write_frame(&json!({ "id": 1, "method": "tools/call", "params": { "name": "slow" } }))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop.send(true).unwrap();

        let response = client.reader.read_frame().await.unwrap().unwrap();
        assert_eq!(response["result"], "done");
        assert_eq!(client.reader.read_frame().await.unwrap(), None);
        assert!(matches!(handle.await.unwrap().reason, CloseReason::Shutdown));
    }

    #[tokio::test]
    async fn test_shutdown_mid_frame_still_answers() {
        let (stop, shutdown) = watch::channel(false);
        let (client, handle) = start(Some(shutdown));
        let TestClient { mut reader, writer } = client;
        let mut raw = writer.into_inner();

        let frame = encode_frame(&json!({ "id": 1, "method": "initialize" })).unwrap();
        let (head, tail) = frame.split_at(frame.len() - 3);

        raw.write_all(head).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        raw.write_all(tail).await.unwrap();

        let response = reader.read_frame().await.unwrap().unwrap();
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["serverInfo"]["name"], "serviceplex-mcp");
        assert_eq!(reader.read_frame().await.unwrap(), None);

        let outcome = handle.await.unwrap();
        assert!(matches!(outcome.reason, CloseReason::Shutdown));
        assert_eq!(outcome.requests_served, 1);
    }

    #[test]
    fn test_close_reason_display() {
        let reason = CloseReason::Failed(FramingError::UnterminatedHeader.into());
        assert_eq!(
            reason.to_string(),
            "framing error: Framing error: stream ended before the header terminator"
        );
        assert_eq!(CloseReason::PeerClosed.to_string(), "peer closed the connection");
    }
}

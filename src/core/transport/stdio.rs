//! STDIO transport implementation.
//!
//! Serves a single framed session over stdin/stdout. Logs go to stderr, so
//! stdout carries nothing but frames.

use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tracing::info;

use super::TransportResult;
use super::connection::{CloseReason, Connection};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin closes or `shutdown` resolves.
    pub async fn run(server: McpServer, shutdown: impl Future<Output = ()>) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");
        Self::run_with(server, tokio::io::stdin(), tokio::io::stdout(), shutdown).await
    }

    /// Serve one session over the given streams.
    ///
    /// End of input and shutdown are both a clean finish; a framing or
    /// transport failure is returned as the error.
    pub async fn run_with<R, W>(
        server: McpServer,
        reader: R,
        writer: W,
        shutdown: impl Future<Output = ()>,
    ) -> TransportResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let connection = Connection::new("stdio", reader, writer).with_shutdown(stop_rx);

        let session = connection.serve(&server);
        tokio::pin!(session);

        let outcome = tokio::select! {
            outcome = &mut session => outcome,
            _ = shutdown => {
                let _ = stop_tx.send(true);
                session.await
            }
        };

        info!(
            "STDIO transport finished after {} requests",
            outcome.requests_served
        );
        match outcome.reason {
            CloseReason::Failed(e) => Err(e),
            CloseReason::PeerClosed | CloseReason::Shutdown => Ok(()),
        }
    }
}

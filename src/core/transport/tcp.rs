//! TCP transport implementation.
//!
//! Accepts connections until shutdown is requested and serves each one in its
//! own task with Content-Length framed JSON-RPC.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::connection::Connection;
use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// Delay before retrying after a failed `accept`.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run(
        self,
        server: McpServer,
        shutdown: impl Future<Output = ()>,
    ) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let grace = Duration::from_secs(server.config().server.shutdown_grace_secs);
        Self::serve(listener, server, shutdown, grace).await
    }

    /// Serve connections from an already bound listener.
    ///
    /// Once `shutdown` resolves the listener stops accepting, open connections
    /// finish the request they are handling and close, and any connection still
    /// busy after `grace` is aborted.
    pub async fn serve(
        listener: TcpListener,
        server: McpServer,
        shutdown: impl Future<Output = ()>,
        grace: Duration,
    ) -> TransportResult<()> {
        let local = listener.local_addr()?;
        info!("Ready - listening on {} (Content-Length framed JSON-RPC)", local);

        let (stop_tx, stop_rx) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        let connection = Self::prepare(stream, peer_addr, stop_rx.clone());
                        let server = server.clone();
                        connections.spawn(async move {
                            let outcome = connection.serve(&server).await;
                            debug!(
                                "Connection {} finished after {} requests",
                                peer_addr, outcome.requests_served
                            );
                        });
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        // Avoid spinning on persistent errors (e.g. fd exhaustion)
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                // Reap finished connections so the set does not grow unbounded
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Connection task failed: {}", e);
                    }
                }
            }
        }

        drop(listener);
        let _ = stop_tx.send(true);
        Self::drain(connections, grace).await;

        info!("TCP transport stopped");
        Ok(())
    }

    fn prepare(
        stream: TcpStream,
        peer_addr: SocketAddr,
        shutdown: watch::Receiver<bool>,
    ) -> Connection<tokio::net::tcp::OwnedReadHalf, tokio::net::tcp::OwnedWriteHalf> {
        info!("Accepted connection from {}", peer_addr);

        // Set TCP_NODELAY to disable Nagle's algorithm
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
        }

        let (read_half, write_half) = stream.into_split();
        Connection::new(peer_addr.to_string(), read_half, write_half).with_shutdown(shutdown)
    }

    async fn drain(mut connections: JoinSet<()>, grace: Duration) {
        if connections.is_empty() {
            return;
        }
        info!(
            "Waiting up to {:?} for {} open connections",
            grace,
            connections.len()
        );

        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = connections.join_next().await {
                if let Err(e) = joined {
                    warn!("Connection task failed: {}", e);
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "Aborting {} connections still open after {:?}",
                connections.len(),
                grace
            );
            connections.shutdown().await;
        }
    }
}

//! TCP server for the franz broker

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::dispatch::dispatch;
use crate::error::ServerError;
use franz_storage::MetadataManager;

/// Main server type for the franz broker
#[derive(Debug)]
pub struct Server {
    /// The TCP listener
    listener: TcpListener,
    /// The maximum number of concurrent connections
    max_connections: usize,
    /// Channel for shutdown signal
    shutdown_tx: broadcast::Sender<()>,
    /// Metadata log and segment access shared by all connections
    metadata: Arc<MetadataManager>,
}

impl Server {
    /// Create a new server instance
    pub fn new(
        listener: TcpListener,
        max_connections: usize,
        metadata: Arc<MetadataManager>,
    ) -> (Self, broadcast::Sender<()>) {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);

        (
            Self {
                listener,
                max_connections,
                shutdown_tx: shutdown_tx.clone(),
                metadata,
            },
            shutdown_tx,
        )
    }

    /// Get the local address of the server
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop until a shutdown signal arrives.
    ///
    /// In-flight connections are not interrupted; they terminate on their
    /// next clean EOF or error.
    pub async fn run(self) -> Result<(), ServerError> {
        info!("server listening on {}", self.local_addr()?);

        let connections = Arc::new(AtomicUsize::new(0));
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            if connections.load(Ordering::Relaxed) >= self.max_connections {
                                warn!(%addr, "max connections reached, rejecting connection");
                                continue;
                            }
                            connections.fetch_add(1, Ordering::Relaxed);
                            debug!(%addr, "accepted connection");
                            if let Err(err) = stream.set_nodelay(true) {
                                warn!("failed to set TCP_NODELAY: {}", err);
                            }

                            let metadata = Arc::clone(&self.metadata);
                            let connections = Arc::clone(&connections);
                            tokio::spawn(async move {
                                handle_connection(stream, addr, metadata).await;
                                connections.fetch_sub(1, Ordering::Relaxed);
                            });
                        }
                        Err(err) => {
                            error!("error accepting connection: {}", err);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received, closing listener");
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn handle_connection(mut stream: TcpStream, addr: SocketAddr, metadata: Arc<MetadataManager>) {
    loop {
        match dispatch(&mut stream, &metadata).await {
            Ok(true) => {
                // Next request on the same connection.
            }
            Ok(false) => {
                debug!(%addr, "connection closed");
                break;
            }
            Err(err) => {
                error!(%addr, error = %err, "error processing request, closing connection");
                break;
            }
        }
    }
}

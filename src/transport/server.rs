//! TCP server: one request and one response per connection.
//!
//! Connections are served concurrently on the tokio runtime. Query
//! evaluation runs on the blocking pool since oracle calls are synchronous.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::dispatch::Dispatcher;
use crate::error::{TransportError, TransportResult};
use crate::protocol::Response;

use super::frame::{DEFAULT_MAX_FRAME_BYTES, read_frame_async, write_frame_async};

// ---------------------------------------------------------------------------
// Shutdown signalling
// ---------------------------------------------------------------------------

/// Stop request shared between the server and whoever decides to stop it.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask every subscribed server to stop accepting connections.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct Server {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    max_frame_bytes: usize,
}

impl Server {
    pub async fn bind(addr: impl ToSocketAddrs, dispatcher: Arc<Dispatcher>) -> TransportResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    pub fn with_max_frame_bytes(mut self, limit: usize) -> Self {
        self.max_frame_bytes = limit;
        self
    }

    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` is triggered, then wait for the
    /// connections already in flight.
    pub async fn run(self, shutdown: ShutdownSignal) -> TransportResult<()> {
        let mut stop = shutdown.subscribe();
        let mut connections = JoinSet::new();
        tracing::info!(addr = %self.local_addr()?, "server listening");

        loop {
            if *stop.borrow() {
                break;
            }
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            tracing::warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    tracing::debug!(peer = %peer, "connection accepted");
                    let dispatcher = Arc::clone(&self.dispatcher);
                    let limit = self.max_frame_bytes;
                    connections.spawn(async move {
                        if let Err(e) = serve_connection(stream, dispatcher, limit).await {
                            tracing::warn!(peer = %peer, error = %e, "connection dropped");
                        }
                    });
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        tracing::info!(in_flight = connections.len(), "server shutting down");
        while connections.join_next().await.is_some() {}
        Ok(())
    }
}

/// Read one request frame, answer it, write one response frame, close.
async fn serve_connection(
    mut stream: TcpStream,
    dispatcher: Arc<Dispatcher>,
    limit: usize,
) -> TransportResult<()> {
    let request = match read_frame_async(&mut stream, limit).await {
        Ok(text) => text,
        Err(e @ (TransportError::FrameTooLarge { .. } | TransportError::InvalidUtf8)) => {
            let reply = Response::fail(e.to_string()).to_json();
            write_frame_async(&mut stream, &reply).await?;
            stream.shutdown().await?;
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let reply = match tokio::task::spawn_blocking(move || dispatcher.process(&request)).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "dispatch task failed");
            Response::error(e.to_string()).to_json()
        }
    };

    write_frame_async(&mut stream, &reply).await?;
    stream.shutdown().await?;
    Ok(())
}

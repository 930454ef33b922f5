//! In-process simulated server.
//!
//! Runs a [`SimServer`] in-process using channels for payload transport.
//! No network: payloads flow through mpsc channels, so the client can be
//! exercised end to end from a plain terminal.

use parley_harness::SimServer;
use tokio::{sync::mpsc, task::AbortHandle};

/// Capacity of each direction of the channel pair.
const CHANNEL_CAPACITY: usize = 32;

/// Handle to a payload channel pair, usually backed by a running server.
pub struct ServerHandle {
    /// Send payloads to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive payloads from the server.
    pub from_server: mpsc::Receiver<String>,
    /// Abort handle to stop the server task.
    abort_handle: Option<AbortHandle>,
}

impl ServerHandle {
    /// Wrap channels whose other ends the caller drives.
    pub fn from_channels(to_server: mpsc::Sender<String>, from_server: mpsc::Receiver<String>) -> Self {
        Self { to_server, from_server, abort_handle: None }
    }

    /// Stop the server.
    pub fn stop(&self) {
        if let Some(handle) = &self.abort_handle {
            handle.abort();
        }
    }
}

/// Spawn an in-process simulated server with a single connection.
///
/// Returns a handle with channels for payload transport. The server runs as a
/// tokio task until stopped or until the client drops its sender.
pub fn spawn_server(server: SimServer) -> ServerHandle {
    let (client_tx, mut server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (server_tx, client_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut server = server;
        let conn = server.connect();
        tracing::debug!(conn, "server: connection accepted");

        while let Some(raw) = server_rx.recv().await {
            for delivery in server.handle(conn, &raw) {
                // Single client, anything addressed elsewhere has nobody to go to
                if delivery.to != conn {
                    continue;
                }
                if server_tx.send(delivery.payload).await.is_err() {
                    tracing::debug!(conn, "server: client receiver dropped");
                    return;
                }
            }
        }

        // The only connection is leaving, so its departure notice has no recipient
        let dropped = server.disconnect(conn).len();
        tracing::debug!(conn, dropped, "server: connection closed");
    });

    ServerHandle { to_server: client_tx, from_server: client_rx, abort_handle: Some(handle.abort_handle()) }
}

//! Per-connection liveness state and the shared connection registry

use super::frames::ServerFrame;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

/// Liveness state of one client connection.
///
/// `Alive` means a pong (or the initial connect) was seen since the last
/// heartbeat tick. `PendingCheck` means a ping is outstanding; a second
/// tick in this state terminates the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    PendingCheck,
    Terminated,
}

pub struct ConnectionEntry {
    pub liveness: Liveness,
    pub last_pong: i64,
    pub outbound: mpsc::Sender<ServerFrame>,
    /// Signalled when the heartbeat terminates the connection; the
    /// channel loop listens on it and shuts down.
    pub close: Arc<Notify>,
}

/// Registry of open connections, shared between the gateway's channel
/// loops and the heartbeat scheduler.
pub struct ConnectionRegistry {
    connections: HashMap<String, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Register a freshly connected client. Starts `Alive`.
    ///
    /// A reconnect under an id that is still registered closes the
    /// previous channel; its loop exits through `remove_exact` without
    /// touching the new entry.
    pub fn register(&mut self, client_id: &str, outbound: mpsc::Sender<ServerFrame>) -> Arc<Notify> {
        if let Some(prev) = self.connections.get(client_id) {
            log::warn!("🔁 Client {} reconnected, closing previous channel", client_id);
            prev.close.notify_one();
        }

        let close = Arc::new(Notify::new());
        self.connections.insert(
            client_id.to_string(),
            ConnectionEntry {
                liveness: Liveness::Alive,
                last_pong: chrono::Utc::now().timestamp(),
                outbound,
                close: close.clone(),
            },
        );
        close
    }

    /// Record a pong: the connection is alive again.
    pub fn mark_pong(&mut self, client_id: &str) {
        if let Some(entry) = self.connections.get_mut(client_id) {
            entry.liveness = Liveness::Alive;
            entry.last_pong = chrono::Utc::now().timestamp();
        }
    }

    pub fn remove(&mut self, client_id: &str) {
        self.connections.remove(client_id);
    }

    /// Remove the entry only if it still belongs to the given
    /// connection. A channel loop that was replaced by a reconnect must
    /// not delete its successor's entry.
    pub(crate) fn remove_exact(&mut self, client_id: &str, close: &Arc<Notify>) {
        if let Some(entry) = self.connections.get(client_id) {
            if Arc::ptr_eq(&entry.close, close) {
                self.connections.remove(client_id);
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn liveness_of(&self, client_id: &str) -> Option<Liveness> {
        self.connections.get(client_id).map(|e| e.liveness)
    }

    pub(crate) fn connections_mut(&mut self) -> &mut HashMap<String, ConnectionEntry> {
        &mut self.connections
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

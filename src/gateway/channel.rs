//! Per-client duplex channel loop
//!
//! One long-lived channel per client carries query submissions in and
//! result/error frames out. Frames are processed in arrival order, but
//! query execution itself is spawned off the loop so the channel stays
//! responsive while a query is in flight. Query failures of any kind are
//! answered with an error frame; they never close the channel.

use super::connection::ConnectionRegistry;
use super::frames::{ClientFrame, ServerFrame};
use crate::query::QueryDispatcher;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::Duration;

/// The client's two ends of a gateway channel.
pub struct ClientChannel {
    /// Raw frame text in (JSON, tag-based).
    pub inbound: mpsc::Sender<String>,
    /// Typed frames out.
    pub outbound: mpsc::Receiver<ServerFrame>,
}

pub struct Gateway {
    dispatcher: Arc<QueryDispatcher>,
    registry: Arc<Mutex<ConnectionRegistry>>,
    query_timeout: Duration,
    channel_buffer: usize,
}

impl Gateway {
    pub fn new(
        dispatcher: Arc<QueryDispatcher>,
        query_timeout_ms: u64,
        channel_buffer: usize,
    ) -> Self {
        Self {
            dispatcher,
            registry: Arc::new(Mutex::new(ConnectionRegistry::new())),
            query_timeout: Duration::from_millis(query_timeout_ms),
            channel_buffer,
        }
    }

    /// Registry shared with the heartbeat scheduler.
    pub fn registry(&self) -> Arc<Mutex<ConnectionRegistry>> {
        self.registry.clone()
    }

    /// Open a channel for a client and spawn its receive loop.
    pub fn connect(&self, client_id: &str) -> ClientChannel {
        let (inbound_tx, inbound_rx) = mpsc::channel::<String>(self.channel_buffer);
        let (outbound_tx, outbound_rx) = mpsc::channel::<ServerFrame>(self.channel_buffer);

        let close = self
            .registry
            .lock()
            .unwrap()
            .register(client_id, outbound_tx.clone());

        log::info!("🔌 Client {} connected", client_id);

        tokio::spawn(run_client_channel(
            client_id.to_string(),
            inbound_rx,
            outbound_tx,
            close,
            self.registry.clone(),
            self.dispatcher.clone(),
            self.query_timeout,
        ));

        ClientChannel {
            inbound: inbound_tx,
            outbound: outbound_rx,
        }
    }
}

async fn run_client_channel(
    client_id: String,
    mut inbound: mpsc::Receiver<String>,
    outbound: mpsc::Sender<ServerFrame>,
    close: Arc<tokio::sync::Notify>,
    registry: Arc<Mutex<ConnectionRegistry>>,
    dispatcher: Arc<QueryDispatcher>,
    query_timeout: Duration,
) {
    loop {
        tokio::select! {
            maybe_frame = inbound.recv() => {
                match maybe_frame {
                    Some(raw) => {
                        handle_raw_frame(
                            &client_id,
                            &raw,
                            &outbound,
                            &registry,
                            &dispatcher,
                            query_timeout,
                        );
                    }
                    None => {
                        log::info!("🔌 Client {} closed its channel", client_id);
                        break;
                    }
                }
            }

            // Terminated by the heartbeat scheduler
            _ = close.notified() => {
                log::info!("💀 Channel loop for {} stopping (liveness termination)", client_id);
                break;
            }
        }
    }

    registry.lock().unwrap().remove_exact(&client_id, &close);
}

fn handle_raw_frame(
    client_id: &str,
    raw: &str,
    outbound: &mpsc::Sender<ServerFrame>,
    registry: &Arc<Mutex<ConnectionRegistry>>,
    dispatcher: &Arc<QueryDispatcher>,
    query_timeout: Duration,
) {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            log::debug!("⚠️  Malformed frame from {}: {}", client_id, e);
            // Awaited off the loop so a full outbound buffer delays the
            // reply instead of dropping it
            let outbound = outbound.clone();
            tokio::spawn(async move {
                let _ = outbound.send(ServerFrame::error("invalid format")).await;
            });
            return;
        }
    };

    match frame {
        ClientFrame::Pong => {
            registry.lock().unwrap().mark_pong(client_id);
        }
        ClientFrame::Query { payload } => {
            // Execute off the loop: the channel keeps receiving while the
            // query runs. The reply goes out through a cloned sender, so
            // replies to concurrent submissions carry no ordering promise.
            let dispatcher = dispatcher.clone();
            let outbound = outbound.clone();
            let client_id = client_id.to_string();
            tokio::spawn(async move {
                let start = Instant::now();
                let task =
                    tokio::task::spawn_blocking(move || dispatcher.execute(&payload.query));

                let reply = match tokio::time::timeout(query_timeout, task).await {
                    Ok(Ok(Ok(result))) => {
                        ServerFrame::result(result, start.elapsed().as_millis() as u64)
                    }
                    Ok(Ok(Err(store_err))) => {
                        log::error!("❌ Query from {} failed: {}", client_id, store_err);
                        ServerFrame::error(format!("query execution failed: {}", store_err))
                    }
                    Ok(Err(join_err)) => {
                        log::error!("❌ Query task from {} panicked: {}", client_id, join_err);
                        ServerFrame::error("query execution failed: internal error")
                    }
                    Err(_) => {
                        // The blocking computation is not preemptible; it
                        // runs to completion and its late result is dropped.
                        log::warn!("⏱️  Query from {} timed out", client_id);
                        ServerFrame::error("query timed out")
                    }
                };

                // Send fails if the client disconnected meanwhile; the
                // computed result is simply discarded.
                let _ = outbound.send(reply).await;
            });
        }
    }
}

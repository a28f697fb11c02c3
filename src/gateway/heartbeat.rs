//! Heartbeat scheduler - two-tick dead-peer detection
//!
//! One shared timer per gateway instance pings every open connection.
//! A connection that fails to pong between two consecutive ticks is
//! terminated on the second tick, giving exactly one grace period.

use super::connection::{ConnectionRegistry, Liveness};
use super::frames::ServerFrame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

/// One heartbeat sweep over the registry.
///
/// Connections still `PendingCheck` from the previous sweep missed their
/// pong: they are terminated (close signalled, entry removed). Everyone
/// else moves to `PendingCheck` and gets a fresh ping.
pub fn heartbeat_tick(registry: &Mutex<ConnectionRegistry>) {
    let mut registry = registry.lock().unwrap();

    let dead: Vec<String> = registry
        .connections_mut()
        .iter()
        .filter(|(_, entry)| entry.liveness == Liveness::PendingCheck)
        .map(|(id, _)| id.clone())
        .collect();

    for id in dead {
        if let Some(entry) = registry.connections_mut().get_mut(&id) {
            entry.liveness = Liveness::Terminated;
            entry.close.notify_one();
        }
        registry.remove(&id);
        log::warn!("💀 Connection {} missed two heartbeats, terminated", id);
    }

    for (id, entry) in registry.connections_mut().iter_mut() {
        entry.liveness = Liveness::PendingCheck;
        // Full outbound buffer counts as unresponsive; liveness will
        // catch the connection on the next sweep.
        if entry.outbound.try_send(ServerFrame::Ping).is_err() {
            log::debug!("⚠️  Ping not delivered to {}", id);
        }
    }
}

/// Handle to the running heartbeat scheduler. `shutdown` is idempotent.
pub struct HeartbeatHandle {
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl HeartbeatHandle {
    pub fn shutdown(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.handle.abort();
            log::info!("🛑 Heartbeat scheduler stopped");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Spawn the shared heartbeat scheduler.
///
/// Ticks every `interval_secs`, sweeping the whole registry each time.
/// Runs until `HeartbeatHandle::shutdown` is called.
pub fn start_heartbeat_scheduler(
    registry: Arc<Mutex<ConnectionRegistry>>,
    interval_secs: u64,
) -> HeartbeatHandle {
    log::info!("⏰ Starting heartbeat scheduler (interval: {}s)", interval_secs);

    let handle = tokio::spawn(async move {
        let mut timer = interval(Duration::from_secs(interval_secs));
        // First tick fires immediately; skip it so fresh connections get
        // a full interval before their first ping.
        timer.tick().await;

        loop {
            timer.tick().await;
            heartbeat_tick(&registry);
        }
    });

    HeartbeatHandle {
        cancelled: Arc::new(AtomicBool::new(false)),
        handle,
    }
}

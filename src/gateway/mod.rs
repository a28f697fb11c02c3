//! Transport Gateway - persistent live-query channels
//!
//! ```text
//! client ── inbound raw frames ──▶ channel loop (one per client)
//!                                     ├─ pong → registry.mark_pong
//!                                     └─ query → spawned dispatch (timeout-bounded)
//!                                                    ↓
//! client ◀─ result/error frames ── outbound sender (cloned per query)
//!
//! heartbeat scheduler (one per gateway) ── tick ──▶ registry sweep
//! ```
//!
//! Failure containment: malformed frames and failed queries are answered
//! with error frames and never close the channel; only two consecutive
//! missed pongs terminate a connection.

pub mod channel;
pub mod connection;
pub mod frames;
pub mod heartbeat;

pub use channel::{ClientChannel, Gateway};
pub use connection::{ConnectionRegistry, Liveness};
pub use frames::{ClientFrame, ErrorPayload, QueryPayload, ServerFrame};
pub use heartbeat::{heartbeat_tick, start_heartbeat_scheduler, HeartbeatHandle};

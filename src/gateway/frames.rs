//! Tag-based wire frames for the client channel
//!
//! Inbound frames arrive as raw JSON text and must carry a `tag` plus a
//! payload matching that tag. Outbound frames are serialized with the
//! same tag convention.

use crate::query::QueryResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPayload {
    pub query: String,
}

/// Frames a client may send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ClientFrame {
    Query { payload: QueryPayload },
    Pong,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Frames the gateway sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ServerFrame {
    QueryResult {
        payload: QueryResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Error { payload: ErrorPayload },
    Ping,
}

impl ServerFrame {
    pub fn error(message: impl Into<String>) -> Self {
        ServerFrame::Error {
            payload: ErrorPayload {
                message: message.into(),
            },
        }
    }

    pub fn result(payload: QueryResult, duration_ms: u64) -> Self {
        ServerFrame::QueryResult {
            payload,
            duration_ms: Some(duration_ms),
        }
    }
}

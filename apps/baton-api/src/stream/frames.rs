//! Frames written to live event streams.

use std::sync::Arc;

use axum::response::sse;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Comment text carried by keep-alive frames.
pub const HEARTBEAT_COMMENT: &str = "heartbeat";

/// One unit pushed down a subscriber's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Pre-serialized JSON payload, shared by every subscriber it fans out to.
    Data(Arc<str>),
    /// Keep-alive comment; never parsed as data by SSE consumers.
    Heartbeat,
}

impl Frame {
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Frame::Heartbeat)
    }

    /// Render the frame exactly as it appears on the wire.
    pub fn encode(&self) -> String {
        match self {
            Frame::Data(json) => format!("data: {json}\n\n"),
            Frame::Heartbeat => format!(": {HEARTBEAT_COMMENT}\n\n"),
        }
    }

    pub fn into_sse(self) -> sse::Event {
        match self {
            Frame::Data(json) => sse::Event::default().data(json),
            Frame::Heartbeat => sse::Event::default().comment(HEARTBEAT_COMMENT),
        }
    }
}

/// Messages originated by the stream itself rather than by a device.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SystemMessage {
    /// Sent once to a new subscriber before anything else.
    System {
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// Current subscriber count.
    Status {
        subscribers: usize,
        timestamp: DateTime<Utc>,
    },
}

impl SystemMessage {
    pub fn welcome() -> Self {
        SystemMessage::System {
            message: "Connected to baton event stream".to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn status(subscribers: usize) -> Self {
        SystemMessage::Status {
            subscribers,
            timestamp: Utc::now(),
        }
    }
}

//! Ingestion sources and their response policies.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which ingestion entry point produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// `POST /api/events`, the first device endpoint.
    Legacy,
    /// `POST /api/events/hookdeck`, relayed through Hookdeck.
    Hookdeck,
    /// `POST /api/events/direct`.
    Direct,
}

/// Shape of the rejection body for an empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectShape {
    StatusMessage {
        status: &'static str,
        message: &'static str,
    },
    Error(&'static str),
}

/// Acknowledgment and rejection shapes for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePolicy {
    /// Value of `status` in the success body.
    pub ack_status: &'static str,
    pub reject: RejectShape,
}

const LEGACY_POLICY: SourcePolicy = SourcePolicy {
    ack_status: "ok",
    reject: RejectShape::StatusMessage {
        status: "error",
        message: "No raw string received",
    },
};

const RECEIVED_POLICY: SourcePolicy = SourcePolicy {
    ack_status: "received",
    reject: RejectShape::Error("No message received"),
};

impl Source {
    pub const ALL: [Source; 3] = [Source::Legacy, Source::Hookdeck, Source::Direct];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Legacy => "legacy",
            Source::Hookdeck => "hookdeck",
            Source::Direct => "direct",
        }
    }

    /// Response policy for this source.
    pub fn policy(self) -> &'static SourcePolicy {
        match self {
            Source::Legacy => &LEGACY_POLICY,
            Source::Hookdeck | Source::Direct => &RECEIVED_POLICY,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

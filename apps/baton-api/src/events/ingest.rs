//! Ingestion pipeline shared by every source endpoint.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::Mutex;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Rejection;
use crate::stream::fanout::Broadcaster;

use super::log::EventLog;
use super::model::Event;
use super::source::Source;

/// Success body for an accepted ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn for_source(source: Source) -> Self {
        Self {
            status: source.policy().ack_status.to_string(),
        }
    }
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Normalizes raw payloads, decodes them, records them, and fans them out.
pub struct IngestionGateway {
    log: EventLog,
    broadcaster: Arc<Broadcaster>,
    /// Held across record + publish so subscribers see events in log order.
    order: Mutex<()>,
}

impl IngestionGateway {
    pub fn new(broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            log: EventLog::new(),
            broadcaster,
            order: Mutex::new(()),
        }
    }

    /// Accept a payload from `source`.
    ///
    /// Only an empty (after trimming) payload is rejected. Anything else is
    /// logged and broadcast; payloads that don't decode are kept with
    /// `isValid = false`.
    pub fn ingest(&self, raw: &str, source: Source) -> Result<Ack, Rejection> {
        let raw = raw.trim();
        if raw.is_empty() {
            tracing::debug!(%source, "rejected empty payload");
            return Err(Rejection::no_payload(source));
        }

        let decoded = baton_protocol::decode(raw);

        // `publish` only does `try_send`, so holding the lock here is short.
        let (event, delivered) = {
            let _order = self.order.lock();
            let event = self
                .log
                .record(|timestamp| Event::new(raw, decoded, source, timestamp));
            let delivered = self.broadcaster.publish(&*event);
            (event, delivered)
        };

        match &event.decoded {
            Some(decoded) => tracing::info!(
                %source,
                raw = %event.raw_text,
                site_id = %decoded.site_id,
                message_type = %decoded.message_type,
                severity = decoded.severity.as_str(),
                "baton event received"
            ),
            None => tracing::info!(%source, raw = %event.raw_text, "unparsed baton event received"),
        }

        tracing::debug!(delivered, "baton event fanned out");

        Ok(Ack::for_source(source))
    }

    /// Up to `limit` most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Arc<Event>> {
        self.log.recent(limit)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

//! Ingestion and history endpoints.

use std::num::IntErrorKind;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{ApiError, ApiErrorBody, Rejection, RejectionBody};
use crate::events::ingest::Ack;
use crate::events::log::MAX_EVENTS;
use crate::events::model::Event;
use crate::events::source::Source;
use crate::AppState;

/// Page size when `limit` is absent or unparsable.
const DEFAULT_LIMIT: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", post(ingest_legacy))
        .route("/api/events/hookdeck", post(ingest_hookdeck))
        .route("/api/events/direct", post(ingest_direct))
        .route("/api/events/all", get(list_events))
}

/// Request body taken as text regardless of content type. Invalid UTF-8 is
/// replaced rather than rejected.
pub struct RawBody(pub String);

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

// ---------------------------------------------------------------------------
// POST /api/events
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body(content = String, description = "Raw baton message", content_type = "text/plain"),
    responses(
        (status = 200, description = "Accepted", body = Ack),
        (status = 400, description = "No payload", body = RejectionBody),
        (status = 413, description = "Body too large", body = ApiErrorBody),
    ),
)]
pub async fn ingest_legacy(
    State(state): State<AppState>,
    RawBody(body): RawBody,
) -> Result<Ack, Rejection> {
    state.ingest.ingest(&body, Source::Legacy)
}

// ---------------------------------------------------------------------------
// POST /api/events/hookdeck
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/events/hookdeck",
    tag = "Events",
    request_body(content = String, description = "Raw baton message relayed by Hookdeck", content_type = "text/plain"),
    responses(
        (status = 200, description = "Accepted", body = Ack),
        (status = 400, description = "No payload", body = RejectionBody),
        (status = 413, description = "Body too large", body = ApiErrorBody),
    ),
)]
pub async fn ingest_hookdeck(
    State(state): State<AppState>,
    RawBody(body): RawBody,
) -> Result<Ack, Rejection> {
    state.ingest.ingest(&body, Source::Hookdeck)
}

// ---------------------------------------------------------------------------
// POST /api/events/direct
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/events/direct",
    tag = "Events",
    request_body(content = String, description = "Raw baton message", content_type = "text/plain"),
    responses(
        (status = 200, description = "Accepted", body = Ack),
        (status = 400, description = "No payload", body = RejectionBody),
        (status = 413, description = "Body too large", body = ApiErrorBody),
    ),
)]
pub async fn ingest_direct(
    State(state): State<AppState>,
    RawBody(body): RawBody,
) -> Result<Ack, Rejection> {
    state.ingest.ingest(&body, Source::Direct)
}

// ---------------------------------------------------------------------------
// GET /api/events/all
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListEventsParams {
    /// Kept as text so that junk falls back to the default instead of a 400.
    pub limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/events/all",
    tag = "Events",
    params(
        ("limit" = Option<i64>, Query, description = "Number of events (default 50, max 1000)"),
    ),
    responses(
        (status = 200, description = "Recent events, newest first", body = Vec<Event>),
    ),
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> Json<Vec<Arc<Event>>> {
    let limit = parse_limit(params.limit.as_deref());
    Json(state.ingest.recent(limit))
}

fn parse_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_LIMIT;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) => usize::try_from(n).map_or(0, |n| n.min(MAX_EVENTS)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => MAX_EVENTS,
            IntErrorKind::NegOverflow => 0,
            _ => DEFAULT_LIMIT,
        },
    }
}

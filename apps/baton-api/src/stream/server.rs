//! SSE endpoint that attaches observers to the broadcaster.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::routing::get;
use axum::Router;
use futures_util::stream::{Stream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;

use crate::AppState;

use super::fanout::SubscriptionGuard;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/events/stream", get(stream_events))
}

#[utoipa::path(
    get,
    path = "/api/events/stream",
    tag = "Events",
    responses(
        (status = 200, description = "Server-Sent Events stream: a system welcome frame, then one data frame per accepted event, with `: heartbeat` comments in between", body = String, content_type = "text/event-stream"),
    ),
)]
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (handle, rx) = state.broadcaster.subscribe();

    // The guard travels with the response body; when the client goes away
    // the body is dropped and the subscriber is removed.
    let guard = SubscriptionGuard::new(Arc::clone(&state.broadcaster), handle);
    let stream = ReceiverStream::new(rx).map(move |frame| {
        let _guard = &guard;
        Ok(frame.into_sse())
    });

    Sse::new(stream)
}

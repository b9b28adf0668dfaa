pub mod events;
pub mod health;

use axum::Router;
use utoipa::OpenApi;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(events::router())
        .merge(crate::stream::server::router())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        events::ingest_legacy,
        events::ingest_hookdeck,
        events::ingest_direct,
        events::list_events,
        crate::stream::server::stream_events,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::events::ingest::Ack,
            crate::error::RejectionBody,
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::events::model::Event,
            crate::events::source::Source,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Events", description = "Baton event ingestion, history, and live stream"),
    )
)]
pub struct ApiDoc;
